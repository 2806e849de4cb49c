//! Declarative query plans.
//!
//! A [`QueryPlan`] is a tree that maps one-to-one onto searchers. It is not a
//! query language: every node names exactly the searcher to build.
//!
//! ```
//! use boolsearch::query::QueryPlan;
//!
//! let plan: QueryPlan = serde_json::from_str(r#"{
//!     "type": "boolean",
//!     "must": {"type": "term", "field": "body", "term": "rust"},
//!     "must_not": {"type": "term", "field": "body", "term": "java"}
//! }"#).unwrap();
//! assert!(matches!(plan, QueryPlan::Boolean { .. }));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{BoolSearchError, Result};
use crate::index::IndexReader;
use crate::query::boolean::BooleanSearcher;
use crate::query::conjunction::ConjunctionSearcher;
use crate::query::disjunction::DisjunctionSearcher;
use crate::query::searcher::Searcher;
use crate::query::term::TermSearcher;

fn default_boost() -> f64 {
    1.0
}

/// A node of a query plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryPlan {
    /// Exact term lookup in one field.
    Term {
        field: String,
        term: String,
        #[serde(default = "default_boost")]
        boost: f64,
    },
    /// Documents matched by every clause.
    Conjunction { clauses: Vec<QueryPlan> },
    /// Documents matched by at least `min` clauses.
    Disjunction {
        clauses: Vec<QueryPlan>,
        #[serde(default)]
        min: usize,
    },
    /// Must / should / must-not combination.
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        must: Option<Box<QueryPlan>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        should: Option<Box<QueryPlan>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        must_not: Option<Box<QueryPlan>>,
    },
}

impl QueryPlan {
    /// Create a term node with the default boost.
    pub fn term<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        QueryPlan::Term {
            field: field.into(),
            term: term.into(),
            boost: default_boost(),
        }
    }

    /// Build the searcher tree for this plan.
    pub fn searcher(
        &self,
        reader: &Arc<dyn IndexReader>,
        explain: bool,
    ) -> Result<Box<dyn Searcher>> {
        match self {
            QueryPlan::Term { field, term, boost } => Ok(Box::new(TermSearcher::new(
                reader.as_ref(),
                field,
                term,
                *boost,
                explain,
            )?)),
            QueryPlan::Conjunction { clauses } => {
                let searchers = Self::build_all(clauses, reader, explain)?;
                Ok(Box::new(ConjunctionSearcher::new(searchers, explain)?))
            }
            QueryPlan::Disjunction { clauses, min } => {
                if clauses.is_empty() {
                    return Err(BoolSearchError::query(
                        "disjunction requires at least one clause",
                    ));
                }
                let searchers = Self::build_all(clauses, reader, explain)?;
                Ok(Box::new(DisjunctionSearcher::new(searchers, *min, explain)?))
            }
            QueryPlan::Boolean {
                must,
                should,
                must_not,
            } => {
                if must.is_none() && should.is_none() && must_not.is_none() {
                    return Err(BoolSearchError::query("boolean query has no clauses"));
                }
                let build = |clause: &Option<Box<QueryPlan>>| -> Result<Option<Box<dyn Searcher>>> {
                    clause
                        .as_deref()
                        .map(|plan| plan.searcher(reader, explain))
                        .transpose()
                };
                Ok(Box::new(BooleanSearcher::new(
                    Arc::clone(reader),
                    build(must)?,
                    build(should)?,
                    build(must_not)?,
                    explain,
                )))
            }
        }
    }

    fn build_all(
        clauses: &[QueryPlan],
        reader: &Arc<dyn IndexReader>,
        explain: bool,
    ) -> Result<Vec<Box<dyn Searcher>>> {
        clauses
            .iter()
            .map(|clause| clause.searcher(reader, explain))
            .collect()
    }

    /// Load a plan from a JSON file.
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use crate::query::{DocId, SearchContext};

    fn reader() -> Arc<dyn IndexReader> {
        let mut index = MemoryIndex::new();
        index.add_document(&DocId::from_u64(1), "body", &["rust", "search"]);
        index.add_document(&DocId::from_u64(2), "body", &["java", "search"]);
        index.add_document(&DocId::from_u64(3), "body", &["rust"]);
        Arc::new(index)
    }

    #[test]
    fn test_deserialize_defaults() {
        let plan: QueryPlan = serde_json::from_str(
            r#"{"type": "disjunction", "clauses": [{"type": "term", "field": "f", "term": "t"}]}"#,
        )
        .unwrap();
        assert_eq!(
            plan,
            QueryPlan::Disjunction {
                clauses: vec![QueryPlan::term("f", "t")],
                min: 0
            }
        );
    }

    #[test]
    fn test_build_and_run_boolean() {
        let reader = reader();
        let plan = QueryPlan::Boolean {
            must: Some(Box::new(QueryPlan::term("body", "search"))),
            should: Some(Box::new(QueryPlan::term("body", "rust"))),
            must_not: Some(Box::new(QueryPlan::term("body", "java"))),
        };
        let mut searcher = plan.searcher(&reader, false).unwrap();
        let mut ctx = SearchContext::for_searcher(searcher.as_ref());

        let m = searcher.next(&mut ctx).unwrap().unwrap();
        assert_eq!(m.id().to_u64(), Some(1));
        ctx.pool().put(m);
        assert!(searcher.next(&mut ctx).unwrap().is_none());
    }

    #[test]
    fn test_invalid_plans() {
        let reader = reader();
        let empty_bool = QueryPlan::Boolean {
            must: None,
            should: None,
            must_not: None,
        };
        assert!(empty_bool.searcher(&reader, false).is_err());

        let empty_or = QueryPlan::Disjunction {
            clauses: vec![],
            min: 0,
        };
        assert!(empty_or.searcher(&reader, false).is_err());

        let too_many = QueryPlan::Disjunction {
            clauses: vec![QueryPlan::term("body", "rust")],
            min: 3,
        };
        assert!(too_many.searcher(&reader, false).is_err());

        let empty_and = QueryPlan::Conjunction { clauses: vec![] };
        assert!(empty_and.searcher(&reader, false).is_err());
    }
}
