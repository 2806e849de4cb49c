//! Boolean searcher combining must, should and must-not clauses.
//!
//! The searcher is a merge-join over up to three child streams:
//!
//! - the *driving* clause is must when present, should otherwise; every
//!   candidate id comes from it;
//! - must-not vetoes a candidate when it is positioned on the same id;
//! - should adds its score when it aligns with the candidate, and is required
//!   to align only when it reports a non-zero [`Searcher::min`].
//!
//! A boolean query without must and should clauses matches nothing, whatever
//! its must-not clause says.

use std::sync::Arc;

use log::{debug, trace};

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::context::SearchContext;
use crate::query::doc_id::DocId;
use crate::query::document_match::DocumentMatch;
use crate::query::scorer::ConjunctionScorer;
use crate::query::searcher::{Searcher, align, recycle, seek};

/// What to do with the current candidate once the clauses are aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// Should aligned with the candidate: score with the should bonus.
    WithShould,
    /// Should is optional and did not align: score on the driving clause alone.
    DrivingOnly,
    /// Should is required and did not align.
    Rejected,
}

/// A searcher evaluating a boolean query over three optional clauses.
#[derive(Debug)]
pub struct BooleanSearcher {
    /// Index snapshot handle, kept for the lifetime of the query.
    index_reader: Arc<dyn IndexReader>,
    must: Option<Box<dyn Searcher>>,
    should: Option<Box<dyn Searcher>>,
    must_not: Option<Box<dyn Searcher>>,
    query_norm: f64,
    curr_must: Option<DocumentMatch>,
    curr_should: Option<DocumentMatch>,
    curr_must_not: Option<DocumentMatch>,
    /// Id of the current candidate; `None` once the driving clause is exhausted.
    current_id: Option<DocId>,
    scorer: ConjunctionScorer,
    initialized: bool,
}

impl BooleanSearcher {
    /// Create a new boolean searcher.
    ///
    /// The query norm `1 / sqrt(must.weight() + should.weight())` is computed
    /// here and pushed down to the must and should clauses. With a zero total
    /// weight the norm is not finite; this is passed through unchanged.
    pub fn new(
        index_reader: Arc<dyn IndexReader>,
        must: Option<Box<dyn Searcher>>,
        should: Option<Box<dyn Searcher>>,
        must_not: Option<Box<dyn Searcher>>,
        explain: bool,
    ) -> Self {
        let mut searcher = BooleanSearcher {
            index_reader,
            must,
            should,
            must_not,
            query_norm: 1.0,
            curr_must: None,
            curr_should: None,
            curr_must_not: None,
            current_id: None,
            scorer: ConjunctionScorer::new(explain),
            initialized: false,
        };
        searcher.compute_query_norm();
        searcher
    }

    fn compute_query_norm(&mut self) {
        // Must-not clauses never contribute to scoring.
        let sum_of_squared_weights = self.weight();
        self.query_norm = 1.0 / sum_of_squared_weights.sqrt();

        let norm = self.query_norm;
        self.set_query_norm(norm);
    }

    /// Get the query norm computed at construction.
    pub fn query_norm(&self) -> f64 {
        self.query_norm
    }

    /// Get the index reader this searcher was built against.
    ///
    /// The searcher keeps the snapshot alive for as long as it runs. Callers
    /// that build further clauses for the same query, or read collection
    /// statistics such as `doc_count` for reporting, use this handle so that
    /// everything observes the same snapshot.
    pub fn index_reader(&self) -> &Arc<dyn IndexReader> {
        &self.index_reader
    }

    fn init_searchers(&mut self, ctx: &mut SearchContext) -> Result<()> {
        if let Some(must) = self.must.as_deref_mut() {
            recycle(ctx, &mut self.curr_must);
            self.curr_must = must.next(ctx)?;
        }
        if let Some(should) = self.should.as_deref_mut() {
            recycle(ctx, &mut self.curr_should);
            self.curr_should = should.next(ctx)?;
        }
        if let Some(must_not) = self.must_not.as_deref_mut() {
            recycle(ctx, &mut self.curr_must_not);
            self.curr_must_not = must_not.next(ctx)?;
        }
        self.sync_current_id();
        self.initialized = true;

        debug!(
            "boolean searcher initialized: must={} should={} must_not={} query_norm={}",
            self.must.is_some(),
            self.should.is_some(),
            self.must_not.is_some(),
            self.query_norm
        );
        Ok(())
    }

    /// Recompute `current_id` from the driving clause.
    fn sync_current_id(&mut self) {
        let driver = if self.must.is_some() {
            self.curr_must.as_ref()
        } else {
            self.curr_should.as_ref()
        };

        match driver {
            Some(m) => match self.current_id.as_mut() {
                Some(id) => id.copy_from(m.id()),
                None => self.current_id = Some(m.id().clone()),
            },
            None => self.current_id = None,
        }
    }

    /// Pull the next match of the driving clause.
    ///
    /// The previous driving match goes back to the pool, unless it was moved
    /// into the result just emitted, in which case its slot is already empty.
    fn advance_driving(&mut self, ctx: &mut SearchContext) -> Result<()> {
        if let Some(must) = self.must.as_deref_mut() {
            recycle(ctx, &mut self.curr_must);
            self.curr_must = must.next(ctx)?;
        } else if let Some(should) = self.should.as_deref_mut() {
            recycle(ctx, &mut self.curr_should);
            self.curr_should = should.next(ctx)?;
        }
        self.sync_current_id();
        Ok(())
    }

    /// Compose the result for the current candidate.
    ///
    /// The driving match is moved out of its slot and reused as the result;
    /// the should match, when it contributes, is only read.
    fn compose(&mut self, verdict: Verdict) -> Option<DocumentMatch> {
        if self.must.is_some() {
            let primary = self.curr_must.take()?;
            let bonus = match verdict {
                Verdict::WithShould => self.curr_should.as_ref(),
                _ => None,
            };
            Some(self.scorer.score(primary, bonus))
        } else {
            let primary = self.curr_should.take()?;
            Some(self.scorer.score(primary, None::<&DocumentMatch>))
        }
    }
}

impl Searcher for BooleanSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if !self.initialized {
            self.init_searchers(ctx)?;
        }

        loop {
            let Some(current_id) = self.current_id.as_ref() else {
                return Ok(None);
            };

            if let Some(must_not) = self.must_not.as_deref_mut() {
                if align(must_not, &mut self.curr_must_not, current_id, ctx)? {
                    trace!("candidate {current_id} excluded by must-not clause");
                    self.advance_driving(ctx)?;
                    continue;
                }
            }

            let should_aligned = match self.should.as_deref_mut() {
                Some(should) => align(should, &mut self.curr_should, current_id, ctx)?,
                None => false,
            };

            let verdict = if should_aligned {
                Verdict::WithShould
            } else if self.should.as_ref().is_none_or(|s| s.min() == 0) {
                Verdict::DrivingOnly
            } else {
                Verdict::Rejected
            };

            if verdict == Verdict::Rejected {
                trace!("candidate {current_id} rejected, required should clause did not match");
                self.advance_driving(ctx)?;
                continue;
            }

            let rv = self.compose(verdict);
            if let Err(e) = self.advance_driving(ctx) {
                if let Some(m) = rv {
                    ctx.pool().put(m);
                }
                return Err(e);
            }
            if rv.is_some() {
                return Ok(rv);
            }
        }
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        target: &DocId,
    ) -> Result<Option<DocumentMatch>> {
        if !self.initialized {
            self.init_searchers(ctx)?;
        }

        if let Some(must) = self.must.as_deref_mut() {
            seek(must, &mut self.curr_must, target, ctx)?;
        }
        if let Some(should) = self.should.as_deref_mut() {
            seek(should, &mut self.curr_should, target, ctx)?;
        }
        if let Some(must_not) = self.must_not.as_deref_mut() {
            seek(must_not, &mut self.curr_must_not, target, ctx)?;
        }
        self.sync_current_id();

        self.next(ctx)
    }

    fn weight(&self) -> f64 {
        let mut rv = 0.0;
        if let Some(must) = &self.must {
            rv += must.weight();
        }
        if let Some(should) = &self.should {
            rv += should.weight();
        }
        rv
    }

    fn set_query_norm(&mut self, norm: f64) {
        if let Some(must) = self.must.as_deref_mut() {
            must.set_query_norm(norm);
        }
        if let Some(should) = self.should.as_deref_mut() {
            should.set_query_norm(norm);
        }
    }

    fn count(&self) -> u64 {
        // Worst case: must-not is not subtracted.
        let mut sum = 0;
        if let Some(must) = &self.must {
            sum += must.count();
        }
        if let Some(should) = &self.should {
            sum += should.count();
        }
        sum
    }

    fn close(&mut self, ctx: &mut SearchContext) -> Result<()> {
        recycle(ctx, &mut self.curr_must);
        recycle(ctx, &mut self.curr_should);
        recycle(ctx, &mut self.curr_must_not);

        // The first failing child aborts the close; later children stay open.
        if let Some(must) = self.must.as_deref_mut() {
            must.close(ctx)?;
        }
        if let Some(should) = self.should.as_deref_mut() {
            should.close(ctx)?;
        }
        if let Some(must_not) = self.must_not.as_deref_mut() {
            must_not.close(ctx)?;
        }
        Ok(())
    }

    fn document_match_pool_size(&self) -> usize {
        let mut rv = 3;
        if let Some(must) = &self.must {
            rv += must.document_match_pool_size();
        }
        if let Some(should) = &self.should {
            rv += should.document_match_pool_size();
        }
        if let Some(must_not) = &self.must_not {
            rv += must_not.document_match_pool_size();
        }
        rv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use crate::query::TermSearcher;

    fn index() -> Arc<MemoryIndex> {
        let mut index = MemoryIndex::new();
        for n in 1..=6u64 {
            let mut tokens = vec!["all"];
            if n % 2 == 0 {
                tokens.push("even");
            }
            if n % 3 == 0 {
                tokens.push("triple");
            }
            index.add_document(&DocId::from_u64(n), "body", &tokens);
        }
        Arc::new(index)
    }

    fn term(index: &MemoryIndex, text: &str) -> Option<Box<dyn Searcher>> {
        Some(Box::new(TermSearcher::new(index, "body", text, 1.0, false).unwrap()))
    }

    fn drain(searcher: &mut BooleanSearcher) -> Vec<u64> {
        let mut ctx = SearchContext::for_searcher(searcher);
        let mut ids = Vec::new();
        while let Some(m) = searcher.next(&mut ctx).unwrap() {
            ids.push(m.id().to_u64().unwrap());
            ctx.pool().put(m);
        }
        searcher.close(&mut ctx).unwrap();
        assert_eq!(ctx.pool().outstanding(), 0);
        ids
    }

    #[test]
    fn test_must_with_must_not() {
        let index = index();
        let mut searcher = BooleanSearcher::new(
            index.clone(),
            term(&index, "all"),
            None,
            term(&index, "even"),
            false,
        );
        assert_eq!(drain(&mut searcher), vec![1, 3, 5]);
    }

    #[test]
    fn test_should_only_drives() {
        let index = index();
        let mut searcher =
            BooleanSearcher::new(index.clone(), None, term(&index, "triple"), None, false);
        assert_eq!(drain(&mut searcher), vec![3, 6]);
    }

    #[test]
    fn test_must_not_only_matches_nothing() {
        let index = index();
        let mut searcher =
            BooleanSearcher::new(index.clone(), None, None, term(&index, "even"), false);
        assert!(drain(&mut searcher).is_empty());
        assert!(!searcher.query_norm().is_finite());
    }

    #[test]
    fn test_weight_count_and_pool_hint() {
        let index = index();
        let searcher = BooleanSearcher::new(
            index.clone(),
            term(&index, "all"),
            term(&index, "even"),
            term(&index, "triple"),
            false,
        );

        let all = TermSearcher::new(&*index, "body", "all", 1.0, false).unwrap();
        let even = TermSearcher::new(&*index, "body", "even", 1.0, false).unwrap();
        assert!((searcher.weight() - (all.weight() + even.weight())).abs() < 1e-12);
        assert!((searcher.query_norm() - 1.0 / searcher.weight().sqrt()).abs() < 1e-12);
        assert_eq!(searcher.count(), 6 + 3);
        assert_eq!(searcher.document_match_pool_size(), 3 + 1 + 1 + 1);
        assert_eq!(searcher.min(), 0);
    }

    #[test]
    fn test_explanation_is_built_when_enabled() {
        let index = index();
        let must = Some(Box::new(
            TermSearcher::new(&*index, "body", "all", 1.0, true).unwrap(),
        ) as Box<dyn Searcher>);
        let should = Some(Box::new(
            TermSearcher::new(&*index, "body", "even", 1.0, true).unwrap(),
        ) as Box<dyn Searcher>);
        let mut searcher = BooleanSearcher::new(index.clone(), must, should, None, true);
        let mut ctx = SearchContext::for_searcher(&searcher);

        let first = searcher.next(&mut ctx).unwrap().unwrap();
        assert_eq!(first.explanation().unwrap().details().len(), 1);
        ctx.pool().put(first);

        let second = searcher.next(&mut ctx).unwrap().unwrap();
        let expl = second.explanation().unwrap();
        assert_eq!(expl.description(), "sum of:");
        assert_eq!(expl.details().len(), 2);
        assert!((expl.value() - second.score()).abs() < 1e-12);
        ctx.pool().put(second);
    }
}
