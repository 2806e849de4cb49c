//! Searchers, scoring and match pooling for boolean query evaluation.

pub mod boolean;
pub mod collector;
pub mod conjunction;
pub mod context;
pub mod disjunction;
pub mod doc_id;
pub mod document_match;
pub mod explanation;
pub mod plan;
pub mod scorer;
pub mod searcher;
pub mod term;

pub use self::boolean::BooleanSearcher;
pub use self::collector::{Collector, CountCollector, SearchHit, TopDocsCollector, collect_all};
pub use self::conjunction::ConjunctionSearcher;
pub use self::context::SearchContext;
pub use self::disjunction::DisjunctionSearcher;
pub use self::doc_id::DocId;
pub use self::document_match::{DocumentMatch, DocumentMatchPool, PoolStats};
pub use self::explanation::Explanation;
pub use self::plan::QueryPlan;
pub use self::scorer::{ConjunctionScorer, DisjunctionScorer, TermScorer};
pub use self::searcher::Searcher;
pub use self::term::TermSearcher;
