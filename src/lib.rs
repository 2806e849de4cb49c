//! # Boolsearch
//!
//! Boolean query evaluation over sorted posting lists.
//!
//! ## Features
//!
//! - Must / should / must-not merge join over any searcher tree
//! - Term, conjunction and disjunction searchers
//! - Pooled, move-only document matches
//! - TF-IDF scoring with optional explanations
//! - In-memory index and a JSON query plan format

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;

pub mod prelude {
    pub use crate::config::SearchConfig;
    pub use crate::engine::{SearchEngine, SearchResults};
    pub use crate::error::{BoolSearchError, Result};
    pub use crate::index::{IndexReader, MemoryIndex};
    pub use crate::query::{DocId, DocumentMatch, QueryPlan, SearchContext, Searcher};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
