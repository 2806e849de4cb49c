//! Configuration for query execution.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Whether to build score explanations.
    pub explain: bool,

    /// Maximum number of hits to return.
    pub max_results: usize,

    /// Minimum score threshold.
    pub min_score: Option<f64>,

    /// Initial size of the document match pool.
    /// If None, uses the searcher tree's pool size hint.
    pub pool_size: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            explain: false,
            max_results: 10,
            min_score: None,
            pool_size: None,
        }
    }
}

impl SearchConfig {
    /// Create a new SearchConfig with the specified max_results.
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            ..Default::default()
        }
    }

    /// Enable or disable score explanations.
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Set the minimum score threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Set the initial pool size.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = Some(pool_size);
        self
    }

    /// Load a configuration from a JSON file.
    ///
    /// Fields missing from the file keep their default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }
}
