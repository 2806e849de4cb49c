//! High-level search engine that runs query plans against an index reader.

use std::sync::Arc;
use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::IndexReader;
use crate::query::{
    Collector, CountCollector, QueryPlan, SearchContext, SearchHit, Searcher, TopDocsCollector,
    collect_all,
};

/// Search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// The search hits, best first.
    pub hits: Vec<SearchHit>,
    /// Total number of matching documents.
    pub total_hits: u64,
    /// Maximum score in the results.
    pub max_score: f64,
}

/// Runs query plans against one index snapshot.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    /// The index snapshot.
    reader: Arc<dyn IndexReader>,
    /// Execution settings.
    config: SearchConfig,
}

impl SearchEngine {
    /// Create a new search engine.
    pub fn new(reader: Arc<dyn IndexReader>, config: SearchConfig) -> Self {
        SearchEngine { reader, config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get the index reader.
    pub fn reader(&self) -> &Arc<dyn IndexReader> {
        &self.reader
    }

    /// Execute a plan and return the top hits.
    pub fn search(&self, plan: &QueryPlan) -> Result<SearchResults> {
        let start = Instant::now();
        let mut searcher = plan.searcher(&self.reader, self.config.explain)?;
        let mut collector = match self.config.min_score {
            Some(min) => TopDocsCollector::with_min_score(self.config.max_results, min),
            None => TopDocsCollector::new(self.config.max_results),
        };

        let ctx = self.run(searcher.as_mut(), &mut collector)?;

        let hits = collector.results();
        let max_score = hits.iter().map(|h| h.score).fold(0.0, f64::max);
        debug!(
            "search matched {} documents, returning {} in {:?} (pool {:?})",
            collector.total_hits(),
            hits.len(),
            start.elapsed(),
            ctx.pool_ref().stats()
        );

        Ok(SearchResults {
            total_hits: collector.total_hits(),
            hits,
            max_score,
        })
    }

    /// Count the documents matching a plan.
    pub fn count(&self, plan: &QueryPlan) -> Result<u64> {
        let mut searcher = plan.searcher(&self.reader, false)?;
        let mut collector = CountCollector::new();
        self.run(searcher.as_mut(), &mut collector)?;
        Ok(collector.total_hits())
    }

    fn run(&self, searcher: &mut dyn Searcher, collector: &mut dyn Collector) -> Result<SearchContext> {
        let mut ctx = match self.config.pool_size {
            Some(size) => SearchContext::new(size),
            None => SearchContext::for_searcher(searcher),
        };
        collect_all(searcher, &mut ctx, collector)?;
        Ok(ctx)
    }
}
