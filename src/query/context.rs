//! Per-query search context.

use crate::query::document_match::DocumentMatchPool;
use crate::query::searcher::Searcher;

/// State shared by every searcher of one query tree.
///
/// A context belongs to exactly one query evaluation and is threaded through
/// every `next`/`advance`/`close` call. It must not be shared between queries
/// that run concurrently.
#[derive(Debug)]
pub struct SearchContext {
    pool: DocumentMatchPool,
}

impl SearchContext {
    /// Create a context whose match pool is pre-sized to `pool_size`.
    pub fn new(pool_size: usize) -> Self {
        SearchContext {
            pool: DocumentMatchPool::new(pool_size),
        }
    }

    /// Create a context sized from the searcher tree's pool hint.
    pub fn for_searcher(searcher: &dyn Searcher) -> Self {
        SearchContext::new(searcher.document_match_pool_size())
    }

    /// Get the document match pool.
    pub fn pool(&mut self) -> &mut DocumentMatchPool {
        &mut self.pool
    }

    /// Get the document match pool without mutable access.
    pub fn pool_ref(&self) -> &DocumentMatchPool {
        &self.pool
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        SearchContext::new(0)
    }
}
