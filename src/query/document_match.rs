//! Pooled document matches.
//!
//! A [`DocumentMatch`] can only be obtained from a [`DocumentMatchPool`] and is
//! neither `Clone` nor `Copy`: handing one to another component moves it, and
//! giving it back to the pool consumes it. A match therefore cannot be returned
//! twice or read after it has been returned.

use log::debug;

use crate::query::doc_id::DocId;
use crate::query::explanation::Explanation;

/// A scored hit for one document, produced by a searcher.
#[derive(Debug)]
pub struct DocumentMatch {
    /// The matching document.
    id: DocId,
    /// The score accumulated so far.
    score: f64,
    /// How the score was computed, when explanations are enabled.
    explanation: Option<Explanation>,
}

impl DocumentMatch {
    fn empty() -> Self {
        DocumentMatch {
            id: DocId::default(),
            score: 0.0,
            explanation: None,
        }
    }

    /// Get the document identifier.
    pub fn id(&self) -> &DocId {
        &self.id
    }

    /// Set the document identifier, reusing the match's id buffer.
    pub fn set_id(&mut self, id: &DocId) {
        self.id.copy_from(id);
    }

    /// Get the score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Set the score.
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// Get the explanation, if one was computed.
    pub fn explanation(&self) -> Option<&Explanation> {
        self.explanation.as_ref()
    }

    /// Set the explanation.
    pub fn set_explanation(&mut self, explanation: Option<Explanation>) {
        self.explanation = explanation;
    }

    /// Take the explanation out of the match.
    pub fn take_explanation(&mut self) -> Option<Explanation> {
        self.explanation.take()
    }

    fn reset(&mut self) {
        self.id.clear();
        self.score = 0.0;
        self.explanation = None;
    }
}

/// Counters describing the state of a [`DocumentMatchPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of matches the pool was pre-sized with.
    pub capacity: usize,
    /// Total number of matches ever allocated by the pool.
    pub allocated: usize,
    /// Matches currently sitting in the free list.
    pub available: usize,
    /// Matches handed out by `get` and not yet returned with `put`.
    pub outstanding: usize,
}

/// A per-query free list of [`DocumentMatch`] instances.
///
/// The pool is pre-sized from a searcher tree's
/// [`document_match_pool_size`](crate::query::Searcher::document_match_pool_size)
/// hint and grows on demand when the hint was too small.
#[derive(Debug)]
pub struct DocumentMatchPool {
    avail: Vec<DocumentMatch>,
    capacity: usize,
    allocated: usize,
    outstanding: usize,
}

impl DocumentMatchPool {
    /// Create a pool holding `size` pre-allocated matches.
    pub fn new(size: usize) -> Self {
        let avail = (0..size).map(|_| DocumentMatch::empty()).collect();
        DocumentMatchPool {
            avail,
            capacity: size,
            allocated: size,
            outstanding: 0,
        }
    }

    /// Take a match out of the pool, allocating a new one if the pool is empty.
    ///
    /// The returned match has an empty id, a zero score and no explanation.
    pub fn get(&mut self) -> DocumentMatch {
        self.outstanding += 1;
        match self.avail.pop() {
            Some(m) => m,
            None => {
                if self.allocated == self.capacity {
                    debug!(
                        "document match pool exhausted its initial size of {}, growing",
                        self.capacity
                    );
                }
                self.allocated += 1;
                DocumentMatch::empty()
            }
        }
    }

    /// Return a match to the pool.
    pub fn put(&mut self, mut m: DocumentMatch) {
        debug_assert!(
            self.outstanding > 0,
            "document match returned to a pool that did not hand it out"
        );
        self.outstanding = self.outstanding.saturating_sub(1);
        m.reset();
        self.avail.push(m);
    }

    /// Number of matches handed out and not yet returned.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Get the pool counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            allocated: self.allocated,
            available: self.avail.len(),
            outstanding: self.outstanding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_put() {
        let mut pool = DocumentMatchPool::new(2);
        assert_eq!(pool.stats().available, 2);

        let mut a = pool.get();
        let b = pool.get();
        assert_eq!(pool.outstanding(), 2);
        assert_eq!(pool.stats().available, 0);

        a.set_id(&DocId::from_u64(9));
        a.set_score(1.5);
        a.set_explanation(Some(Explanation::new("x", 1.5)));
        pool.put(a);
        pool.put(b);

        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.stats().available, 2);
        assert_eq!(pool.stats().allocated, 2);
    }

    #[test]
    fn test_recycled_match_is_reset() {
        let mut pool = DocumentMatchPool::new(1);
        let mut m = pool.get();
        m.set_id(&DocId::from_u64(3));
        m.set_score(2.0);
        m.set_explanation(Some(Explanation::new("x", 2.0)));
        pool.put(m);

        let m = pool.get();
        assert!(m.id().is_empty());
        assert_eq!(m.score(), 0.0);
        assert!(m.explanation().is_none());
    }

    #[test]
    fn test_pool_grows_past_capacity() {
        let mut pool = DocumentMatchPool::new(1);
        let a = pool.get();
        let b = pool.get();

        let stats = pool.stats();
        assert_eq!(stats.capacity, 1);
        assert_eq!(stats.allocated, 2);
        assert_eq!(stats.outstanding, 2);

        pool.put(a);
        pool.put(b);
        assert_eq!(pool.stats().available, 2);
    }
}
