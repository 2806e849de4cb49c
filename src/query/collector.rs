//! Collector implementations for gathering search results.
//!
//! A collector sits above the searcher tree: [`collect_all`] pulls every match,
//! shows it to the collector, and hands it back to the pool straight away.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;

use serde::Serialize;

use crate::error::Result;
use crate::query::context::SearchContext;
use crate::query::doc_id::DocId;
use crate::query::document_match::DocumentMatch;
use crate::query::explanation::Explanation;
use crate::query::searcher::Searcher;

/// A collected hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// The document id.
    pub id: DocId,
    /// The relevance score.
    pub score: f64,
    /// The score explanation, when explanations were enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

/// Trait for collecting search results.
pub trait Collector: Debug {
    /// Collect a document match.
    fn collect(&mut self, hit: &DocumentMatch) -> Result<()>;

    /// Get the total number of hits collected.
    fn total_hits(&self) -> u64;

    /// Check if this collector needs more results.
    fn needs_more(&self) -> bool;

    /// Reset the collector for a new search.
    fn reset(&mut self);
}

/// Drain `searcher` into `collector`, then close the searcher.
///
/// Every match is recycled right after it has been collected.
pub fn collect_all(
    searcher: &mut dyn Searcher,
    ctx: &mut SearchContext,
    collector: &mut dyn Collector,
) -> Result<()> {
    while let Some(m) = searcher.next(ctx)? {
        let collected = collector.collect(&m);
        ctx.pool().put(m);
        collected?;
    }
    searcher.close(ctx)
}

/// A collector that keeps the top N documents by score.
#[derive(Debug)]
pub struct TopDocsCollector {
    /// Maximum number of documents to collect.
    max_docs: usize,
    /// Minimum score threshold.
    min_score: Option<f64>,
    /// Collected hits (min-heap based on score).
    hits: BinaryHeap<ScoredDoc>,
    /// Total number of documents processed.
    total_hits: u64,
}

/// A scored document for use in the heap.
#[derive(Debug, Clone)]
struct ScoredDoc {
    id: DocId,
    score: f64,
    explanation: Option<Explanation>,
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: lower scores come first, and among equal scores the higher id.
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl TopDocsCollector {
    /// Create a new top docs collector.
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            min_score: None,
            hits: BinaryHeap::with_capacity(max_docs),
            total_hits: 0,
        }
    }

    /// Create a new top docs collector with minimum score threshold.
    pub fn with_min_score(max_docs: usize, min_score: f64) -> Self {
        TopDocsCollector {
            min_score: Some(min_score),
            ..TopDocsCollector::new(max_docs)
        }
    }

    /// Get the maximum number of documents to collect.
    pub fn max_docs(&self) -> usize {
        self.max_docs
    }

    /// Get the hits, best first.
    pub fn results(&self) -> Vec<SearchHit> {
        let mut docs: Vec<&ScoredDoc> = self.hits.iter().collect();
        // The heap order is reversed: the "smallest" element is the best hit.
        docs.sort();

        docs.into_iter()
            .map(|doc| SearchHit {
                id: doc.id.clone(),
                score: doc.score,
                explanation: doc.explanation.clone(),
            })
            .collect()
    }
}

impl Collector for TopDocsCollector {
    fn collect(&mut self, hit: &DocumentMatch) -> Result<()> {
        self.total_hits += 1;

        if self.min_score.is_some_and(|min| hit.score() < min) || self.max_docs == 0 {
            return Ok(());
        }

        if self.hits.len() == self.max_docs {
            // Only replace the worst document with a strictly better one.
            match self.hits.peek() {
                Some(worst) if hit.score() > worst.score => {
                    self.hits.pop();
                }
                _ => return Ok(()),
            }
        }

        self.hits.push(ScoredDoc {
            id: hit.id().clone(),
            score: hit.score(),
            explanation: hit.explanation().cloned(),
        });
        Ok(())
    }

    fn total_hits(&self) -> u64 {
        self.total_hits
    }

    fn needs_more(&self) -> bool {
        self.hits.len() < self.max_docs
    }

    fn reset(&mut self) {
        self.hits.clear();
        self.total_hits = 0;
    }
}

/// A collector that just counts the number of matching documents.
#[derive(Debug, Default)]
pub struct CountCollector {
    /// Total number of documents that matched.
    count: u64,
}

impl CountCollector {
    /// Create a new count collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Collector for CountCollector {
    fn collect(&mut self, _hit: &DocumentMatch) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn total_hits(&self) -> u64 {
        self.count
    }

    fn needs_more(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}
