//! Term searcher: the leaf of every query tree.

use std::sync::Arc;

use crate::error::Result;
use crate::index::{IndexReader, Posting};
use crate::query::context::SearchContext;
use crate::query::doc_id::DocId;
use crate::query::document_match::DocumentMatch;
use crate::query::scorer::TermScorer;
use crate::query::searcher::Searcher;

/// A searcher over the posting list of a single term.
///
/// Like Lucene's term query, the term is matched exactly and is NOT analyzed;
/// it must already be in its indexed form.
#[derive(Debug)]
pub struct TermSearcher {
    /// Postings of the term, sorted by document id.
    postings: Arc<Vec<Posting>>,
    /// Index of the posting last emitted, `None` before the first pull.
    cursor: Option<usize>,
    /// Scorer for this term.
    scorer: TermScorer,
}

impl TermSearcher {
    /// Create a new term searcher.
    ///
    /// A term missing from the index yields a searcher that matches nothing.
    pub fn new(
        reader: &dyn IndexReader,
        field: &str,
        term: &str,
        boost: f64,
        explain: bool,
    ) -> Result<Self> {
        let postings = reader
            .postings(field, term)?
            .unwrap_or_else(|| Arc::new(Vec::new()));
        let scorer = TermScorer::new(
            field,
            term,
            boost,
            reader.doc_count(),
            postings.len() as u64,
            explain,
        );

        Ok(TermSearcher {
            postings,
            cursor: None,
            scorer,
        })
    }

    fn emit(&mut self, ctx: &mut SearchContext, idx: usize) -> Option<DocumentMatch> {
        self.cursor = Some(idx.min(self.postings.len()));
        let posting = self.postings.get(idx)?;

        let (score, explanation) = self.scorer.score(posting.freq, posting.norm);
        let mut m = ctx.pool().get();
        m.set_id(&posting.id);
        m.set_score(score);
        m.set_explanation(explanation);
        Some(m)
    }
}

impl Searcher for TermSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        let idx = match self.cursor {
            None => 0,
            Some(current) => (current + 1).min(self.postings.len()),
        };
        Ok(self.emit(ctx, idx))
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        target: &DocId,
    ) -> Result<Option<DocumentMatch>> {
        // Never seek backwards: a cursor already at or past the target re-emits itself.
        let start = self.cursor.unwrap_or(0);
        let remaining = self.postings.get(start..).unwrap_or(&[]);
        let idx = start + remaining.partition_point(|p| &p.id < target);
        Ok(self.emit(ctx, idx))
    }

    fn weight(&self) -> f64 {
        self.scorer.weight()
    }

    fn set_query_norm(&mut self, norm: f64) {
        self.scorer.set_query_norm(norm);
    }

    fn count(&self) -> u64 {
        self.postings.len() as u64
    }

    fn close(&mut self, _ctx: &mut SearchContext) -> Result<()> {
        Ok(())
    }

    fn document_match_pool_size(&self) -> usize {
        1
    }
}
