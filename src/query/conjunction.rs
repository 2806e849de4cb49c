//! Conjunction searcher: documents matched by every child.

use log::trace;

use crate::error::{BoolSearchError, Result};
use crate::query::context::SearchContext;
use crate::query::doc_id::DocId;
use crate::query::document_match::DocumentMatch;
use crate::query::scorer::ConjunctionScorer;
use crate::query::searcher::{Searcher, recycle, seek};

/// Intersects the streams of its children.
///
/// Children are ordered cheapest first, by [`Searcher::count`], so that the
/// sparsest stream drives the alignment.
#[derive(Debug)]
pub struct ConjunctionSearcher {
    searchers: Vec<Box<dyn Searcher>>,
    currs: Vec<Option<DocumentMatch>>,
    /// Largest id currently held by any child.
    max_id: DocId,
    scorer: ConjunctionScorer,
    initialized: bool,
}

impl ConjunctionSearcher {
    /// Create a new conjunction over `searchers`.
    pub fn new(mut searchers: Vec<Box<dyn Searcher>>, explain: bool) -> Result<Self> {
        if searchers.is_empty() {
            return Err(BoolSearchError::query(
                "conjunction requires at least one clause",
            ));
        }
        searchers.sort_by_key(|s| s.count());
        let currs = searchers.iter().map(|_| None).collect();

        Ok(ConjunctionSearcher {
            searchers,
            currs,
            max_id: DocId::default(),
            scorer: ConjunctionScorer::new(explain),
            initialized: false,
        })
    }

    fn init_searchers(&mut self, ctx: &mut SearchContext) -> Result<()> {
        for (searcher, curr) in self.searchers.iter_mut().zip(self.currs.iter_mut()) {
            recycle(ctx, curr);
            *curr = searcher.next(ctx)?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Record the largest current id; false if any child is exhausted.
    fn sync_max_id(&mut self) -> bool {
        let mut max: Option<&DocId> = None;
        for curr in &self.currs {
            match curr {
                None => return false,
                Some(m) => {
                    if max.is_none_or(|id| m.id() > id) {
                        max = Some(m.id());
                    }
                }
            }
        }
        match max {
            Some(id) => {
                self.max_id.copy_from(id);
                true
            }
            None => false,
        }
    }
}

impl Searcher for ConjunctionSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if !self.initialized {
            self.init_searchers(ctx)?;
        }

        'align: loop {
            if !self.sync_max_id() {
                return Ok(None);
            }

            for i in 0..self.searchers.len() {
                let behind = matches!(&self.currs[i], Some(m) if m.id() < &self.max_id);
                if !behind {
                    continue;
                }
                recycle(ctx, &mut self.currs[i]);
                self.currs[i] = self.searchers[i].advance(ctx, &self.max_id)?;
                match &self.currs[i] {
                    None => return Ok(None),
                    Some(m) if m.id() != &self.max_id => {
                        trace!("conjunction overshot to {}, realigning", m.id());
                        continue 'align;
                    }
                    Some(_) => {}
                }
            }

            let Some((first, rest)) = self.currs.split_first_mut() else {
                return Ok(None);
            };
            let Some(primary) = first.take() else {
                return Ok(None);
            };
            let rv = self.scorer.score(primary, rest.iter().flatten());

            // The first match moved into `rv`; only the driving child moves on.
            match self.searchers[0].next(ctx) {
                Ok(next) => self.currs[0] = next,
                Err(e) => {
                    ctx.pool().put(rv);
                    return Err(e);
                }
            }
            return Ok(Some(rv));
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
        for (searcher, curr) in self.searchers.iter_mut().zip(self.currs.iter_mut()) {
            seek(searcher.as_mut(), curr, target, ctx)?;
        }
        self.next(ctx)
    }

    fn weight(&self) -> f64 {
        self.searchers.iter().map(|s| s.weight()).sum()
    }

    fn set_query_norm(&mut self, norm: f64) {
        for searcher in &mut self.searchers {
            searcher.set_query_norm(norm);
        }
    }

    fn count(&self) -> u64 {
        // Worst case, like the boolean searcher.
        self.searchers.iter().map(|s| s.count()).sum()
    }

    fn close(&mut self, ctx: &mut SearchContext) -> Result<()> {
        for curr in &mut self.currs {
            recycle(ctx, curr);
        }
        for searcher in &mut self.searchers {
            searcher.close(ctx)?;
        }
        Ok(())
    }

    fn document_match_pool_size(&self) -> usize {
        self.searchers.len()
            + self
                .searchers
                .iter()
                .map(|s| s.document_match_pool_size())
                .sum::<usize>()
    }
}
