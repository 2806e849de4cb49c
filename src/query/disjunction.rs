//! Disjunction searcher: documents matched by at least `min` children.

use std::cmp::Ordering;

use log::trace;

use crate::error::{BoolSearchError, Result};
use crate::query::context::SearchContext;
use crate::query::doc_id::DocId;
use crate::query::document_match::DocumentMatch;
use crate::query::scorer::DisjunctionScorer;
use crate::query::searcher::{Searcher, recycle, seek};

/// Unions the streams of its children.
///
/// A document is emitted once at least `min` children are positioned on it.
/// With `min == 0` every document of every child qualifies.
#[derive(Debug)]
pub struct DisjunctionSearcher {
    searchers: Vec<Box<dyn Searcher>>,
    currs: Vec<Option<DocumentMatch>>,
    /// Indices of the children positioned at `current_id`.
    matching: Vec<usize>,
    current_id: Option<DocId>,
    min: usize,
    scorer: DisjunctionScorer,
    initialized: bool,
}

impl DisjunctionSearcher {
    /// Create a new disjunction over `searchers`.
    pub fn new(searchers: Vec<Box<dyn Searcher>>, min: usize, explain: bool) -> Result<Self> {
        if min > searchers.len() {
            return Err(BoolSearchError::query(format!(
                "disjunction min {} exceeds its {} clauses",
                min,
                searchers.len()
            )));
        }
        let currs = searchers.iter().map(|_| None).collect();
        let matching = Vec::with_capacity(searchers.len());

        Ok(DisjunctionSearcher {
            searchers,
            currs,
            matching,
            current_id: None,
            min,
            scorer: DisjunctionScorer::new(explain),
            initialized: false,
        })
    }

    fn init_searchers(&mut self, ctx: &mut SearchContext) -> Result<()> {
        for (searcher, curr) in self.searchers.iter_mut().zip(self.currs.iter_mut()) {
            recycle(ctx, curr);
            *curr = searcher.next(ctx)?;
        }
        self.update_matches();
        self.initialized = true;
        Ok(())
    }

    /// Move every child positioned on the current id to its next match.
    fn advance_matching(&mut self, ctx: &mut SearchContext) -> Result<()> {
        for &i in &self.matching {
            recycle(ctx, &mut self.currs[i]);
            self.currs[i] = self.searchers[i].next(ctx)?;
        }
        self.update_matches();
        Ok(())
    }

    /// Find the smallest current id and the children positioned on it.
    fn update_matches(&mut self) {
        self.matching.clear();
        let mut smallest: Option<&DocId> = None;

        for (i, curr) in self.currs.iter().enumerate() {
            let Some(m) = curr else {
                continue;
            };
            match smallest.map(|id| m.id().cmp(id)) {
                None | Some(Ordering::Less) => {
                    smallest = Some(m.id());
                    self.matching.clear();
                    self.matching.push(i);
                }
                Some(Ordering::Equal) => self.matching.push(i),
                Some(Ordering::Greater) => {}
            }
        }

        match smallest {
            Some(id) => match self.current_id.as_mut() {
                Some(current) => current.copy_from(id),
                None => self.current_id = Some(id.clone()),
            },
            None => self.current_id = None,
        }
    }
}

impl Searcher for DisjunctionSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if !self.initialized {
            self.init_searchers(ctx)?;
        }

        while self.current_id.is_some() {
            let mut rv = None;
            if self.matching.len() >= self.min {
                if let Some((&first, others)) = self.matching.split_first() {
                    rv = self.currs[first].take().map(|primary| {
                        self.scorer.score(
                            primary,
                            others.iter().filter_map(|&i| self.currs[i].as_ref()),
                            self.matching.len(),
                            self.searchers.len(),
                        )
                    });
                }
            } else {
                trace!(
                    "disjunction candidate matched {} of required {}",
                    self.matching.len(),
                    self.min
                );
            }

            if let Err(e) = self.advance_matching(ctx) {
                if let Some(m) = rv {
                    ctx.pool().put(m);
                }
                return Err(e);
            }

            if rv.is_some() {
                return Ok(rv);
            }
        }
        Ok(None)
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
        self.update_matches();
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

    fn min(&self) -> usize {
        self.min
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
