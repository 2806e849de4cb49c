//! The contract every searcher of a query tree implements.

use std::fmt::Debug;

use crate::error::Result;
use crate::query::context::SearchContext;
use crate::query::doc_id::DocId;
use crate::query::document_match::DocumentMatch;

/// A stateful cursor over document matches in strictly increasing id order.
///
/// Leaf searchers, conjunctions, disjunctions and boolean searchers all
/// implement this trait, so any of them can be used as a clause of another.
pub trait Searcher: Send + Debug {
    /// Move past the current position and return the next match.
    ///
    /// Returns `Ok(None)` once the stream is exhausted, and keeps doing so on
    /// every later call. The returned match is owned by the caller, who is
    /// responsible for handing it back to the context's pool.
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>>;

    /// Return the first match whose id is greater than or equal to `target`.
    ///
    /// If the searcher is already positioned at or past `target`, the current
    /// position is returned again rather than consumed.
    fn advance(&mut self, ctx: &mut SearchContext, target: &DocId)
    -> Result<Option<DocumentMatch>>;

    /// The sum of squared weights of this subtree, used for query normalization.
    fn weight(&self) -> f64;

    /// Push a normalization factor down to the leaves.
    fn set_query_norm(&mut self, norm: f64);

    /// Upper bound on the number of matches this searcher can produce.
    fn count(&self) -> u64;

    /// Release held matches and close children, stopping at the first error.
    fn close(&mut self, ctx: &mut SearchContext) -> Result<()>;

    /// Minimum number of children that must match, for disjunctive searchers.
    fn min(&self) -> usize {
        0
    }

    /// Number of pooled matches this subtree may keep alive at once.
    fn document_match_pool_size(&self) -> usize;
}

/// Hand a held match back to the pool, leaving the slot empty.
pub(crate) fn recycle(ctx: &mut SearchContext, slot: &mut Option<DocumentMatch>) {
    if let Some(m) = slot.take() {
        ctx.pool().put(m);
    }
}

/// Move `searcher` forward to `target` if the match held in `slot` is behind it.
///
/// A held match already at or past `target` is kept: a composite child has
/// pre-fetched past it, so asking the child again would lose it. An empty slot
/// means the searcher is exhausted and is left alone.
pub(crate) fn seek(
    searcher: &mut dyn Searcher,
    slot: &mut Option<DocumentMatch>,
    target: &DocId,
    ctx: &mut SearchContext,
) -> Result<()> {
    if matches!(slot, Some(m) if m.id() < target) {
        recycle(ctx, slot);
        *slot = searcher.advance(ctx, target)?;
    }
    Ok(())
}

/// [`seek`] to `target`, then report whether the slot holds a match exactly at it.
pub(crate) fn align(
    searcher: &mut dyn Searcher,
    slot: &mut Option<DocumentMatch>,
    target: &DocId,
    ctx: &mut SearchContext,
) -> Result<bool> {
    seek(searcher, slot, target, ctx)?;
    Ok(matches!(slot, Some(m) if m.id() == target))
}
