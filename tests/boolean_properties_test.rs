//! Property tests for BooleanSearcher against a set-based model.

use std::collections::BTreeSet;
use std::sync::Arc;

use boolsearch::index::MemoryIndex;
use boolsearch::query::{
    BooleanSearcher, ConjunctionSearcher, DisjunctionSearcher, DocId, DocumentMatch,
    SearchContext, Searcher, TermSearcher,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Clauses {
    must: BTreeSet<u64>,
    should: BTreeSet<u64>,
    must_not: BTreeSet<u64>,
}

/// How the must clause is built. Every shape matches the same documents.
#[derive(Debug, Clone, Copy)]
enum MustShape {
    Absent,
    Term,
    Conjunction,
    Nested,
}

#[derive(Debug, Clone, Copy)]
struct Shape {
    must: MustShape,
    required_should: bool,
}

fn id_set() -> impl Strategy<Value = BTreeSet<u64>> {
    prop::collection::btree_set(0u64..64, 0..24)
}

fn clauses() -> impl Strategy<Value = Clauses> {
    (id_set(), id_set(), id_set()).prop_map(|(must, should, must_not)| Clauses {
        must,
        should,
        must_not,
    })
}

fn shape() -> impl Strategy<Value = Shape> {
    let must = prop_oneof![
        Just(MustShape::Absent),
        Just(MustShape::Term),
        Just(MustShape::Conjunction),
        Just(MustShape::Nested),
    ];
    (must, any::<bool>()).prop_map(|(must, required_should)| Shape {
        must,
        required_should,
    })
}

fn build_index(clauses: &Clauses) -> Arc<MemoryIndex> {
    let mut index = MemoryIndex::new();
    for id in 0u64..64 {
        let mut tokens = vec!["all"];
        if clauses.must.contains(&id) {
            tokens.push("must");
        }
        if clauses.should.contains(&id) {
            tokens.push("should");
        }
        if clauses.must_not.contains(&id) {
            tokens.push("not");
        }
        index.add_document(&DocId::from_u64(id), "body", &tokens);
    }
    Arc::new(index)
}

fn term(index: &MemoryIndex, text: &str) -> Box<dyn Searcher> {
    Box::new(TermSearcher::new(index, "body", text, 1.0, false).unwrap())
}

fn must_clause(index: &Arc<MemoryIndex>, shape: MustShape) -> Option<Box<dyn Searcher>> {
    match shape {
        MustShape::Absent => None,
        MustShape::Term => Some(term(index, "must")),
        MustShape::Conjunction => Some(Box::new(
            ConjunctionSearcher::new(vec![term(index, "must"), term(index, "all")], false).unwrap(),
        )),
        MustShape::Nested => Some(Box::new(BooleanSearcher::new(
            index.clone(),
            Some(term(index, "must")),
            None,
            None,
            false,
        ))),
    }
}

/// Build a boolean searcher; a required should clause is a min-1 disjunction.
fn searcher(index: &Arc<MemoryIndex>, shape: Shape) -> BooleanSearcher {
    let should: Box<dyn Searcher> = if shape.required_should {
        Box::new(DisjunctionSearcher::new(vec![term(index, "should")], 1, false).unwrap())
    } else {
        term(index, "should")
    };
    BooleanSearcher::new(
        index.clone(),
        must_clause(index, shape.must),
        Some(should),
        Some(term(index, "not")),
        false,
    )
}

fn pair(m: &DocumentMatch) -> (u64, f64) {
    (m.id().to_u64().unwrap(), m.score())
}

fn drain_with(searcher: &mut BooleanSearcher, ctx: &mut SearchContext) -> Vec<(u64, f64)> {
    let mut hits = Vec::new();
    while let Some(m) = searcher.next(ctx).unwrap() {
        hits.push(pair(&m));
        ctx.pool().put(m);
    }
    hits
}

fn drain(searcher: &mut BooleanSearcher) -> Vec<(u64, f64)> {
    let mut ctx = SearchContext::for_searcher(searcher);
    let hits = drain_with(searcher, &mut ctx);
    searcher.close(&mut ctx).unwrap();
    assert_eq!(ctx.pool().outstanding(), 0);
    hits
}

fn expected(clauses: &Clauses, shape: Shape) -> Vec<u64> {
    let driving = match shape.must {
        MustShape::Absent => &clauses.should,
        _ => &clauses.must,
    };
    driving
        .iter()
        .copied()
        .filter(|id| !clauses.must_not.contains(id))
        .filter(|id| !shape.required_should || clauses.should.contains(id))
        .collect()
}

fn same_hits(got: &[(u64, f64)], want: &[(u64, f64)]) -> bool {
    got.len() == want.len()
        && got
            .iter()
            .zip(want)
            .all(|(g, w)| g.0 == w.0 && (g.1 - w.1).abs() < 1e-9)
}

proptest! {
    #[test]
    fn matches_follow_the_set_model(clauses in clauses(), shape in shape()) {
        let index = build_index(&clauses);
        let hits = drain(&mut searcher(&index, shape));

        let ids: Vec<u64> = hits.iter().map(|(id, _)| *id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids not increasing: {:?}", ids);
        prop_assert_eq!(ids, expected(&clauses, shape));
    }

    #[test]
    fn advance_matches_next_stream(
        clauses in clauses(),
        shape in shape(),
        skip in 0usize..4,
        target in 0u64..70,
    ) {
        let index = build_index(&clauses);
        let full = drain(&mut searcher(&index, shape));
        let skip = skip.min(full.len());

        let mut skipping = searcher(&index, shape);
        let mut ctx = SearchContext::for_searcher(&skipping);
        let mut seen = Vec::new();
        for _ in 0..skip {
            let m = skipping.next(&mut ctx).unwrap().unwrap();
            seen.push(pair(&m));
            ctx.pool().put(m);
        }
        prop_assert!(same_hits(&seen, &full[..skip]));

        // A target at or behind the last emitted id yields the next match in the stream.
        let rest = &full[skip..];
        let want: Vec<(u64, f64)> = rest.iter().copied().filter(|(id, _)| *id >= target).collect();

        let got = skipping.advance(&mut ctx, &DocId::from_u64(target)).unwrap();
        let mut tail: Vec<(u64, f64)> = got.iter().map(pair).collect();
        if let Some(m) = got {
            ctx.pool().put(m);
        }
        tail.extend(drain_with(&mut skipping, &mut ctx));

        prop_assert!(same_hits(&tail, &want), "advance to {} after {} gave {:?}, stream gave {:?}", target, skip, tail, want);

        skipping.close(&mut ctx).unwrap();
        prop_assert_eq!(ctx.pool().outstanding(), 0);
    }
}
