//! Scoring implementations for ranking search results.
//!
//! [`TermScorer`] scores a single posting. [`ConjunctionScorer`] and
//! [`DisjunctionScorer`] fold the matches of several clauses at one document
//! into a single match, reusing the first constituent as the result so that
//! composition never pulls a new match out of the pool.

use crate::query::document_match::DocumentMatch;
use crate::query::explanation::Explanation;

/// TF-IDF scorer for a single term in a single field.
#[derive(Debug, Clone)]
pub struct TermScorer {
    /// The field the term was looked up in.
    field: String,
    /// The term text.
    term: String,
    /// The boost factor.
    boost: f64,
    /// Inverse document frequency of the term.
    idf: f64,
    /// Normalization factor pushed down from the enclosing query.
    query_norm: f64,
    /// `boost * idf * query_norm`.
    query_weight: f64,
    /// Whether to build explanations.
    explain: bool,
}

impl TermScorer {
    /// Create a new term scorer.
    pub fn new(
        field: impl Into<String>,
        term: impl Into<String>,
        boost: f64,
        doc_count: u64,
        doc_freq: u64,
        explain: bool,
    ) -> Self {
        let idf = 1.0 + (doc_count as f64 / (doc_freq as f64 + 1.0)).ln();
        TermScorer {
            field: field.into(),
            term: term.into(),
            boost,
            idf,
            query_norm: 1.0,
            query_weight: boost * idf,
            explain,
        }
    }

    /// Get the inverse document frequency.
    pub fn idf(&self) -> f64 {
        self.idf
    }

    /// Squared query weight before normalization.
    pub fn weight(&self) -> f64 {
        let w = self.boost * self.idf;
        w * w
    }

    /// Set the query normalization factor.
    pub fn set_query_norm(&mut self, norm: f64) {
        self.query_norm = norm;
        self.query_weight = self.boost * self.idf * norm;
    }

    /// Score one posting, returning the score and, if enabled, its explanation.
    pub fn score(&self, freq: u32, norm: f64) -> (f64, Option<Explanation>) {
        let tf = (freq as f64).sqrt();
        let field_score = tf * self.idf * norm;
        let score = field_score * self.query_weight;

        if !self.explain {
            return (score, None);
        }

        let mut field_expl = Explanation::new(
            format!("fieldWeight({}:{}), product of:", self.field, self.term),
            field_score,
        );
        field_expl.add_const(format!("tf(termFreq({}:{})={freq})", self.field, self.term), tf);
        field_expl.add_const(format!("idf({}:{})", self.field, self.term), self.idf);
        field_expl.add_const(format!("fieldNorm(field={})", self.field), norm);

        let mut query_expl = Explanation::new(
            format!("queryWeight({}:{}^{}), product of:", self.field, self.term, self.boost),
            self.query_weight,
        );
        query_expl.add_const("boost", self.boost);
        query_expl.add_const(format!("idf({}:{})", self.field, self.term), self.idf);
        query_expl.add_const("queryNorm", self.query_norm);

        let mut expl = Explanation::new(
            format!("weight({}:{}^{}), product of:", self.field, self.term, self.boost),
            score,
        );
        expl.add_detail(query_expl);
        expl.add_detail(field_expl);
        (score, Some(expl))
    }
}

/// Combines the matches of several clauses at one document by summing their scores.
#[derive(Debug, Clone, Copy)]
pub struct ConjunctionScorer {
    explain: bool,
}

impl ConjunctionScorer {
    /// Create a new conjunction scorer.
    pub fn new(explain: bool) -> Self {
        ConjunctionScorer { explain }
    }

    /// Check whether explanations are built.
    pub fn explain(&self) -> bool {
        self.explain
    }

    /// Fold `primary` and `others` into `primary`.
    ///
    /// All constituents must share one document id. `primary` is reused as the
    /// result; `others` are only read and stay owned by the caller.
    pub fn score<'a, I>(&self, mut primary: DocumentMatch, others: I) -> DocumentMatch
    where
        I: IntoIterator<Item = &'a DocumentMatch>,
    {
        let mut sum = primary.score();

        if self.explain {
            let mut expl = Explanation::new("sum of:", 0.0);
            if let Some(child) = primary.take_explanation() {
                expl.add_detail(child);
            }
            for other in others {
                sum += other.score();
                if let Some(child) = other.explanation() {
                    expl.add_detail(child.clone());
                }
            }
            expl.set_value(sum);
            primary.set_explanation(Some(expl));
        } else {
            for other in others {
                sum += other.score();
            }
        }

        primary.set_score(sum);
        primary
    }
}

/// Combines the matches of the children of a disjunction at one document.
///
/// The summed score is scaled by the coordination factor, the fraction of
/// children that matched.
#[derive(Debug, Clone, Copy)]
pub struct DisjunctionScorer {
    explain: bool,
}

impl DisjunctionScorer {
    /// Create a new disjunction scorer.
    pub fn new(explain: bool) -> Self {
        DisjunctionScorer { explain }
    }

    /// Fold `primary` and `others` into `primary`, scaled by `matched / total`.
    pub fn score<'a, I>(
        &self,
        mut primary: DocumentMatch,
        others: I,
        matched: usize,
        total: usize,
    ) -> DocumentMatch
    where
        I: IntoIterator<Item = &'a DocumentMatch>,
    {
        let coord = matched as f64 / total as f64;
        let mut sum = primary.score();

        if self.explain {
            let mut sum_expl = Explanation::new("sum of:", 0.0);
            if let Some(child) = primary.take_explanation() {
                sum_expl.add_detail(child);
            }
            for other in others {
                sum += other.score();
                if let Some(child) = other.explanation() {
                    sum_expl.add_detail(child.clone());
                }
            }
            sum_expl.set_value(sum);

            let mut expl = Explanation::new("product of:", sum * coord);
            expl.add_detail(sum_expl);
            expl.add_const(format!("coord({matched}/{total})"), coord);
            primary.set_explanation(Some(expl));
        } else {
            for other in others {
                sum += other.score();
            }
        }

        primary.set_score(sum * coord);
        primary
    }
}
