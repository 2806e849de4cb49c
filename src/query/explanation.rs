//! Score explanations.
//!
//! When a query runs with explanations enabled, every searcher attaches an
//! [`Explanation`] to the matches it produces. Composite searchers nest the
//! explanations of their clauses, so the tree mirrors the searcher tree that
//! scored the document.

use std::fmt;

use serde::Serialize;

/// One node of a score breakdown: a value, what produced it, and the values
/// it was computed from.
#[derive(Clone, PartialEq, Serialize)]
pub struct Explanation {
    value: f64,
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<Explanation>,
}

impl fmt::Debug for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Explanation({})", self.to_pretty_json())
    }
}

impl Explanation {
    /// Create a leaf node.
    pub fn new<T: ToString>(description: T, value: f64) -> Explanation {
        Explanation {
            value,
            description: description.to_string(),
            details: Vec::new(),
        }
    }

    /// Get the value of this node.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value, once all details have been folded in.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Get the description, e.g. `sum of:` or `idf(body:rust)`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the nodes this value was computed from.
    pub fn details(&self) -> &[Explanation] {
        &self.details
    }

    /// Append a sub-tree.
    pub fn add_detail(&mut self, detail: Explanation) {
        self.details.push(detail);
    }

    /// Append a named constant as a leaf.
    pub fn add_const<T: ToString>(&mut self, name: T, value: f64) {
        self.details.push(Explanation::new(name, value));
    }

    /// Render the tree as indented JSON.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}
