//! Index reader boundary and an in-memory implementation.
//!
//! Searchers only see an index through the [`IndexReader`] trait. The
//! [`MemoryIndex`] keeps pre-tokenized postings in hash maps and is what the
//! CLI, the engine tests and the benchmarks run against.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{BoolSearchError, Result};
use crate::query::DocId;

/// One entry of a posting list.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// The document containing the term.
    pub id: DocId,
    /// Number of occurrences of the term in the field.
    pub freq: u32,
    /// Length normalization of the field, `1 / sqrt(field length)`.
    pub norm: f64,
}

/// Read access to an index snapshot.
pub trait IndexReader: Send + Sync + Debug {
    /// Get the posting list of `term` in `field`, sorted by document id.
    fn postings(&self, field: &str, term: &str) -> Result<Option<Arc<Vec<Posting>>>>;

    /// Total number of documents in the snapshot.
    fn doc_count(&self) -> u64;
}

/// A pre-tokenized document, as read from a JSON corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Numeric document id.
    pub id: u64,
    /// Field name to token list.
    pub fields: BTreeMap<String, Vec<String>>,
}

/// An in-memory inverted index.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    /// Field name to term to posting list.
    fields: AHashMap<String, AHashMap<String, Arc<Vec<Posting>>>>,
    /// Every document that has at least one indexed field.
    docs: AHashSet<DocId>,
}

impl MemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from pre-tokenized documents.
    pub fn from_documents<I>(docs: I) -> Self
    where
        I: IntoIterator<Item = IndexedDocument>,
    {
        let mut index = MemoryIndex::new();
        for doc in docs {
            let id = DocId::from_u64(doc.id);
            for (field, tokens) in &doc.fields {
                index.add_document(&id, field, tokens);
            }
        }
        index
    }

    /// Load a JSON array of [`IndexedDocument`]s from a file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let docs: Vec<IndexedDocument> = serde_json::from_str(&content)?;
        Ok(MemoryIndex::from_documents(docs))
    }

    /// Index the tokens of one field of a document.
    ///
    /// Indexing the same document and field again replaces the earlier postings
    /// for the terms that appear in `tokens`.
    pub fn add_document<S: AsRef<str>>(&mut self, id: &DocId, field: &str, tokens: &[S]) {
        if tokens.is_empty() {
            return;
        }
        let norm = 1.0 / (tokens.len() as f64).sqrt();

        let mut freqs: BTreeMap<&str, u32> = BTreeMap::new();
        for token in tokens {
            *freqs.entry(token.as_ref()).or_insert(0) += 1;
        }

        let terms = self.fields.entry(field.to_string()).or_default();
        for (term, freq) in freqs {
            let postings = Arc::make_mut(terms.entry(term.to_string()).or_default());
            let posting = Posting {
                id: id.clone(),
                freq,
                norm,
            };
            match postings.binary_search_by(|p| p.id.cmp(id)) {
                Ok(pos) => postings[pos] = posting,
                Err(pos) => postings.insert(pos, posting),
            }
        }
        self.docs.insert(id.clone());
    }

    /// Number of distinct terms in a field.
    pub fn term_count(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, |terms| terms.len())
    }
}

impl IndexReader for MemoryIndex {
    fn postings(&self, field: &str, term: &str) -> Result<Option<Arc<Vec<Posting>>>> {
        if field.is_empty() {
            return Err(BoolSearchError::index("field name must not be empty"));
        }
        Ok(self
            .fields
            .get(field)
            .and_then(|terms| terms.get(term))
            .cloned())
    }

    fn doc_count(&self) -> u64 {
        self.docs.len() as u64
    }
}
