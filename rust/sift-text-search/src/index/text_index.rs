//! In-memory inverted index over tokenized text.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use sift_common::{Result, error::Error};

use super::vectors::{Vector, Vectors};
use crate::analysis::{TokenStream, Tokenizer};
use crate::fuzziness::DistanceKind;

/// Inverted index mapping normalized terms to their occurrences.
///
/// Documents are appended one text at a time. Every indexable token of the
/// text is recorded under its normal form at its word position. The index is
/// not synchronized: mutation takes `&mut self` and searching takes `&self`,
/// so callers sharing an index across threads wrap it in a lock or swap
/// immutable snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextIndex {
    terms: AHashMap<String, Vectors>,
    doc_count: u32,
    docs: AHashSet<u32>,
    #[serde(default)]
    distance: DistanceKind,
    #[serde(skip)]
    tokenizer: Tokenizer,
}

impl TextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index whose fuzzy leaves use the given calculator.
    pub fn with_distance(distance: DistanceKind) -> Self {
        TextIndex {
            distance,
            ..Self::default()
        }
    }

    pub fn distance(&self) -> DistanceKind {
        self.distance
    }

    /// Indexes `text` as one document.
    ///
    /// # Arguments
    /// * `text` - Document content
    /// * `doc_id` - Explicit document id, or `None` to allocate the next one
    ///
    /// # Returns
    /// The id of the document the text was recorded under.
    pub fn append_string(&mut self, text: &str, doc_id: Option<u32>) -> Result<u32> {
        let stream = self.tokenizer.collect_stream(text);
        self.append_stream(&stream, doc_id)
    }

    /// Indexes UTF-8 bytes as one document. Invalid sequences are replaced
    /// with U+FFFD before tokenizing.
    pub fn append_bytes(&mut self, bytes: &[u8], doc_id: Option<u32>) -> Result<u32> {
        let text = String::from_utf8_lossy(bytes);
        self.append_string(&text, doc_id)
    }

    /// Indexes an already tokenized text as one document.
    pub fn append_stream(&mut self, stream: &TokenStream, doc_id: Option<u32>) -> Result<u32> {
        let doc_id = self.allocate_doc_id(doc_id);
        let mut added = 0usize;
        for token in stream.indexable() {
            self.insert(token.normal(), Vector::new(doc_id, token.word_position()));
            added += 1;
        }
        log::debug!(
            "indexed {added} tokens into document {doc_id}, {} terms in total",
            self.terms.len()
        );
        Ok(doc_id)
    }

    /// Records a single occurrence of `term`.
    ///
    /// The term is normalized before it is recorded.
    ///
    /// # Errors
    /// Returns an [`Error::invalid_arg`] if the term is empty after
    /// normalization.
    pub fn add_term(&mut self, term: &str, doc_id: u32, position: u32) -> Result<()> {
        let normal = self.tokenizer.analyzer().transform(term);
        if normal.is_empty() {
            return Err(Error::invalid_arg(
                "term",
                format!("cannot index empty term '{term}'"),
            ));
        }
        self.allocate_doc_id(Some(doc_id));
        self.insert(&normal, Vector::new(doc_id, position));
        Ok(())
    }

    /// Clears all terms and documents. The distance setting is kept.
    pub fn reset(&mut self) {
        self.terms.clear();
        self.docs.clear();
        self.doc_count = 0;
    }

    /// Highest document id seen or allocated so far.
    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    pub fn docs(&self) -> &AHashSet<u32> {
        &self.docs
    }

    pub fn has_doc_id(&self, doc_id: u32) -> bool {
        self.docs.contains(&doc_id)
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn vectors(&self, term: &str) -> Option<&Vectors> {
        self.terms.get(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &Vectors)> {
        self.terms.iter().map(|(term, vectors)| (term.as_str(), vectors))
    }

    pub(crate) fn postings(&self) -> &AHashMap<String, Vectors> {
        &self.terms
    }

    fn allocate_doc_id(&mut self, doc_id: Option<u32>) -> u32 {
        let doc_id = match doc_id {
            Some(doc_id) => doc_id,
            None => self.doc_count.saturating_add(1),
        };
        self.doc_count = self.doc_count.max(doc_id);
        self.docs.insert(doc_id);
        doc_id
    }

    fn insert(&mut self, term: &str, vector: Vector) {
        match self.terms.get_mut(term) {
            Some(vectors) => {
                vectors.add_vector(vector);
            }
            None => {
                let mut vectors = Vectors::new();
                vectors.add_vector(vector);
                self.terms.insert(term.to_string(), vectors);
            }
        }
    }
}
