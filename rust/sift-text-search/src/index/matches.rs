//! Accumulator for the hits of one search.

use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use super::vectors::Vectors;

/// Terms (and phrases) hit by a query, with their frequencies and occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matches {
    term_frequency: AHashMap<String, usize>,
    term_vectors: AHashMap<String, Vectors>,
    vectors: Vectors,
}

impl Matches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the occurrences of `term`.
    ///
    /// The frequency of the term grows by `vectors.size()`. Empty occurrence
    /// sets are skipped.
    pub fn append_term(&mut self, term: &str, vectors: &Vectors) {
        if vectors.size() == 0 {
            return;
        }
        *self.term_frequency.entry(term.to_string()).or_default() += vectors.size();
        self.term_vectors
            .entry(term.to_string())
            .or_default()
            .merge(vectors);
        self.vectors.merge(vectors);
    }

    /// Folds `other` into this accumulator, summing the frequencies of shared
    /// terms.
    pub fn merge(&mut self, other: &Matches) {
        for (term, count) in &other.term_frequency {
            *self.term_frequency.entry(term.clone()).or_default() += count;
        }
        for (term, vectors) in &other.term_vectors {
            self.term_vectors
                .entry(term.clone())
                .or_default()
                .merge(vectors);
        }
        self.vectors.merge(&other.vectors);
    }

    pub fn is_empty(&self) -> bool {
        self.term_frequency.is_empty()
    }

    /// Sum of all term frequencies.
    pub fn total(&self) -> usize {
        self.term_frequency.values().sum()
    }

    /// Number of distinct terms hit.
    pub fn term_count(&self) -> usize {
        self.term_frequency.len()
    }

    /// Number of distinct documents hit.
    pub fn doc_count(&self) -> usize {
        self.vectors.doc_count()
    }

    pub fn has_doc_id(&self, doc_id: u32) -> bool {
        self.vectors.has_doc_id(doc_id)
    }

    pub fn frequency(&self, term: &str) -> usize {
        self.term_frequency.get(term).copied().unwrap_or(0)
    }

    pub fn term_frequency(&self) -> &AHashMap<String, usize> {
        &self.term_frequency
    }

    pub fn term_vectors(&self) -> &AHashMap<String, Vectors> {
        &self.term_vectors
    }

    /// All occurrences hit, across terms.
    pub fn vectors(&self) -> &Vectors {
        &self.vectors
    }

    /// Word positions hit inside one document.
    pub fn word_positions(&self, doc_id: u32) -> AHashSet<u32> {
        self.vectors.word_positions(doc_id).collect()
    }
}
