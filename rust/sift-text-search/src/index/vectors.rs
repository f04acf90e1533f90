//! Occurrence coordinates and posting sets.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// One occurrence of a term: the document and the word position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vector {
    pub doc_id: u32,
    pub location: u32,
}

impl Vector {
    pub const fn new(doc_id: u32, location: u32) -> Self {
        Vector { doc_id, location }
    }
}

/// Set of occurrences of a single term (or phrase), with the derived set of
/// documents they belong to.
///
/// Vectors added through [`Vectors::add_phrase_vector`] are interior words of
/// a matched phrase. They are kept for highlighting but excluded from
/// [`Vectors::size`], so a phrase is counted once per occurrence rather than
/// once per word. A location added both ways counts as a plain occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vectors {
    locations: AHashSet<Vector>,
    docs: AHashSet<u32>,
    phrase_locations: AHashSet<Vector>,
}

impl Vectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an occurrence. Returns `false` if it was already present.
    ///
    /// A location known as a phrase vector becomes a counted occurrence.
    pub fn add_vector(&mut self, vector: Vector) -> bool {
        self.phrase_locations.remove(&vector);
        if !self.locations.insert(vector) {
            return false;
        }
        self.docs.insert(vector.doc_id);
        true
    }

    /// Inserts an interior phrase occurrence. Locations that are already
    /// present keep their role.
    pub fn add_phrase_vector(&mut self, vector: Vector) -> bool {
        if !self.locations.insert(vector) {
            return false;
        }
        self.docs.insert(vector.doc_id);
        self.phrase_locations.insert(vector);
        true
    }

    /// Number of counted occurrences: all locations minus phrase vectors.
    pub fn size(&self) -> usize {
        self.locations.len() - self.phrase_locations.len()
    }

    /// Number of locations including phrase vectors.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn phrase_vectors(&self) -> usize {
        self.phrase_locations.len()
    }

    pub fn is_phrase_vector(&self, vector: &Vector) -> bool {
        self.phrase_locations.contains(vector)
    }

    pub fn contains(&self, vector: &Vector) -> bool {
        self.locations.contains(vector)
    }

    pub fn locations(&self) -> &AHashSet<Vector> {
        &self.locations
    }

    pub fn docs(&self) -> &AHashSet<u32> {
        &self.docs
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn has_doc_id(&self, doc_id: u32) -> bool {
        self.docs.contains(&doc_id)
    }

    /// Word positions of all occurrences inside one document.
    pub fn word_positions(&self, doc_id: u32) -> impl Iterator<Item = u32> + '_ {
        self.locations
            .iter()
            .filter(move |v| v.doc_id == doc_id)
            .map(|v| v.location)
    }

    /// Occurrences ordered by document, then location.
    pub fn sorted(&self) -> Vec<Vector> {
        let mut sorted: Vec<Vector> = self.locations.iter().copied().collect();
        sorted.sort_unstable();
        sorted
    }

    /// Adds every location of `other`, keeping its phrase vectors apart.
    pub fn merge(&mut self, other: &Vectors) {
        for &vector in &other.locations {
            if other.is_phrase_vector(&vector) {
                self.add_phrase_vector(vector);
            } else {
                self.add_vector(vector);
            }
        }
    }
}

impl FromIterator<Vector> for Vectors {
    fn from_iter<I: IntoIterator<Item = Vector>>(iter: I) -> Self {
        let mut vectors = Vectors::new();
        for vector in iter {
            vectors.add_vector(vector);
        }
        vectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vector_is_idempotent() {
        let mut vectors = Vectors::new();
        assert!(vectors.add_vector(Vector::new(1, 1)));
        assert!(!vectors.add_vector(Vector::new(1, 1)));
        assert!(vectors.add_vector(Vector::new(2, 1)));
        assert_eq!(vectors.size(), 2);
        assert_eq!(vectors.doc_count(), 2);
        assert!(vectors.has_doc_id(2));
        assert!(!vectors.has_doc_id(3));
    }

    #[test]
    fn test_phrase_vectors_are_not_counted() {
        let mut vectors = Vectors::new();
        vectors.add_phrase_vector(Vector::new(1, 1));
        vectors.add_vector(Vector::new(1, 2));
        vectors.add_phrase_vector(Vector::new(1, 9));
        vectors.add_vector(Vector::new(1, 10));
        assert_eq!(vectors.len(), 4);
        assert_eq!(vectors.phrase_vectors(), 2);
        assert_eq!(vectors.size(), 2);

        // re-adding a known location leaves the counter alone
        assert!(!vectors.add_phrase_vector(Vector::new(1, 9)));
        assert!(!vectors.add_phrase_vector(Vector::new(1, 10)));
        assert_eq!(vectors.phrase_vectors(), 2);

        // a plain occurrence wins over a phrase vector
        assert!(!vectors.add_vector(Vector::new(1, 9)));
        assert!(!vectors.is_phrase_vector(&Vector::new(1, 9)));
        assert_eq!(vectors.phrase_vectors(), 1);
        assert_eq!(vectors.size(), 3);
    }

    #[test]
    fn test_merge_keeps_phrase_vectors() {
        let mut phrase = Vectors::new();
        phrase.add_phrase_vector(Vector::new(1, 1));
        phrase.add_vector(Vector::new(1, 2));

        let mut merged = Vectors::new();
        merged.merge(&phrase);
        merged.merge(&phrase);
        assert_eq!(merged, phrase);
        assert_eq!(merged.size(), 1);

        let plain: Vectors = [Vector::new(1, 1)].into_iter().collect();
        merged.merge(&plain);
        assert_eq!(merged.phrase_vectors(), 0);
        assert_eq!(merged.size(), 2);
    }

    #[test]
    fn test_merge() {
        let mut left: Vectors = [Vector::new(1, 1), Vector::new(1, 3)].into_iter().collect();
        let right: Vectors = [Vector::new(1, 3), Vector::new(2, 5)].into_iter().collect();
        left.merge(&right);
        left.merge(&right);
        assert_eq!(
            left.sorted(),
            vec![Vector::new(1, 1), Vector::new(1, 3), Vector::new(2, 5)]
        );
        assert_eq!(left.doc_count(), 2);
    }

    #[test]
    fn test_word_positions() {
        let vectors: Vectors = [Vector::new(1, 4), Vector::new(2, 7), Vector::new(1, 2)]
            .into_iter()
            .collect();
        let mut positions: Vec<u32> = vectors.word_positions(1).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![2, 4]);
    }
}
