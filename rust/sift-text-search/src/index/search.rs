//! Evaluation of query trees against a [`TextIndex`].
//!
//! A boolean composite is evaluated clause list by clause list:
//!
//! - **must_not**: every clause has to fail as a positive match;
//! - **must**: every clause has to match;
//! - **should**: at least one clause has to match when the list is not empty.
//!
//! Hits of a composite are collected into a local [`Matches`] and merged into
//! the caller's accumulator only when the whole composite matches, so a
//! failing branch never leaks partial hits.
//!
//! The field of a leaf is not consulted: the index covers a single text
//! field.

use sift_common::{Result, error::Error};

use super::matches::Matches;
use super::phrase::find_phrases;
use super::text_index::TextIndex;
use crate::query::{BoolQuery, LeafKind, LeafQuery, QueryTerm, Wildcard};

impl TextIndex {
    /// Evaluates `query` and returns its hits.
    ///
    /// A query that does not match yields empty [`Matches`]. So does a query
    /// that matches through exclusions only; use [`TextIndex::evaluate`] to
    /// tell the two apart.
    ///
    /// # Errors
    /// Returns an invalid query error when a `must_not` leaf is not marked
    /// prohibited, independently of the indexed content.
    pub fn search(&self, query: &QueryTerm) -> Result<Matches> {
        Ok(self.evaluate(query)?.unwrap_or_default())
    }

    /// Whether `query` matches the indexed content.
    pub fn matches(&self, query: &QueryTerm) -> Result<bool> {
        Ok(self.evaluate(query)?.is_some())
    }

    /// Evaluates `query`, returning `None` when it does not match.
    pub fn evaluate(&self, query: &QueryTerm) -> Result<Option<Matches>> {
        verify_exclusions(query)?;
        let mut hits = Matches::new();
        if self.match_term(query, &mut hits) {
            Ok(Some(hits))
        } else {
            Ok(None)
        }
    }

    fn match_term(&self, query: &QueryTerm, hits: &mut Matches) -> bool {
        match query {
            QueryTerm::Bool(query) => self.match_bool(query, hits),
            QueryTerm::Leaf(leaf) => self.match_leaf(leaf, hits),
        }
    }

    fn match_bool(&self, query: &BoolQuery, hits: &mut Matches) -> bool {
        for clause in query.must_not() {
            let mut excluded = Matches::new();
            let matched = match clause {
                QueryTerm::Bool(nested) => self.match_bool(nested, &mut excluded),
                QueryTerm::Leaf(leaf) => self.match_positive(leaf, &mut excluded),
            };
            if matched {
                return false;
            }
        }

        let mut local = Matches::new();
        for clause in query.must() {
            if !self.match_term(clause, &mut local) {
                return false;
            }
        }

        if !query.should().is_empty() {
            let mut any = false;
            for clause in query.should() {
                any |= self.match_term(clause, &mut local);
            }
            if !any {
                return false;
            }
        }

        hits.merge(&local);
        true
    }

    /// Matches a leaf inside `must` or `should`. A prohibited leaf succeeds
    /// exactly when its positive match fails and contributes no hits.
    fn match_leaf(&self, leaf: &LeafQuery, hits: &mut Matches) -> bool {
        if leaf.is_prohibited() {
            let mut excluded = Matches::new();
            !self.match_positive(leaf, &mut excluded)
        } else {
            self.match_positive(leaf, hits)
        }
    }

    fn match_positive(&self, leaf: &LeafQuery, hits: &mut Matches) -> bool {
        let value = leaf.value();
        let matched = match leaf.kind() {
            LeafKind::Term => self.match_exact(value, hits),
            LeafKind::Wildcard(wildcard) => self.match_scan(hits, |term| match wildcard {
                Wildcard::Prefix => term.starts_with(value),
                Wildcard::Suffix => term.ends_with(value),
            }),
            LeafKind::Fuzzy { distance } => {
                let fuzziness = distance as usize;
                self.match_scan(hits, |term| {
                    self.distance().is_fuzzy_match(term, value, fuzziness)
                })
            }
            LeafKind::Phrase { slop } => self.match_phrase(value, slop, hits),
        };
        log::trace!(
            "{} {value:?} {}",
            leaf.query_type(),
            if matched { "matched" } else { "did not match" }
        );
        matched
    }

    fn match_exact(&self, term: &str, hits: &mut Matches) -> bool {
        match self.vectors(term) {
            Some(vectors) => {
                hits.append_term(term, vectors);
                true
            }
            None => false,
        }
    }

    /// Scans the whole vocabulary and appends every term accepted by
    /// `accept`.
    fn match_scan(&self, hits: &mut Matches, accept: impl Fn(&str) -> bool) -> bool {
        let mut matched = false;
        for (term, vectors) in self.terms() {
            if accept(term) {
                hits.append_term(term, vectors);
                matched = true;
            }
        }
        matched
    }

    fn match_phrase(&self, phrase: &str, slop: u32, hits: &mut Matches) -> bool {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        match words.as_slice() {
            [] => false,
            [word] => self.match_exact(word, hits),
            _ => match find_phrases(self.postings(), &words, slop) {
                Some(found) => {
                    for (phrase, vectors) in &found {
                        hits.append_term(phrase, vectors);
                    }
                    true
                }
                None => false,
            },
        }
    }
}

/// Rejects trees with a `must_not` leaf that is not marked prohibited.
fn verify_exclusions(query: &QueryTerm) -> Result<()> {
    let QueryTerm::Bool(query) = query else {
        return Ok(());
    };
    for clause in query.must_not() {
        if let QueryTerm::Leaf(leaf) = clause
            && !leaf.is_prohibited()
        {
            log::warn!("rejecting must_not leaf {:?} without prohibition", leaf.value());
            return Err(Error::invalid_query(format!(
                "must_not leaf '{}' is not marked prohibited",
                leaf.value()
            )));
        }
    }
    query
        .must()
        .iter()
        .chain(query.should())
        .chain(query.must_not())
        .try_for_each(verify_exclusions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryParser;

    fn index_of(text: &str) -> TextIndex {
        let mut index = TextIndex::new();
        index.append_string(text, None).unwrap();
        index
    }

    fn search(index: &TextIndex, query: &str) -> Matches {
        let query = QueryParser::new().parse(query).unwrap();
        index.search(&query).unwrap()
    }

    fn frequencies(matches: &Matches) -> Vec<(&str, usize)> {
        let mut frequencies: Vec<(&str, usize)> = matches
            .term_frequency()
            .iter()
            .map(|(term, count)| (term.as_str(), *count))
            .collect();
        frequencies.sort_unstable();
        frequencies
    }

    const NUMBERS: &str = "zero to nine to zeros";

    #[test]
    fn test_wildcards() {
        let index = index_of(NUMBERS);
        let matches = search(&index, "zer* to none");
        assert_eq!(
            frequencies(&matches),
            vec![("to", 2), ("zero", 1), ("zeros", 1)]
        );

        let matches = search(&index, "*o none");
        assert_eq!(frequencies(&matches), vec![("to", 2), ("zero", 1)]);
    }

    #[test]
    fn test_boolean_composition() {
        let index = index_of(NUMBERS);
        let matches = search(&index, "zero AND nine");
        assert_eq!(frequencies(&matches), vec![("nine", 1), ("zero", 1)]);

        let matches = search(&index, "(something OR zero) AND to");
        assert_eq!(frequencies(&matches), vec![("to", 2), ("zero", 1)]);

        let matches = search(&index, "zero AND something");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_failing_branch_does_not_leak() {
        let index = index_of(NUMBERS);
        // the nested must group fails after "zero" matched inside it
        let matches = search(&index, "(zero AND missing) OR nine");
        assert_eq!(frequencies(&matches), vec![("nine", 1)]);
    }

    #[test]
    fn test_fuzzy() {
        let index = index_of(NUMBERS);
        let matches = search(&index, "zer~");
        assert_eq!(frequencies(&matches), vec![("zero", 1), ("zeros", 1)]);

        let index = index_of("batauia");
        assert!(!search(&index, "batavia~1").is_empty());
        assert!(search(&index, "betuwe~1").is_empty());
    }

    #[test]
    fn test_phrases() {
        let index = index_of(NUMBERS);
        let matches = search(&index, "\"to nine\"");
        assert_eq!(frequencies(&matches), vec![("to nine", 1)]);

        let index = index_of(
            "Ware helden van de zee en de vloot. Ware helden? Ja, helden ware",
        );
        let matches = search(&index, "\"ware helden\"");
        assert_eq!(frequencies(&matches), vec![("ware helden", 2)]);
        assert_eq!(
            matches.word_positions(1),
            ahash::AHashSet::from_iter([1, 2, 9, 10])
        );

        let matches = search(&index, "\"helden ware\"~1");
        assert_eq!(
            frequencies(&matches),
            vec![("helden ware", 1), ("ware helden", 2)]
        );

        let matches = search(&index, "\"de\"");
        assert_eq!(frequencies(&matches), vec![("de", 2)]);

        assert!(search(&index, "\"ware held\"").is_empty());
    }

    #[test]
    fn test_phrase_statistics_agree() {
        let index = index_of("ware helden van de zee. Ware helden");
        let matches = search(&index, "\"ware helden\"");
        assert_eq!(matches.frequency("ware helden"), 2);
        assert_eq!(matches.term_vectors()["ware helden"].size(), 2);
        assert_eq!(matches.term_vectors()["ware helden"].phrase_vectors(), 2);
        assert_eq!(matches.vectors().size(), 2);

        let matches = search(&index, "\"ware helden\" OR zee");
        assert_eq!(
            frequencies(&matches),
            vec![("ware helden", 2), ("zee", 1)]
        );
        assert_eq!(matches.vectors().size(), 3);
        assert_eq!(matches.total(), matches.vectors().size());
    }

    #[test]
    fn test_phrase_with_repeated_words() {
        let index = index_of("a b a b a");
        let matches = search(&index, "\"a b a\"");
        assert_eq!(frequencies(&matches), vec![("a b a", 2)]);
        assert_eq!(
            matches.word_positions(1),
            ahash::AHashSet::from_iter([1, 2, 3, 4, 5])
        );

        let index = index_of("a a b");
        let matches = search(&index, "\"a b\"~2");
        assert_eq!(frequencies(&matches), vec![("a b", 1)]);
    }

    #[test]
    fn test_phrase_with_huge_slop() {
        let index = index_of("zero one two three nine");
        let matches = search(&index, "\"zero nine\"~4294967295");
        assert_eq!(frequencies(&matches), vec![("zero nine", 1)]);
        assert!(index.matches(&LeafQuery::phrase("nine zero", u32::MAX).into()).unwrap());
    }

    #[test]
    fn test_exclusions() {
        let index = index_of(NUMBERS);
        let query = QueryParser::new().parse("-ten").unwrap();
        assert!(index.matches(&query).unwrap());
        assert!(index.search(&query).unwrap().is_empty());

        let query = QueryParser::new().parse("-zero").unwrap();
        assert!(!index.matches(&query).unwrap());

        let query = QueryParser::new().parse("nine -(zero AND to)").unwrap();
        assert!(!index.matches(&query).unwrap());

        let query = QueryParser::new().parse("nine -(zero AND ten)").unwrap();
        let matches = index.search(&query).unwrap();
        assert_eq!(frequencies(&matches), vec![("nine", 1)]);
    }

    #[test]
    fn test_prohibited_leaf_inside_must() {
        let index = index_of(NUMBERS);
        let query: QueryTerm = BoolQuery::new()
            .with_must(LeafQuery::term("nine"))
            .with_must(LeafQuery::term("ten").with_prohibited(true))
            .into();
        let matches = index.search(&query).unwrap();
        assert_eq!(frequencies(&matches), vec![("nine", 1)]);

        let query: QueryTerm = BoolQuery::new()
            .with_must(LeafQuery::term("zero").with_prohibited(true))
            .into();
        assert!(!index.matches(&query).unwrap());
    }

    #[test]
    fn test_unprohibited_exclusion_is_rejected() {
        let query: QueryTerm = BoolQuery::new()
            .with_should(BoolQuery::new().with_must_not(LeafQuery::term("zero")))
            .into();

        let matching = index_of(NUMBERS);
        let other = index_of("something else entirely");
        for index in [&matching, &other] {
            let err = index.search(&query).unwrap_err();
            assert!(err.is_invalid_query());
            assert!(index.matches(&query).is_err());
        }
    }

    #[test]
    fn test_root_leaf_and_multiple_documents() {
        let mut index = TextIndex::new();
        index.append_string("ware helden", None).unwrap();
        index.append_string("de zee", None).unwrap();
        index.append_string("helden van de zee", Some(7)).unwrap();

        let matches = index.search(&LeafQuery::term("helden").into()).unwrap();
        assert_eq!(matches.doc_count(), 2);
        assert!(matches.has_doc_id(1));
        assert!(matches.has_doc_id(7));
        assert!(!matches.has_doc_id(2));

        let matches = index.search(&LeafQuery::phrase("de zee", 0).into()).unwrap();
        assert_eq!(frequencies(&matches), vec![("de zee", 2)]);
        assert_eq!(matches.doc_count(), 2);
    }

    #[test]
    fn test_distance_kind_for_fuzzy() {
        let mut osa = TextIndex::with_distance(crate::fuzziness::DistanceKind::Osa);
        osa.append_string("recieve", None).unwrap();
        let mut plain = TextIndex::new();
        plain.append_string("recieve", None).unwrap();

        let query: QueryTerm = LeafQuery::fuzzy("receive", 1).into();
        assert!(osa.matches(&query).unwrap());
        assert!(!plain.matches(&query).unwrap());
    }
}
