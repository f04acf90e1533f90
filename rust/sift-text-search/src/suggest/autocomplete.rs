//! Substring completion over a fixed vocabulary.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::Serialize;
use sift_common::{Result, error::Error, verify_arg};

use crate::analysis::{Analyzer, TokenStream};

const SEPARATOR: char = '\0';

/// A completion candidate and the number of times the input occurs in it
/// across the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub term: String,
    pub count: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Vec<String>>,
}

impl Suggestion {
    pub fn new(term: impl Into<String>, count: usize) -> Self {
        Suggestion {
            term: term.into(),
            count,
            metadata: BTreeMap::new(),
        }
    }
}

/// Rewrites a suggestion before it is returned. Setting the count to zero
/// drops the suggestion.
pub type SuggestFn = Box<dyn Fn(Suggestion) -> Suggestion + Send + Sync>;

/// Suffix array over the `\0`-separated concatenation of all terms.
///
/// Every term is stored once per occurrence, so frequent terms collect more
/// hits. Suffixes start only at character boundaries and never at a
/// separator.
#[derive(Default)]
pub struct AutoComplete {
    data: String,
    suffixes: Vec<usize>,
    terms: usize,
    suggest_fn: Option<SuggestFn>,
}

impl AutoComplete {
    /// Builds the vocabulary from the indexable tokens of `stream`.
    pub fn from_token_stream(stream: &TokenStream) -> Self {
        Self::build(stream.indexable().map(|token| token.normal()))
    }

    /// Builds the vocabulary from plain words. Words are normalized first;
    /// words that normalize to nothing are skipped.
    pub fn from_strings<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Self {
        let analyzer = Analyzer::new();
        let normalized: Vec<String> = words
            .into_iter()
            .map(|word| analyzer.transform(word.as_ref()))
            .collect();
        Self::build(normalized.iter().map(String::as_str))
    }

    pub fn with_suggest_fn(mut self, suggest_fn: SuggestFn) -> Self {
        self.suggest_fn = Some(suggest_fn);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms == 0
    }

    /// Number of stored term occurrences.
    pub fn len(&self) -> usize {
        self.terms
    }

    fn build<'a>(words: impl Iterator<Item = &'a str>) -> Self {
        let mut data = String::from(SEPARATOR);
        let mut terms = 0;
        for word in words {
            if word.is_empty() || word.contains(SEPARATOR) {
                continue;
            }
            data.push_str(word);
            data.push(SEPARATOR);
            terms += 1;
        }
        if terms == 0 {
            return Self::default();
        }

        let mut suffixes: Vec<usize> = data
            .char_indices()
            .filter(|&(_, ch)| ch != SEPARATOR)
            .map(|(i, _)| i)
            .collect();
        suffixes.sort_unstable_by(|&a, &b| data[a..].cmp(&data[b..]));
        log::debug!(
            "autocomplete built over {terms} terms, {} suffixes",
            suffixes.len()
        );

        AutoComplete {
            data,
            suffixes,
            terms,
            suggest_fn: None,
        }
    }

    /// Completes `input` against the vocabulary.
    ///
    /// # Arguments
    /// * `input` - Fragment to look up; normalized before lookup
    /// * `limit` - Maximum number of suggestions, or `None` for all
    ///
    /// # Returns
    /// Every term containing the fragment, ordered by count descending and
    /// then by term.
    ///
    /// # Errors
    /// Fails when the vocabulary is empty or the normalized input is empty.
    pub fn suggest(&self, input: &str, limit: Option<usize>) -> Result<Vec<Suggestion>> {
        if self.is_empty() {
            return Err(Error::invalid_operation("suggest from empty autocomplete"));
        }
        let input = Analyzer::new().transform(input);
        verify_arg!(input, !input.is_empty() && !input.contains(SEPARATOR));

        let start = self
            .suffixes
            .partition_point(|&i| &self.data[i..] < input.as_str());
        let end = start
            + self.suffixes[start..].partition_point(|&i| self.data[i..].starts_with(&input));

        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for &position in &self.suffixes[start..end] {
            *counts.entry(self.term_at(position)).or_default() += 1;
        }

        let mut suggestions: Vec<Suggestion> = counts
            .into_iter()
            .map(|(term, count)| {
                let suggestion = Suggestion::new(term, count);
                match &self.suggest_fn {
                    Some(suggest_fn) => suggest_fn(suggestion),
                    None => suggestion,
                }
            })
            .filter(|suggestion| suggestion.count != 0)
            .collect();
        suggestions.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        if let Some(limit) = limit {
            suggestions.truncate(limit);
        }
        Ok(suggestions)
    }

    /// Term enclosing the byte position `position` of the data.
    fn term_at(&self, position: usize) -> &str {
        let start = self.data[..position]
            .rfind(SEPARATOR)
            .map_or(0, |i| i + SEPARATOR.len_utf8());
        let end = self.data[position..]
            .find(SEPARATOR)
            .map_or(self.data.len(), |i| position + i);
        &self.data[start..end]
    }
}

impl std::fmt::Debug for AutoComplete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoComplete")
            .field("terms", &self.terms)
            .field("suffixes", &self.suffixes.len())
            .field("suggest_fn", &self.suggest_fn.is_some())
            .finish()
    }
}
