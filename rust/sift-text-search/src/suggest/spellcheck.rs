//! Frequency-based spelling correction.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{Analyzer, TokenStream};
use crate::fuzziness::DistanceKind;

/// Tuning of a [`SpellChecker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellCheckerConfig {
    /// Maximum edit distance between the input and a correction.
    pub depth: usize,
    /// Minimum count a term needs before it is offered as a correction.
    pub threshold: usize,
}

impl Default for SpellCheckerConfig {
    fn default() -> Self {
        SpellCheckerConfig {
            depth: 2,
            threshold: 1,
        }
    }
}

/// Term frequency model trained from token streams.
///
/// Input is normalized with the same [`Analyzer`] the index uses, so a
/// correction is always a normalized term.
#[derive(Debug, Clone, Default)]
pub struct SpellChecker {
    config: SpellCheckerConfig,
    counts: AHashMap<String, usize>,
    distance: DistanceKind,
    analyzer: Analyzer,
}

impl SpellChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SpellCheckerConfig, distance: DistanceKind) -> Self {
        SpellChecker {
            config,
            distance,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SpellCheckerConfig {
        &self.config
    }

    /// Counts every indexable token of `stream` once.
    pub fn train(&mut self, stream: &TokenStream) {
        for token in stream.indexable() {
            *self.counts.entry(token.normal().to_string()).or_default() += 1;
        }
        log::debug!("spell checker model holds {} terms", self.counts.len());
    }

    /// Overrides the count of `term`. A count of zero removes the term.
    pub fn set_count(&mut self, term: &str, count: usize) {
        let term = self.analyzer.transform(term);
        if term.is_empty() {
            return;
        }
        if count == 0 {
            self.counts.remove(&term);
        } else {
            self.counts.insert(term, count);
        }
    }

    pub fn count(&self, term: &str) -> usize {
        self.counts
            .get(&self.analyzer.transform(term))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most likely spelling of `input`.
    ///
    /// Returns the normalized input itself when it is a known term, the best
    /// correction otherwise, or `None` when nothing lies within reach.
    pub fn spell_check(&self, input: &str) -> Option<String> {
        let input = self.analyzer.transform(input);
        if input.is_empty() {
            return None;
        }
        if self.is_suggestible(&input) {
            return Some(input);
        }
        self.rank(&input).into_iter().next()
    }

    /// Up to `n` corrections of `input`, best first.
    ///
    /// Candidates are ordered by edit distance, then by count descending, then
    /// alphabetically.
    pub fn suggestions(&self, input: &str, n: usize) -> Vec<String> {
        let input = self.analyzer.transform(input);
        if input.is_empty() {
            return Vec::new();
        }
        let mut ranked = self.rank(&input);
        ranked.truncate(n);
        ranked
    }

    fn is_suggestible(&self, term: &str) -> bool {
        self.counts
            .get(term)
            .is_some_and(|&count| count >= self.config.threshold)
    }

    fn rank(&self, input: &str) -> Vec<String> {
        let mut candidates: Vec<(usize, usize, &str)> = self
            .counts
            .iter()
            .filter(|&(_, &count)| count >= self.config.threshold)
            .filter(|(term, _)| {
                term.chars().count().abs_diff(input.chars().count()) <= self.config.depth
            })
            .filter_map(|(term, &count)| {
                let distance = self.distance.distance(term, input);
                (distance <= self.config.depth).then_some((distance, count, term.as_str()))
            })
            .collect();
        candidates.sort_unstable_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.cmp(b.2))
        });
        candidates
            .into_iter()
            .map(|(_, _, term)| term.to_string())
            .collect()
    }
}
