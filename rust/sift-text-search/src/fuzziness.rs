//! Edit-distance calculators for approximate term matching.
//!
//! A fuzzy query leaf carries an edit budget; an indexed term matches when its
//! distance to the query value stays within that budget. The calculator used
//! to measure the distance is selected by name, which lets configuration pick
//! between:
//!
//! - **Levenshtein** (`"levenshtein"`): insertions, deletions, substitutions
//! - **Damerau-Levenshtein** (`"damerau-levenshtein"`): adds transpositions of
//!   adjacent characters, unrestricted
//! - **Optimal string alignment** (`"osa"`): transpositions, but no substring
//!   is edited more than once

use serde::{Deserialize, Serialize};
use sift_common::{Result, error::Error};

/// Supported edit-distance calculators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DistanceKind {
    #[default]
    Levenshtein,
    DamerauLevenshtein,
    Osa,
}

impl DistanceKind {
    /// Get the name of the distance kind as a static string.
    pub const fn name(&self) -> &'static str {
        match self {
            DistanceKind::Levenshtein => "levenshtein",
            DistanceKind::DamerauLevenshtein => "damerau-levenshtein",
            DistanceKind::Osa => "osa",
        }
    }

    /// Number of single-character edits needed to turn `left` into `right`.
    pub fn distance(&self, left: &str, right: &str) -> usize {
        match self {
            DistanceKind::Levenshtein => strsim::levenshtein(left, right),
            DistanceKind::DamerauLevenshtein => strsim::damerau_levenshtein(left, right),
            DistanceKind::Osa => strsim::osa_distance(left, right),
        }
    }

    /// Whether `left` and `right` are at most `fuzziness` edits apart.
    pub fn is_fuzzy_match(&self, left: &str, right: &str, fuzziness: usize) -> bool {
        // the distance is at least the difference in length
        if left.chars().count().abs_diff(right.chars().count()) > fuzziness {
            return false;
        }
        self.distance(left, right) <= fuzziness
    }
}

/// Convert a string name to a DistanceKind enum variant.
impl TryFrom<&str> for DistanceKind {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "levenshtein" => Ok(DistanceKind::Levenshtein),
            "damerau-levenshtein" => Ok(DistanceKind::DamerauLevenshtein),
            "osa" => Ok(DistanceKind::Osa),
            _ => Err(Error::invalid_arg(
                "name",
                format!("Unrecognized distance: {name}"),
            )),
        }
    }
}

impl TryFrom<String> for DistanceKind {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        DistanceKind::try_from(name.as_str())
    }
}

impl From<DistanceKind> for String {
    fn from(kind: DistanceKind) -> Self {
        kind.name().to_string()
    }
}

/// Resolves a distance calculator by name.
///
/// # Errors
/// Returns an [`Error::invalid_arg`] if the name is not recognized.
pub fn create_distance(name: &str) -> Result<DistanceKind> {
    name.try_into()
}

/// Levenshtein-based shorthand for [`DistanceKind::is_fuzzy_match`].
pub fn is_fuzzy_match(left: &str, right: &str, fuzziness: usize) -> bool {
    DistanceKind::Levenshtein.is_fuzzy_match(left, right, fuzziness)
}
