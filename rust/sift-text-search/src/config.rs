//! Serializable settings for the search components.

use serde::{Deserialize, Serialize};
use sift_common::Result;

use crate::fuzziness::DistanceKind;
use crate::highlight::{Highlighter, HighlighterConfig};
use crate::query::{QueryParser, QueryParserConfig, QueryTerm};
use crate::suggest::{SpellChecker, SpellCheckerConfig};

/// Combined settings of a search pipeline.
///
/// Every section is optional when deserialized; missing values take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub parser: QueryParserConfig,
    pub highlighter: HighlighterConfig,
    pub spell_checker: SpellCheckerConfig,
    pub distance: DistanceKind,
}

impl SearchConfig {
    pub fn query_parser(&self) -> Result<QueryParser> {
        QueryParser::with_config(self.parser.clone())
    }

    pub fn spell_checker(&self) -> SpellChecker {
        SpellChecker::with_config(self.spell_checker, self.distance)
    }

    /// Highlighter for `query` using the markup and distance kind of this
    /// configuration.
    pub fn highlighter(&self, query: QueryTerm) -> Highlighter {
        Highlighter::with_config(query, self.highlighter.clone()).with_distance(self.distance)
    }
}
