//! Inline highlighting of query hits in stored text.

use serde::{Deserialize, Serialize};
use sift_common::Result;

use crate::analysis::Tokenizer;
use crate::fuzziness::DistanceKind;
use crate::index::TextIndex;
use crate::query::{QueryParser, QueryTerm};

/// Default element wrapped around highlighted words.
pub const DEFAULT_TAG: &str = "em";

/// Default `class` attribute of the start tag.
pub const DEFAULT_CSS_CLASS: &str = "dchl";

/// Markup settings of a [`Highlighter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlighterConfig {
    /// Element name, without angle brackets.
    pub tag: String,
    /// Value of the `class` attribute on the start tag. `None` (or `null`
    /// in serialized form) omits the attribute.
    pub css_class: Option<String>,
}

impl HighlighterConfig {
    pub fn start_tag(&self) -> String {
        match &self.css_class {
            Some(class) => format!("<{} class=\"{class}\">", self.tag),
            None => format!("<{}>", self.tag),
        }
    }

    pub fn end_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

/// Provides default configuration: `<em class="dchl">`.
impl Default for HighlighterConfig {
    fn default() -> Self {
        HighlighterConfig {
            tag: DEFAULT_TAG.to_string(),
            css_class: Some(DEFAULT_CSS_CLASS.to_string()),
        }
    }
}

/// Marks the words of a text that a fixed query hits.
///
/// Each call indexes the text into a scratch index that is reused between
/// calls, which makes the highlighter cheap to apply to many stored values
/// but requires `&mut self`.
pub struct Highlighter {
    query: QueryTerm,
    config: HighlighterConfig,
    index: TextIndex,
    tokenizer: Tokenizer,
}

impl Highlighter {
    pub fn new(query: QueryTerm) -> Self {
        Self::with_config(query, HighlighterConfig::default())
    }

    pub fn with_config(query: QueryTerm, config: HighlighterConfig) -> Self {
        Highlighter {
            query,
            config,
            index: TextIndex::new(),
            tokenizer: Tokenizer::new(),
        }
    }

    /// Parses `query` with `parser` and highlights its hits.
    pub fn from_query_str(
        parser: &QueryParser,
        query: &str,
        config: HighlighterConfig,
    ) -> Result<Self> {
        Ok(Self::with_config(parser.parse(query)?, config))
    }

    /// Evaluates fuzzy leaves with `distance`, as a [`TextIndex`] built with
    /// [`TextIndex::with_distance`] would.
    pub fn with_distance(mut self, distance: DistanceKind) -> Self {
        self.index = TextIndex::with_distance(distance);
        self
    }

    pub fn distance(&self) -> DistanceKind {
        self.index.distance()
    }

    pub fn query(&self) -> &QueryTerm {
        &self.query
    }

    pub fn config(&self) -> &HighlighterConfig {
        &self.config
    }

    /// Wraps every word of `text` hit by the query in the configured markup.
    ///
    /// # Returns
    /// The rebuilt text and `true` when the query matches, or the unchanged
    /// text and `false` when it does not.
    ///
    /// # Errors
    /// Propagates the evaluation error of a query with an unprohibited
    /// exclusion.
    pub fn highlight(&mut self, text: &str) -> Result<(String, bool)> {
        self.index.reset();
        let doc_id = self.index.append_string(text, None)?;
        let Some(hits) = self.index.evaluate(&self.query)? else {
            return Ok((text.to_string(), false));
        };
        let positions = hits.word_positions(doc_id);
        let highlighted = self
            .tokenizer
            .collect_stream(text)
            .highlight(&positions, &self.config);
        Ok((highlighted, true))
    }
}
