//! Embeddable full-text search over in-memory documents.
//!
//! This crate tokenizes and normalizes text, indexes it into an inverted
//! index, parses user query strings into boolean query trees and evaluates
//! them with exact, wildcard, fuzzy and phrase matching.
//!
//! # Overview
//!
//! The same normalization is applied on both sides of a search:
//!
//! 1. **Indexing**: the [`Tokenizer`] splits a document into words,
//!    punctuation and markup, and the [`Analyzer`] folds every word into its
//!    normal form before [`TextIndex`] records it at its word position.
//! 2. **Querying**: the [`QueryParser`] turns a query string into a
//!    [`QueryTerm`] tree whose leaf values are normalized the same way, and
//!    [`TextIndex::search`] evaluates the tree into [`Matches`].
//!
//! On top of that, the [`Highlighter`] marks query hits in stored text, and
//! [`AutoComplete`] and [`SpellChecker`] offer suggestions over the indexed
//! vocabulary.
//!
//! # Query Syntax
//!
//! - `word`, `"a phrase"`, `"a phrase"~2` (slop)
//! - `prefix*`, `*suffix`, `word~` and `word~1` (fuzzy)
//! - `a AND b`, `a OR b`, `NOT a`, `-a`, `(a OR b) AND c`
//! - `field:value` and `word^2.5` (boost)
//!
//! # Quick Start
//!
//! ```rust
//! use sift_text_search::{QueryParser, TextIndex};
//!
//! let mut index = TextIndex::new();
//! index.append_string("Ware helden van de zee", None).unwrap();
//!
//! let query = QueryParser::new().parse("\"ware helden\" AND ze*").unwrap();
//! let matches = index.search(&query).unwrap();
//! assert_eq!(matches.frequency("ware helden"), 1);
//! assert_eq!(matches.frequency("zee"), 1);
//! ```

pub mod analysis;
pub mod config;
pub mod fuzziness;
pub mod highlight;
pub mod index;
pub mod query;
pub mod suggest;

pub use analysis::{Analyzer, Token, TokenStream, Tokenizer};
pub use config::SearchConfig;
pub use fuzziness::{DistanceKind, create_distance, is_fuzzy_match};
pub use highlight::{Highlighter, HighlighterConfig};
pub use index::{Matches, TextIndex, Vector, Vectors};
pub use query::{
    BoolQuery, LeafKind, LeafQuery, Occur, Operator, QueryParser, QueryParserConfig, QueryTerm,
    QueryType, Wildcard,
};
pub use suggest::{AutoComplete, SpellChecker, SpellCheckerConfig, SuggestFn, Suggestion};
