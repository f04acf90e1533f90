//! Suggestion structures built over the indexed vocabulary.

pub mod autocomplete;
pub mod spellcheck;

pub use autocomplete::{AutoComplete, SuggestFn, Suggestion};
pub use spellcheck::{SpellChecker, SpellCheckerConfig};
