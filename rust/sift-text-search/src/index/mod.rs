//! Inverted index, occurrence bookkeeping and query evaluation.

pub mod matches;
pub mod phrase;
mod search;
pub mod text_index;
pub mod vectors;

pub use matches::Matches;
pub use text_index::TextIndex;
pub use vectors::{Vector, Vectors};
