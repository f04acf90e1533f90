//! Text analysis: normalization of terms and scanning of text into tokens.

pub mod analyzer;
pub mod token;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use token::{Token, TokenStream};
pub use tokenizer::{TokenIter, Tokenizer};
