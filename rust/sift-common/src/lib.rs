//! Core definitions (error kinds, result alias and argument checks), relied upon by all sift-* crates.

pub mod error;
pub mod result;

pub use result::Result;
