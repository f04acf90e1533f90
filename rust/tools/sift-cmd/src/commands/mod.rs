//! Command implementations for sift-cmd

pub mod highlight;
pub mod parse;
pub mod search;
pub mod spellcheck;
pub mod suggest;
