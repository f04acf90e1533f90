//! Query language: the query tree model and the parser producing it.

mod lexer;
pub mod parser;
pub mod term;

pub use parser::{Operator, QueryParser, QueryParserConfig};
pub use term::{BoolQuery, LeafKind, LeafQuery, Occur, QueryTerm, QueryType, Wildcard};
