//! Recursive-descent parser for the boolean query language.
//!
//! # Syntax
//!
//! | Input              | Meaning                                            |
//! |--------------------|----------------------------------------------------|
//! | `one two`          | leaves joined by the default operator              |
//! | `one AND two`      | both required (`+` is a shorthand for `AND`)       |
//! | `one OR two`       | either suffices (`\|` is a shorthand for `OR`)     |
//! | `NOT one`, `-one`  | excludes the next leaf or group                    |
//! | `title:one`        | leaf scoped to a field                             |
//! | `"one two"`        | phrase                                             |
//! | `"one two"~3`      | phrase with slop 3 (word count when omitted)       |
//! | `one~1`            | fuzzy term with edit budget 1 (2 when omitted)     |
//! | `one*`, `*one`     | prefix and suffix wildcard                         |
//! | `one^2.5`          | boost                                              |
//! | `( ... )`          | nested group                                       |
//!
//! There is no precedence table. The operator that follows an operand decides
//! which clause list of the enclosing group the operand lands in; an operand
//! directly followed by another operand takes the default operator, and the
//! last operand of a group takes the operator in force at that point.

use std::fmt;

use serde::{Deserialize, Serialize};
use sift_common::{Result, error::Error};

use super::lexer::{Lexed, Lexeme, Lexer};
use super::term::{BoolQuery, LeafKind, LeafQuery, Occur, QueryTerm, Wildcard};
use crate::analysis::Analyzer;

/// Default edit budget of a fuzzy leaf written without a number (`word~`).
pub const DEFAULT_FUZZINESS: u32 = 2;

/// Maximum nesting depth of parenthesized groups.
pub const MAX_GROUP_DEPTH: usize = 32;

/// Boolean operator joining query operands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    And,
    #[default]
    Or,
    Not,
}

impl Operator {
    pub const fn name(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }

    fn occur(&self) -> Occur {
        match self {
            Operator::And => Occur::Must,
            Operator::Or => Occur::Should,
            Operator::Not => Occur::MustNot,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert an operator name (case-insensitive) to an Operator enum variant.
impl TryFrom<&str> for Operator {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "AND" => Ok(Operator::And),
            "OR" => Ok(Operator::Or),
            "NOT" => Ok(Operator::Not),
            _ => Err(Error::invalid_arg(
                "name",
                format!("Unrecognized operator: {name}"),
            )),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        Operator::try_from(name.as_str())
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.name().to_string()
    }
}

/// Configuration of a [`QueryParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParserConfig {
    /// Operator applied between operands written without one. Must be
    /// `AND` or `OR`.
    pub default_operator: Operator,
    /// Fields a leaf without an explicit field is meant to search. The
    /// in-memory index has a single field and does not consult this list;
    /// adapters targeting multi-field backends do.
    pub fields: Vec<String>,
}

/// Parses query strings into [`QueryTerm`] trees.
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    config: QueryParserConfig,
    analyzer: Analyzer,
}

impl QueryParser {
    /// Creates a parser with `OR` as the default operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser from a configuration.
    ///
    /// # Errors
    /// Returns an [`Error::invalid_arg`] if the default operator is `NOT`.
    pub fn with_config(config: QueryParserConfig) -> Result<Self> {
        let mut parser = QueryParser {
            config: QueryParserConfig::default(),
            analyzer: Analyzer::new(),
        };
        parser.set_default_operator(config.default_operator)?;
        parser.set_fields(config.fields);
        Ok(parser)
    }

    pub fn config(&self) -> &QueryParserConfig {
        &self.config
    }

    pub fn default_operator(&self) -> Operator {
        self.config.default_operator
    }

    /// Sets the operator applied between adjacent operands.
    ///
    /// # Errors
    /// Returns an [`Error::invalid_arg`] for [`Operator::Not`], which cannot
    /// join operands.
    pub fn set_default_operator(&mut self, operator: Operator) -> Result<()> {
        if operator == Operator::Not {
            return Err(Error::invalid_arg(
                "operator",
                "the default operator must be AND or OR",
            ));
        }
        self.config.default_operator = operator;
        Ok(())
    }

    pub fn fields(&self) -> &[String] {
        &self.config.fields
    }

    pub fn set_fields(&mut self, fields: Vec<String>) {
        self.config.fields = fields;
    }

    /// Parses a query string.
    ///
    /// The result is always a [`QueryTerm::Bool`] at the root; an empty query
    /// yields an empty composite.
    ///
    /// # Errors
    /// Returns a query syntax error naming the input when a boost or
    /// fuzziness suffix is not a number, or when groups nest deeper than
    /// [`MAX_GROUP_DEPTH`].
    pub fn parse(&self, query: &str) -> Result<QueryTerm> {
        let mut state = ParseState {
            query,
            lexemes: Lexer::new(query).collect(),
            pos: 0,
            analyzer: &self.analyzer,
            default_operator: self.config.default_operator,
        };
        let root = state.parse_group(0)?;
        log::debug!("parsed query {query:?} into {root:?}");
        Ok(QueryTerm::Bool(root))
    }
}

/// Operand waiting for the operator that decides its clause list.
struct Operand {
    node: OperandNode,
    negated: bool,
}

enum OperandNode {
    /// Leaf whose value is not normalized yet.
    Leaf(LeafQuery),
    Group(BoolQuery),
}

struct ParseState<'p, 'q> {
    query: &'q str,
    lexemes: Vec<Lexed<'q>>,
    pos: usize,
    analyzer: &'p Analyzer,
    default_operator: Operator,
}

impl<'q> ParseState<'_, 'q> {
    fn next(&mut self) -> Option<Lexed<'q>> {
        let lexed = self.lexemes.get(self.pos).copied();
        if lexed.is_some() {
            self.pos += 1;
        }
        lexed
    }

    /// The next lexeme if no whitespace separates it from the current one.
    fn peek_adjacent(&self) -> Option<Lexeme<'q>> {
        self.lexemes
            .get(self.pos)
            .filter(|lexed| !lexed.spaced)
            .map(|lexed| lexed.lexeme)
    }

    fn peek(&self) -> Option<Lexeme<'q>> {
        self.lexemes.get(self.pos).map(|lexed| lexed.lexeme)
    }

    fn parse_group(&mut self, depth: usize) -> Result<BoolQuery> {
        if depth > MAX_GROUP_DEPTH {
            return Err(Error::query_syntax(
                self.query,
                format!("groups nested deeper than {MAX_GROUP_DEPTH}"),
            ));
        }

        let mut group = BoolQuery::new();
        let mut pending: Option<Operand> = None;
        let mut in_force = self.default_operator;
        let mut negate_next = false;

        while let Some(lexed) = self.next() {
            let node = match lexed.lexeme {
                Lexeme::RParen if depth > 0 => break,
                Lexeme::And | Lexeme::Or => {
                    let operator = if lexed.lexeme == Lexeme::And {
                        Operator::And
                    } else {
                        Operator::Or
                    };
                    if let Some(operand) = pending.take() {
                        self.append(&mut group, operand, operator);
                    }
                    in_force = operator;
                    continue;
                }
                Lexeme::Not => {
                    if let Some(operand) = pending.take() {
                        self.append(&mut group, operand, in_force);
                    }
                    negate_next = true;
                    continue;
                }
                Lexeme::LParen => OperandNode::Group(self.parse_group(depth + 1)?),
                Lexeme::Word(_) | Lexeme::Phrase(_) | Lexeme::Star => {
                    match self.parse_leaf(lexed.lexeme)? {
                        Some(leaf) => OperandNode::Leaf(leaf),
                        None => continue,
                    }
                }
                // stray modifiers and punctuation carry no operand
                _ => continue,
            };

            let operand = Operand {
                node,
                negated: std::mem::take(&mut negate_next),
            };
            if let Some(previous) = pending.replace(operand) {
                self.append(&mut group, previous, self.default_operator);
                in_force = self.default_operator;
            }
        }

        if let Some(operand) = pending.take() {
            self.append(&mut group, operand, in_force);
        }
        Ok(group)
    }

    /// Parses one leaf starting at `first`, including its field prefix and
    /// its modifiers. Returns `None` for input that yields no leaf, such as a
    /// lone `*` or a field without a value.
    fn parse_leaf(&mut self, first: Lexeme<'q>) -> Result<Option<LeafQuery>> {
        let mut field = None;
        let mut lexeme = first;
        if let Lexeme::Word(name) = first
            && self.peek_adjacent() == Some(Lexeme::Colon)
        {
            self.next();
            field = Some(name.to_string());
            match self.peek() {
                Some(value @ (Lexeme::Word(_) | Lexeme::Phrase(_) | Lexeme::Star)) => {
                    self.next();
                    lexeme = value;
                }
                _ => return Ok(None),
            }
        }

        let mut leaf = match lexeme {
            Lexeme::Word(word) => LeafQuery::term(word),
            Lexeme::Phrase(content) => LeafQuery::phrase(content.replace("\\\"", "\""), 0),
            Lexeme::Star => match self.peek_adjacent() {
                Some(Lexeme::Word(word)) => {
                    self.next();
                    LeafQuery::suffix(word)
                }
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };
        if let Some(field) = field {
            leaf = leaf.with_field(field);
        }
        self.parse_modifiers(leaf).map(Some)
    }

    fn parse_modifiers(&mut self, mut leaf: LeafQuery) -> Result<LeafQuery> {
        while let Some(modifier) = self.peek_adjacent() {
            match modifier {
                Lexeme::Star => {
                    self.next();
                    if leaf.kind() == LeafKind::Term {
                        leaf.set_kind(LeafKind::Wildcard(Wildcard::Prefix));
                    }
                }
                Lexeme::Caret => {
                    self.next();
                    if let Some(text) = self.adjacent_word() {
                        let boost = text
                            .parse::<f64>()
                            .ok()
                            .filter(|boost| boost.is_finite())
                            .ok_or_else(|| {
                                Error::query_syntax(self.query, format!("invalid boost '{text}'"))
                            })?;
                        leaf = leaf.with_boost(boost);
                    }
                }
                Lexeme::Tilde => {
                    self.next();
                    let amount = match self.adjacent_word() {
                        Some(text) => Some(text.parse::<u32>().map_err(|_| {
                            Error::query_syntax(
                                self.query,
                                format!("invalid fuzziness '{text}'"),
                            )
                        })?),
                        None => None,
                    };
                    match leaf.kind() {
                        LeafKind::Term | LeafKind::Fuzzy { .. } => {
                            leaf.set_kind(LeafKind::Fuzzy {
                                distance: amount.unwrap_or(DEFAULT_FUZZINESS),
                            });
                        }
                        LeafKind::Phrase { .. } => {
                            let slop = amount.unwrap_or(leaf.words().count() as u32);
                            leaf.set_kind(LeafKind::Phrase { slop });
                        }
                        LeafKind::Wildcard(_) => {
                            log::debug!("ignoring fuzziness on wildcard {:?}", leaf.value());
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(leaf)
    }

    fn adjacent_word(&mut self) -> Option<&'q str> {
        match self.peek_adjacent() {
            Some(Lexeme::Word(text)) => {
                self.next();
                Some(text)
            }
            _ => None,
        }
    }

    /// Normalizes the operand and inserts it into the clause list selected by
    /// `operator`, or into `must_not` when it is negated.
    fn append(&self, group: &mut BoolQuery, operand: Operand, operator: Operator) {
        let occur = if operand.negated {
            Occur::MustNot
        } else {
            operator.occur()
        };
        match operand.node {
            OperandNode::Leaf(mut leaf) => {
                let value = if leaf.is_phrase() {
                    self.analyzer.transform_phrase(leaf.value())
                } else {
                    self.analyzer.transform(leaf.value())
                };
                if value.is_empty() {
                    log::debug!("dropping leaf {:?} with empty normal form", leaf.value());
                    return;
                }
                leaf.set_value(value);
                let leaf = leaf.with_prohibited(operand.negated);
                group.push(occur, QueryTerm::Leaf(leaf));
            }
            OperandNode::Group(nested) => {
                if !nested.is_empty() {
                    group.push(occur, QueryTerm::Bool(nested));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> BoolQuery {
        QueryParser::new()
            .parse(query)
            .unwrap()
            .as_bool()
            .cloned()
            .unwrap()
    }

    fn parse_with(query: &str, operator: Operator) -> BoolQuery {
        let mut parser = QueryParser::new();
        parser.set_default_operator(operator).unwrap();
        parser.parse(query).unwrap().as_bool().cloned().unwrap()
    }

    fn values(clauses: &[QueryTerm]) -> Vec<&str> {
        clauses
            .iter()
            .filter_map(|c| c.as_leaf().map(|l| l.value()))
            .collect()
    }

    fn only_leaf(query: &str) -> LeafQuery {
        let root = parse(query);
        let clauses: Vec<_> = root
            .must()
            .iter()
            .chain(root.should())
            .chain(root.must_not())
            .collect();
        assert_eq!(clauses.len(), 1, "query: {query}");
        clauses[0].as_leaf().cloned().unwrap()
    }

    #[test]
    fn test_default_operator() {
        let root = parse("one two three");
        assert_eq!(values(root.should()), vec!["one", "two", "three"]);
        assert!(root.must().is_empty());

        let root = parse_with("one two three", Operator::And);
        assert_eq!(values(root.must()), vec!["one", "two", "three"]);
        assert!(root.should().is_empty());
    }

    #[test]
    fn test_not_is_rejected_as_default() {
        let mut parser = QueryParser::new();
        assert!(parser.set_default_operator(Operator::Not).is_err());
        assert_eq!(parser.default_operator(), Operator::Or);

        let config = QueryParserConfig {
            default_operator: Operator::Not,
            fields: vec![],
        };
        assert!(QueryParser::with_config(config).is_err());
    }

    #[test]
    fn test_operator_lookahead() {
        let root = parse("one AND two OR three");
        assert_eq!(values(root.must()), vec!["one"]);
        assert_eq!(values(root.should()), vec!["two", "three"]);

        let root = parse("one AND two OR \"three words\"");
        assert_eq!(values(root.must()), vec!["one"]);
        assert_eq!(values(root.should()), vec!["two", "three words"]);

        let root = parse("one AND two AND \"three words\" OR \"no words\"");
        assert_eq!(values(root.must()), vec!["one", "two"]);
        assert_eq!(values(root.should()), vec!["three words", "no words"]);
    }

    #[test]
    fn test_nested_groups() {
        let root = parse("one AND (two OR three)");
        assert_eq!(root.must().len(), 2);
        assert_eq!(values(root.must()), vec!["one"]);
        let nested = root.must()[1].as_bool().unwrap();
        assert_eq!(values(nested.should()), vec!["two", "three"]);

        let root = parse("(two OR three) AND one");
        assert_eq!(root.must().len(), 2);
        assert!(root.must()[0].is_bool_query());
        assert_eq!(values(root.must()), vec!["one"]);

        let root = parse("three (two + \"four\") | one");
        assert_eq!(root.should().len(), 3);
        assert_eq!(values(root.should()), vec!["three", "one"]);
        let nested = root.should()[1].as_bool().unwrap();
        assert_eq!(values(nested.must()), vec!["two", "four"]);
    }

    #[test]
    fn test_unbalanced_groups() {
        let root = parse("one AND (two OR three");
        assert_eq!(root.must().len(), 2);

        let root = parse("one) two");
        assert_eq!(values(root.should()), vec!["one", "two"]);

        assert!(parse("()").is_empty());
    }

    #[test]
    fn test_group_nesting_limit() {
        let query = "(".repeat(MAX_GROUP_DEPTH + 1) + "deep";
        let err = QueryParser::new().parse(&query).unwrap_err();
        assert!(err.is_query_syntax());
    }

    #[test]
    fn test_negation() {
        for query in ["NOT one", "-one"] {
            let root = parse(query);
            assert_eq!(values(root.must_not()), vec!["one"]);
            assert!(root.must_not()[0].as_leaf().unwrap().is_prohibited());
        }

        let root = parse("should -one");
        assert_eq!(values(root.should()), vec!["should"]);
        assert_eq!(values(root.must_not()), vec!["one"]);

        let root = parse("one NOT two");
        assert_eq!(values(root.should()), vec!["one"]);
        assert_eq!(values(root.must_not()), vec!["two"]);

        let root = parse("one AND NOT (two three)");
        assert_eq!(values(root.must()), vec!["one"]);
        assert!(root.must_not()[0].is_bool_query());

        // negation binds to a single operand
        let root = parse("-one two");
        assert_eq!(values(root.must_not()), vec!["one"]);
        assert_eq!(values(root.should()), vec!["two"]);
        assert!(!root.should()[0].as_leaf().unwrap().is_prohibited());
    }

    #[test]
    fn test_plus_and_pipe() {
        let root = parse("+one");
        assert_eq!(values(root.must()), vec!["one"]);

        let root = parse("this + one");
        assert_eq!(values(root.must()), vec!["this", "one"]);

        let root = parse_with("this | that", Operator::And);
        assert_eq!(values(root.should()), vec!["this", "that"]);
    }

    #[test]
    fn test_fields() {
        let leaf = only_leaf("field:one");
        assert_eq!(leaf.field(), Some("field"));
        assert_eq!(leaf.value(), "one");

        let root = parse("-field:\"one word\"");
        let leaf = root.must_not()[0].as_leaf().unwrap();
        assert_eq!(leaf.field(), Some("field"));
        assert_eq!(leaf.value(), "one word");
        assert!(leaf.is_phrase());
        assert!(leaf.is_prohibited());

        let leaf = only_leaf("Title:övergångsställE");
        assert_eq!(leaf.field(), Some("Title"));
        assert_eq!(leaf.value(), "overgangsstalle");

        assert!(parse("title:").is_empty());
    }

    #[test]
    fn test_normalization() {
        assert_eq!(only_leaf("övergångsställE").value(), "overgangsstalle");
        assert_eq!(only_leaf("\"Mr. Joan  Blaeu\"").value(), "mr joan blaeu");
        assert_eq!(only_leaf("1.04.02").value(), "1.04.02");
        assert_eq!(only_leaf("4.VEL/123").value(), "4.vel/123");
        assert_eq!(only_leaf("1word").value(), "1word");
        assert_eq!(only_leaf("\"1.04.02\"").value(), "1.04.02");
        assert!(parse("\"\" , ;").is_empty());
    }

    #[test]
    fn test_boost() {
        let leaf = only_leaf("word^2.5");
        assert_eq!(leaf.boost(), Some(2.5));
        assert_eq!(leaf.kind(), LeafKind::Term);

        assert_eq!(only_leaf("word^").boost(), None);
        assert_eq!(only_leaf("\"two words\"^3").boost(), Some(3.0));

        let err = QueryParser::new().parse("more^1a").unwrap_err();
        assert!(err.is_query_syntax());
        assert!(err.to_string().contains("more^1a"));

        for query in ["word^nan", "word^NaN", "word^inf", "word^infinity", "word^1e999"] {
            let err = QueryParser::new().parse(query).unwrap_err();
            assert!(err.is_query_syntax(), "{query}");
            assert!(err.to_string().contains("invalid boost"), "{query}");
        }
    }

    #[test]
    fn test_fuzzy_and_slop() {
        assert_eq!(only_leaf("word~").fuzziness(), Some(DEFAULT_FUZZINESS));
        assert_eq!(only_leaf("word~3").fuzziness(), Some(3));
        assert_eq!(only_leaf("\"two words\"~3").slop(), Some(3));
        assert_eq!(only_leaf("\"almost two words\"~").slop(), Some(3));
        assert_eq!(only_leaf("\"a b c\"~").slop(), Some(3));
        assert_eq!(only_leaf("\"a b\"").slop(), Some(0));

        let err = QueryParser::new().parse("word~1a").unwrap_err();
        assert!(err.is_query_syntax());
        assert!(err.to_string().contains("word~1a"));
    }

    #[test]
    fn test_wildcards() {
        let leaf = only_leaf("prefix*");
        assert_eq!(leaf.wildcard(), Some(Wildcard::Prefix));
        assert_eq!(leaf.value(), "prefix");

        let leaf = only_leaf("*suffix");
        assert_eq!(leaf.wildcard(), Some(Wildcard::Suffix));
        assert_eq!(leaf.value(), "suffix");

        let root = parse("one * two");
        assert_eq!(values(root.should()), vec!["one", "two"]);
        assert!(root.should().iter().all(|c| c.as_leaf().unwrap().wildcard().is_none()));

        let root = parse("zer* to none");
        assert_eq!(root.should().len(), 3);
        assert_eq!(
            root.should()[0].as_leaf().unwrap().wildcard(),
            Some(Wildcard::Prefix)
        );
    }

    #[test]
    fn test_config_from_json() {
        let config: QueryParserConfig =
            serde_json::from_str(r#"{"default_operator": "and", "fields": ["title"]}"#).unwrap();
        let parser = QueryParser::with_config(config).unwrap();
        assert_eq!(parser.default_operator(), Operator::And);
        assert_eq!(parser.fields(), ["title".to_string()]);

        let config: QueryParserConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.default_operator, Operator::Or);
        assert!(serde_json::from_str::<QueryParserConfig>(r#"{"default_operator": "xor"}"#).is_err());
    }
}
