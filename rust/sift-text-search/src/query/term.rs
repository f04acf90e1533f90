//! Query tree produced by the parser and consumed by the matcher.
//!
//! A query is either a boolean composite of clauses or a single leaf. Leaves
//! come in four kinds (term, phrase, wildcard and fuzzy) that are mutually
//! exclusive by construction. Trees are immutable values: every constructor
//! consumes `self` and returns the extended value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node of a query tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryTerm {
    Bool(BoolQuery),
    Leaf(LeafQuery),
}

impl QueryTerm {
    pub fn query_type(&self) -> QueryType {
        match self {
            QueryTerm::Bool(_) => QueryType::Bool,
            QueryTerm::Leaf(leaf) => leaf.query_type(),
        }
    }

    pub fn is_bool_query(&self) -> bool {
        matches!(self, QueryTerm::Bool(_))
    }

    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            QueryTerm::Bool(query) => Some(query),
            QueryTerm::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafQuery> {
        match self {
            QueryTerm::Leaf(leaf) => Some(leaf),
            QueryTerm::Bool(_) => None,
        }
    }
}

impl From<BoolQuery> for QueryTerm {
    fn from(query: BoolQuery) -> Self {
        QueryTerm::Bool(query)
    }
}

impl From<LeafQuery> for QueryTerm {
    fn from(leaf: LeafQuery) -> Self {
        QueryTerm::Leaf(leaf)
    }
}

/// Clause list of a [`BoolQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

/// Boolean composite of `must`, `should` and `must_not` clauses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoolQuery {
    must: Vec<QueryTerm>,
    should: Vec<QueryTerm>,
    must_not: Vec<QueryTerm>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(&self) -> &[QueryTerm] {
        &self.must
    }

    pub fn should(&self) -> &[QueryTerm] {
        &self.should
    }

    pub fn must_not(&self) -> &[QueryTerm] {
        &self.must_not
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    pub fn with_must(self, clause: impl Into<QueryTerm>) -> Self {
        self.with_clause(Occur::Must, clause)
    }

    pub fn with_should(self, clause: impl Into<QueryTerm>) -> Self {
        self.with_clause(Occur::Should, clause)
    }

    /// Adds an exclusion. Leaves are stored as given; a leaf that is not
    /// marked prohibited is rejected when the query is evaluated.
    pub fn with_must_not(self, clause: impl Into<QueryTerm>) -> Self {
        self.with_clause(Occur::MustNot, clause)
    }

    pub fn with_clause(mut self, occur: Occur, clause: impl Into<QueryTerm>) -> Self {
        self.push(occur, clause.into());
        self
    }

    pub(crate) fn push(&mut self, occur: Occur, clause: QueryTerm) {
        match occur {
            Occur::Must => self.must.push(clause),
            Occur::Should => self.should.push(clause),
            Occur::MustNot => self.must_not.push(clause),
        }
    }
}

/// Position of the wildcard in a wildcard leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wildcard {
    /// `value*`: terms starting with the value.
    Prefix,
    /// `*value`: terms ending with the value.
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    Term,
    Phrase { slop: u32 },
    Wildcard(Wildcard),
    Fuzzy { distance: u32 },
}

/// A single matchable value, optionally scoped to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    value: String,
    kind: LeafKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f64>,
    #[serde(default)]
    prohibited: bool,
}

impl LeafQuery {
    pub fn new(value: impl Into<String>, kind: LeafKind) -> Self {
        LeafQuery {
            field: None,
            value: value.into(),
            kind,
            boost: None,
            prohibited: false,
        }
    }

    pub fn term(value: impl Into<String>) -> Self {
        Self::new(value, LeafKind::Term)
    }

    pub fn phrase(value: impl Into<String>, slop: u32) -> Self {
        Self::new(value, LeafKind::Phrase { slop })
    }

    pub fn prefix(value: impl Into<String>) -> Self {
        Self::new(value, LeafKind::Wildcard(Wildcard::Prefix))
    }

    pub fn suffix(value: impl Into<String>) -> Self {
        Self::new(value, LeafKind::Wildcard(Wildcard::Suffix))
    }

    pub fn fuzzy(value: impl Into<String>, distance: u32) -> Self {
        Self::new(value, LeafKind::Fuzzy { distance })
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_prohibited(mut self, prohibited: bool) -> Self {
        self.prohibited = prohibited;
        self
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> LeafKind {
        self.kind
    }

    pub fn boost(&self) -> Option<f64> {
        self.boost
    }

    pub fn is_prohibited(&self) -> bool {
        self.prohibited
    }

    pub fn is_phrase(&self) -> bool {
        matches!(self.kind, LeafKind::Phrase { .. })
    }

    pub fn slop(&self) -> Option<u32> {
        match self.kind {
            LeafKind::Phrase { slop } => Some(slop),
            _ => None,
        }
    }

    pub fn fuzziness(&self) -> Option<u32> {
        match self.kind {
            LeafKind::Fuzzy { distance } => Some(distance),
            _ => None,
        }
    }

    pub fn wildcard(&self) -> Option<Wildcard> {
        match self.kind {
            LeafKind::Wildcard(wildcard) => Some(wildcard),
            _ => None,
        }
    }

    /// Words of the value, split on whitespace.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.value.split_whitespace()
    }

    pub fn query_type(&self) -> QueryType {
        match self.kind {
            LeafKind::Term => QueryType::Term,
            LeafKind::Phrase { .. } => QueryType::Phrase,
            LeafKind::Wildcard(_) => QueryType::Wildcard,
            LeafKind::Fuzzy { .. } => QueryType::Fuzzy,
        }
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
    }

    pub(crate) fn set_kind(&mut self, kind: LeafKind) {
        self.kind = kind;
    }
}

/// Kind of a query node, for adapters that translate trees into other query
/// representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Bool,
    Term,
    Phrase,
    Wildcard,
    Fuzzy,
}

impl QueryType {
    pub const fn name(&self) -> &'static str {
        match self {
            QueryType::Bool => "BoolQuery",
            QueryType::Term => "TermQuery",
            QueryType::Phrase => "PhraseQuery",
            QueryType::Wildcard => "WildCardQuery",
            QueryType::Fuzzy => "FuzzyQuery",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_kinds() {
        let leaf = LeafQuery::phrase("ware helden", 1).with_boost(2.5);
        assert!(leaf.is_phrase());
        assert_eq!(leaf.slop(), Some(1));
        assert_eq!(leaf.fuzziness(), None);
        assert_eq!(leaf.boost(), Some(2.5));
        assert_eq!(leaf.words().collect::<Vec<_>>(), vec!["ware", "helden"]);
        assert_eq!(leaf.query_type(), QueryType::Phrase);

        assert_eq!(LeafQuery::prefix("zer").wildcard(), Some(Wildcard::Prefix));
        assert_eq!(LeafQuery::fuzzy("zer", 2).fuzziness(), Some(2));
        assert_eq!(LeafQuery::term("x").query_type().to_string(), "TermQuery");
    }

    #[test]
    fn test_bool_builder() {
        let query = BoolQuery::new()
            .with_must(LeafQuery::term("one"))
            .with_should(LeafQuery::term("two"))
            .with_must_not(LeafQuery::term("three").with_prohibited(true));
        assert_eq!(query.must().len(), 1);
        assert_eq!(query.should().len(), 1);
        assert_eq!(query.must_not().len(), 1);
        assert!(!query.is_empty());

        let term: QueryTerm = query.into();
        assert!(term.is_bool_query());
        assert_eq!(term.query_type(), QueryType::Bool);
        assert!(term.as_leaf().is_none());
    }

    #[test]
    fn test_serialize_shape() {
        let term: QueryTerm = LeafQuery::prefix("zer").with_field("title").into();
        let json = serde_json::to_value(&term).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "leaf": {
                    "field": "title",
                    "value": "zer",
                    "kind": { "wildcard": "prefix" },
                    "prohibited": false
                }
            })
        );
        let back: QueryTerm = serde_json::from_value(json).unwrap();
        assert_eq!(back, term);
    }
}
