//! Common types and traits shared across all statement kinds

use std::collections::{BTreeMap, HashMap};

use crate::{Expression, IntoOperator, Operator, QueryBuilder, Value};

/// A column or index reference
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Plain or dotted name, `*` allowed
    Name(String),
    /// Literal fragment such as `WEIGHT()` or `COUNT(*)`
    Expr(Expression),
    /// Nested SELECT
    SubQuery(Box<QueryBuilder>),
    /// Any of the above with an `AS` alias
    Aliased(Box<Column>, String),
}

impl Column {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Attach an alias, replacing any previous one
    pub fn alias(self, alias: impl Into<String>) -> Self {
        match self {
            Self::Aliased(inner, _) => Self::Aliased(inner, alias.into()),
            other => Self::Aliased(Box::new(other), alias.into()),
        }
    }

    /// The column without its alias
    pub fn base(&self) -> &Column {
        match self {
            Self::Aliased(inner, _) => inner.base(),
            other => other,
        }
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::Name(name.to_string())
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::Name(name)
    }
}

impl From<&String> for Column {
    fn from(name: &String) -> Self {
        Column::Name(name.clone())
    }
}

// (name, alias) pair
impl From<(&str, &str)> for Column {
    fn from((name, alias): (&str, &str)) -> Self {
        Column::from(name).alias(alias)
    }
}

impl From<Expression> for Column {
    fn from(expr: Expression) -> Self {
        Column::Expr(expr)
    }
}

impl From<QueryBuilder> for Column {
    fn from(query: QueryBuilder) -> Self {
        Column::SubQuery(Box::new(query))
    }
}

/// Trait to convert various types into column lists
pub trait IntoColumns {
    fn into_columns(self) -> Vec<Column>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl IntoColumns for Column {
    fn into_columns(self) -> Vec<Column> {
        vec![self]
    }
}

impl IntoColumns for Expression {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl<T> IntoColumns for Vec<T>
where
    T: Into<Column>,
{
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T, const N: usize> IntoColumns for [T; N]
where
    T: Into<Column>,
{
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Into::into).collect()
    }
}

/// How a condition joins the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

impl std::fmt::Display for Logic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Logic::And => write!(f, "AND"),
            Logic::Or => write!(f, "OR"),
        }
    }
}

/// A single `column operator value` predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: Column,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(
        column: impl Into<Column>,
        operator: impl IntoOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into_operator(),
            value: value.into(),
        }
    }
}

/// Trait for conditions that can be used in WHERE and HAVING clauses
pub trait IntoCondition {
    fn into_condition(self) -> Condition;
}

impl IntoCondition for Condition {
    fn into_condition(self) -> Condition {
        self
    }
}

// Shorthand equality: where_(("id", 10))
impl<C, T> IntoCondition for (C, T)
where
    C: Into<Column>,
    T: Into<Value>,
{
    fn into_condition(self) -> Condition {
        Condition::new(self.0, Operator::EQ, self.1)
    }
}

// Explicit operators: where_(("price", op::GTE, 100)) or where_(("price", ">=", 100))
impl<C, O, T> IntoCondition for (C, O, T)
where
    C: Into<Column>,
    O: IntoOperator,
    T: Into<Value>,
{
    fn into_condition(self) -> Condition {
        Condition::new(self.0, self.1, self.2)
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// An ORDER BY entry
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEntry {
    pub column: Column,
    pub direction: SortDirection,
}

impl<C> From<(C, SortDirection)> for OrderEntry
where
    C: Into<Column>,
{
    fn from((column, direction): (C, SortDirection)) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// A field name or query text inside MATCH()
#[derive(Debug, Clone, PartialEq)]
pub enum MatchToken {
    /// User text, escaped so it cannot form full-text operators
    Text(String),
    /// Trusted full-text syntax, used verbatim
    Expr(Expression),
}

impl From<&str> for MatchToken {
    fn from(text: &str) -> Self {
        MatchToken::Text(text.to_string())
    }
}

impl From<String> for MatchToken {
    fn from(text: String) -> Self {
        MatchToken::Text(text)
    }
}

impl From<Expression> for MatchToken {
    fn from(expr: Expression) -> Self {
        MatchToken::Expr(expr)
    }
}

/// One full-text term, optionally scoped to fields
#[derive(Debug, Clone, PartialEq)]
pub struct MatchClause {
    pub fields: Option<Vec<MatchToken>>,
    pub text: MatchToken,
}

/// Trait to convert various types into MATCH field lists
pub trait IntoMatchFields {
    fn into_match_fields(self) -> Vec<MatchToken>;
}

impl IntoMatchFields for &str {
    fn into_match_fields(self) -> Vec<MatchToken> {
        vec![self.into()]
    }
}

impl IntoMatchFields for String {
    fn into_match_fields(self) -> Vec<MatchToken> {
        vec![self.into()]
    }
}

impl IntoMatchFields for Expression {
    fn into_match_fields(self) -> Vec<MatchToken> {
        vec![self.into()]
    }
}

impl<T> IntoMatchFields for Vec<T>
where
    T: Into<MatchToken>,
{
    fn into_match_fields(self) -> Vec<MatchToken> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T, const N: usize> IntoMatchFields for [T; N]
where
    T: Into<MatchToken>,
{
    fn into_match_fields(self) -> Vec<MatchToken> {
        self.into_iter().map(Into::into).collect()
    }
}

/// A `FACET ...` clause body
#[derive(Debug, Clone, PartialEq)]
pub enum Facet {
    Raw(String),
    Expr(Expression),
    Query(Box<QueryBuilder>),
}

impl From<&str> for Facet {
    fn from(body: &str) -> Self {
        Facet::Raw(body.to_string())
    }
}

impl From<String> for Facet {
    fn from(body: String) -> Self {
        Facet::Raw(body)
    }
}

impl From<Expression> for Facet {
    fn from(expr: Expression) -> Self {
        Facet::Expr(expr)
    }
}

impl From<QueryBuilder> for Facet {
    fn from(query: QueryBuilder) -> Self {
        Facet::Query(Box::new(query))
    }
}

/// Trait for types that can be converted to ordered `column => value` pairs
///
/// Used for INSERT rows and UPDATE assignments. Ordered inputs keep their
/// order; `HashMap` iteration order is unspecified.
pub trait IntoColumnValues {
    fn into_column_values(self) -> Vec<(Column, Value)>;
}

impl<K, V> IntoColumnValues for Vec<(K, V)>
where
    K: Into<Column>,
    V: Into<Value>,
{
    fn into_column_values(self) -> Vec<(Column, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, V, const N: usize> IntoColumnValues for [(K, V); N]
where
    K: Into<Column>,
    V: Into<Value>,
{
    fn into_column_values(self) -> Vec<(Column, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl IntoColumnValues for BTreeMap<String, Value> {
    fn into_column_values(self) -> Vec<(Column, Value)> {
        self.into_iter().map(|(k, v)| (Column::Name(k), v)).collect()
    }
}

impl IntoColumnValues for HashMap<String, Value> {
    fn into_column_values(self) -> Vec<(Column, Value)> {
        self.into_iter().map(|(k, v)| (Column::Name(k), v)).collect()
    }
}
