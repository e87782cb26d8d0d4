//! SphinxQL - a fluent query builder for Sphinx and Manticore search
//!
//! Builders are plain values: configure them with chained calls, compile
//! them with [`ToSql::to_sql`], or run them against any [`Executor`].
//!
//! ```
//! use sphinxql::{from, op, ToSql};
//!
//! let query = from("products")
//!     .select(["id", "title"])
//!     .match_(["title"], "wireless mouse")
//!     .where_(("price", op::BETWEEN, [10, 50]))
//!     .limit(20);
//!
//! assert_eq!(
//!     query.to_sql().unwrap(),
//!     "SELECT `id`, `title` FROM `products` WHERE MATCH('@(title) wireless mouse') AND `price` BETWEEN 10 AND 50 LIMIT 20"
//! );
//! ```

pub use sphinxql_core::builder;
pub use sphinxql_core::command;
pub use sphinxql_core::quote;

pub use sphinxql_core::{
    op, Column, Condition, Error, ExecutableQuery, Executor, Expression, Facet, InsertSource,
    IntoColumnValues, IntoColumns, IntoCondition, IntoMatchFields, IntoOperator, Logic,
    MatchToken, Operator, OrderEntry, QueryBuilder, QueryKind, QueryResult, Result, Row,
    SearchQuery, SortDirection, SphinxConfig, ToSql, TracingExecutor, Value,
};

#[cfg(feature = "mysql")]
pub use sphinxql_core::SphinxPool;

/// Start a SELECT from the given index
pub fn from(index: impl Into<Column>) -> QueryBuilder {
    QueryBuilder::new().select(Vec::<Column>::new()).from(index)
}

/// Start a SELECT with the given columns
pub fn select<C: IntoColumns>(columns: C) -> QueryBuilder {
    QueryBuilder::new().select(columns)
}

/// Start an INSERT into the given index
pub fn insert(index: impl Into<Column>) -> QueryBuilder {
    QueryBuilder::new().insert_into(index)
}

/// Start a REPLACE into the given index
pub fn replace(index: impl Into<Column>) -> QueryBuilder {
    QueryBuilder::new().replace_into(index)
}

/// Start an UPDATE of the given index
pub fn update(index: impl Into<Column>) -> QueryBuilder {
    QueryBuilder::new().update(index)
}

/// Start a DELETE from the given index
pub fn delete(index: impl Into<Column>) -> QueryBuilder {
    QueryBuilder::new().delete(index)
}

/// A raw statement with `raw_param` placeholders
pub fn raw(template: impl Into<Expression>) -> QueryBuilder {
    QueryBuilder::raw(template)
}

/// A literal fragment, inserted without identifier quoting
///
/// ```
/// use sphinxql::{expr, select, ToSql};
///
/// let query = select(vec![expr("WEIGHT()").into(), sphinxql::col("id")]).from("docs");
/// assert_eq!(query.to_sql().unwrap(), "SELECT WEIGHT(), `id` FROM `docs`");
/// ```
pub fn expr(template: impl Into<String>) -> Expression {
    Expression::new(template)
}

/// A column reference that can be aliased
///
/// ```
/// use sphinxql::{col, from, ToSql};
///
/// let query = from("orders").select(vec![col("order_id").alias("id")]);
/// assert_eq!(query.to_sql().unwrap(), "SELECT `order_id` AS `id` FROM `orders`");
/// ```
pub fn col(name: &str) -> Column {
    Column::from(name)
}
