//! SphinxQL Core - query building and compiling for Sphinx / Manticore
//!
//! This crate renders a fluent builder's state into SphinxQL text and
//! hands the text to an [`Executor`]. Compilation is pure; all values are
//! quoted inline.

pub mod builder;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod expression;
pub mod operator;
pub mod quote;
pub mod value;

// Re-export main types
pub use builder::{
    Column, Condition, Facet, InsertSource, IntoColumnValues, IntoColumns, IntoCondition,
    IntoMatchFields, Logic, MatchToken, OrderEntry, QueryBuilder, QueryKind, SortDirection, ToSql,
};
pub use command::SearchQuery;
pub use config::SphinxConfig;
pub use error::{Error, Result};
pub use executor::{ExecutableQuery, Executor, QueryResult, Row, TracingExecutor};
pub use expression::Expression;
pub use operator::{op, IntoOperator, Operator};
pub use value::Value;

#[cfg(feature = "mysql")]
pub use executor::mysql::SphinxPool;
