//! Query builder module
//!
//! A single [`QueryBuilder`] carries the clause state for every statement
//! kind. Configuration methods consume and return the builder; compiling
//! dispatches on the kind to the routine in the matching submodule.

pub mod common;
pub mod condition;
pub mod delete;
pub mod insert;
pub mod raw;
pub mod select;
pub mod update;

pub use common::{
    Column, Condition, Facet, IntoColumnValues, IntoColumns, IntoCondition, IntoMatchFields,
    Logic, MatchClause, MatchToken, OrderEntry, SortDirection,
};
pub use condition::{ConditionEntry, ConditionGroup};
pub use insert::InsertSource;

use crate::quote::{quote_column, quote_value};
use crate::{Expression, Result, Value};

/// Trait for anything that renders to SphinxQL text
pub trait ToSql {
    fn to_sql(&self) -> Result<String>;
}

/// Statement type a builder compiles to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Raw,
    Select,
    Insert,
    Replace,
    Update,
    Delete,
    /// SELECT with trailing FACET clauses, answered by several result sets
    MultiSelect,
}

/// Which condition group `end()` closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ConditionTarget {
    #[default]
    Where,
    Having,
}

/// Fluent builder for every SphinxQL statement kind
///
/// # Examples
/// ```
/// use sphinxql_core::{QueryBuilder, ToSql, SortDirection, op};
///
/// let query = QueryBuilder::new()
///     .select(["id", "title"])
///     .from("products")
///     .match_text("red shoes")
///     .where_(("price", op::LTE, 100))
///     .order_by("id", SortDirection::Desc)
///     .limit(20);
///
/// assert_eq!(
///     query.to_sql().unwrap(),
///     "SELECT `id`, `title` FROM `products` WHERE MATCH('red shoes') AND `price` <= 100 ORDER BY `id` DESC LIMIT 20"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryBuilder {
    pub(crate) kind: Option<QueryKind>,

    // SELECT
    pub(crate) select_columns: Vec<Column>,
    pub(crate) distinct: bool,
    pub(crate) from_indexes: Vec<Column>,
    pub(crate) matches: Vec<MatchClause>,
    pub(crate) group_by_columns: Vec<Column>,
    pub(crate) having_conditions: ConditionGroup,
    pub(crate) options: Vec<String>,
    pub(crate) facets: Vec<Facet>,
    pub(crate) offset_value: Option<u64>,

    // INSERT / REPLACE / UPDATE / DELETE target
    pub(crate) index_target: Option<Column>,
    pub(crate) insert_columns: Vec<Column>,
    pub(crate) insert_source: InsertSource,
    pub(crate) assignments: Vec<(Column, Value)>,

    // Raw
    pub(crate) raw_template: Option<Expression>,

    // Shared
    pub(crate) where_conditions: ConditionGroup,
    pub(crate) order_by_entries: Vec<OrderEntry>,
    pub(crate) limit_value: Option<u64>,
    last_target: ConditionTarget,
}

impl QueryBuilder {
    /// Create a builder with no kind; one of the kind-setting methods must
    /// be called before it compiles
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder of the given kind
    pub fn of_kind(kind: QueryKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> Option<QueryKind> {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: QueryKind) {
        self.kind = Some(kind);
    }

    /// Add a WHERE condition (AND)
    pub fn where_<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.and_where(condition)
    }

    /// Add an AND WHERE condition
    pub fn and_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_conditions.push(Logic::And, condition.into_condition());
        self
    }

    /// Add an OR WHERE condition
    pub fn or_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_conditions.push(Logic::Or, condition.into_condition());
        self
    }

    /// Add several AND WHERE conditions
    pub fn where_many<I, C>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        for condition in conditions {
            self = self.and_where(condition);
        }
        self
    }

    /// Add several OR WHERE conditions
    pub fn or_where_many<I, C>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        for condition in conditions {
            self = self.or_where(condition);
        }
        self
    }

    /// Open a bracketed WHERE group joined with AND
    pub fn where_open(self) -> Self {
        self.and_where_open()
    }

    pub fn and_where_open(mut self) -> Self {
        self.where_conditions.open(Logic::And);
        self.last_target = ConditionTarget::Where;
        self
    }

    pub fn or_where_open(mut self) -> Self {
        self.where_conditions.open(Logic::Or);
        self.last_target = ConditionTarget::Where;
        self
    }

    /// `and_where` that ignores NULL, blank strings and empty lists
    ///
    /// Handy for search forms where an empty input means "no filter".
    pub fn filter<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let condition = condition.into_condition();
        if condition.value.is_blank() {
            return self;
        }
        self.and_where(condition)
    }

    /// `or_where` that ignores NULL, blank strings and empty lists
    pub fn or_filter<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let condition = condition.into_condition();
        if condition.value.is_blank() {
            return self;
        }
        self.or_where(condition)
    }

    /// Close the most recent bracket of the last used condition group
    ///
    /// With `close_if_empty`, a bracket that was opened and never filled is
    /// dropped instead of being closed.
    pub fn end(mut self, close_if_empty: bool) -> Result<Self> {
        match self.last_target {
            ConditionTarget::Where => self.where_conditions.close(close_if_empty, "WHERE")?,
            ConditionTarget::Having => self.having_conditions.close(close_if_empty, "HAVING")?,
        }
        Ok(self)
    }

    /// Add an ORDER BY entry
    pub fn order_by(mut self, column: impl Into<Column>, direction: SortDirection) -> Self {
        self.order_by_entries.push(OrderEntry {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn order_by_asc(self, column: impl Into<Column>) -> Self {
        self.order_by(column, SortDirection::Asc)
    }

    pub fn order_by_desc(self, column: impl Into<Column>) -> Self {
        self.order_by(column, SortDirection::Desc)
    }

    /// Replace the ORDER BY list
    pub fn order_by_all<I, E>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<OrderEntry>,
    {
        self.order_by_entries = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn clear_order_by(mut self) -> Self {
        self.order_by_entries.clear();
        self
    }

    /// Set LIMIT
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_value = Some(limit);
        self
    }

    /// Set OFFSET; only rendered together with a limit
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_value = Some(offset);
        self
    }

    /// Clear every clause, keeping only the kind
    pub fn reset(self) -> Self {
        Self {
            kind: self.kind,
            ..Self::default()
        }
    }

    pub(crate) fn set_last_target_having(&mut self) {
        self.last_target = ConditionTarget::Having;
    }

    // Shared trailing clauses for UPDATE and DELETE
    pub(crate) fn write_where(&self, sql: &mut String) -> Result<()> {
        if !self.where_conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_conditions.to_sql("WHERE")?);
        }
        Ok(())
    }

    pub(crate) fn write_order_by(&self, sql: &mut String) -> Result<()> {
        if !self.order_by_entries.is_empty() {
            let entries = self
                .order_by_entries
                .iter()
                .map(|entry| Ok(format!("{} {}", quote_column(&entry.column)?, entry.direction)))
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&entries.join(", "));
        }
        Ok(())
    }

    pub(crate) fn render_assignments(&self) -> Result<Vec<String>> {
        self.assignments
            .iter()
            .map(|(column, value)| {
                Ok(format!("{} = {}", quote_column(column)?, quote_value(value)?))
            })
            .collect()
    }
}

impl ToSql for QueryBuilder {
    fn to_sql(&self) -> Result<String> {
        match self.kind {
            None => Err(crate::Error::UnsupportedKind),
            Some(QueryKind::Select | QueryKind::MultiSelect) => self.compile_select(),
            Some(QueryKind::Insert | QueryKind::Replace) => self.compile_insert(),
            Some(QueryKind::Update) => self.compile_update(),
            Some(QueryKind::Delete) => self.compile_delete(),
            Some(QueryKind::Raw) => self.compile_raw(),
        }
    }
}
