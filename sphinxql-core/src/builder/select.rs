//! SELECT clauses, MATCH, FACET and the SELECT compiler

use super::common::{
    Column, Facet, IntoColumns, IntoCondition, IntoMatchFields, Logic, MatchClause, MatchToken,
};
use super::{QueryBuilder, QueryKind, ToSql};
use crate::quote::{escape_match, escape_string, quote_column, quote_index};
use crate::Result;

impl QueryBuilder {
    /// Set the column list and make this a SELECT
    ///
    /// An empty list keeps the current columns, which render as `*` when
    /// none were ever given.
    pub fn select<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        let columns = columns.into_columns();
        if !columns.is_empty() {
            self.select_columns = columns;
        }
        if self.kind != Some(QueryKind::MultiSelect) {
            self.set_kind(QueryKind::Select);
        }
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Add an index to the FROM list
    pub fn from(mut self, index: impl Into<Column>) -> Self {
        self.from_indexes.push(index.into());
        self
    }

    /// Add a full-text term restricted to the given fields
    pub fn match_<F, T>(mut self, fields: F, text: T) -> Self
    where
        F: IntoMatchFields,
        T: Into<MatchToken>,
    {
        self.matches.push(MatchClause {
            fields: Some(fields.into_match_fields()),
            text: text.into(),
        });
        self
    }

    /// Add a full-text term searched in all fields
    pub fn match_text<T>(mut self, text: T) -> Self
    where
        T: Into<MatchToken>,
    {
        self.matches.push(MatchClause {
            fields: None,
            text: text.into(),
        });
        self
    }

    /// Append a FACET clause; the statement now returns one result set
    /// for the main query plus one per facet
    pub fn facet(mut self, facet: impl Into<Facet>) -> Self {
        self.facets.push(facet.into());
        self.set_kind(QueryKind::MultiSelect);
        self
    }

    pub fn group_by<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.group_by_columns.extend(columns.into_columns());
        self
    }

    /// Add a HAVING condition (AND)
    pub fn having<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.and_having(condition)
    }

    pub fn and_having<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.having_conditions.push(Logic::And, condition.into_condition());
        self
    }

    pub fn or_having<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.having_conditions.push(Logic::Or, condition.into_condition());
        self
    }

    pub fn having_many<I, C>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        for condition in conditions {
            self = self.and_having(condition);
        }
        self
    }

    pub fn or_having_many<I, C>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        for condition in conditions {
            self = self.or_having(condition);
        }
        self
    }

    pub fn having_open(self) -> Self {
        self.and_having_open()
    }

    pub fn and_having_open(mut self) -> Self {
        self.having_conditions.open(Logic::And);
        self.set_last_target_having();
        self
    }

    pub fn or_having_open(mut self) -> Self {
        self.having_conditions.open(Logic::Or);
        self.set_last_target_having();
        self
    }

    /// Append an OPTION setting such as `ranker=bm25` or `max_matches=5000`
    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub(crate) fn compile_select(&self) -> Result<String> {
        let mut sql = String::from("SELECT ");

        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        if self.select_columns.is_empty() {
            sql.push('*');
        } else {
            let mut rendered: Vec<String> = Vec::with_capacity(self.select_columns.len());
            for column in &self.select_columns {
                let column = quote_column(column)?;
                if !rendered.contains(&column) {
                    rendered.push(column);
                }
            }
            sql.push_str(&rendered.join(", "));
        }

        if !self.from_indexes.is_empty() {
            let indexes = self
                .from_indexes
                .iter()
                .map(quote_index)
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(" FROM ");
            sql.push_str(&indexes.join(", "));
        }

        if !self.matches.is_empty() || !self.where_conditions.is_empty() {
            sql.push_str(" WHERE ");
            if !self.matches.is_empty() {
                sql.push_str("MATCH(");
                sql.push_str(&self.compile_match());
                sql.push(')');
                if !self.where_conditions.is_empty() {
                    sql.push_str(" AND ");
                }
            }
            sql.push_str(&self.where_conditions.to_sql("WHERE")?);
        }

        if !self.group_by_columns.is_empty() {
            let columns = self
                .group_by_columns
                .iter()
                .map(quote_column)
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(" GROUP BY ");
            sql.push_str(&columns.join(", "));
        }

        if !self.having_conditions.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having_conditions.to_sql("HAVING")?);
        }

        self.write_order_by(&mut sql)?;

        match (self.limit_value, self.offset_value) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {offset}, {limit}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            _ => {}
        }

        if !self.options.is_empty() {
            sql.push_str(" OPTION ");
            sql.push_str(&self.options.join(", "));
        }

        for facet in &self.facets {
            sql.push_str(" FACET ");
            sql.push_str(&facet.to_sql()?);
        }

        Ok(sql)
    }

    // The whole argument becomes one string literal
    fn compile_match(&self) -> String {
        let terms = self
            .matches
            .iter()
            .map(|clause| match &clause.fields {
                None => escape_match(&clause.text),
                Some(fields) => {
                    let fields = fields.iter().map(escape_match).collect::<Vec<_>>();
                    format!("@({}) {}", fields.join(","), escape_match(&clause.text))
                }
            })
            .collect::<Vec<_>>();
        escape_string(&terms.join(" "))
    }
}

impl ToSql for Facet {
    fn to_sql(&self) -> Result<String> {
        match self {
            Facet::Raw(body) => Ok(body.clone()),
            Facet::Expr(expr) => expr.to_sql(),
            Facet::Query(query) => query.to_sql(),
        }
    }
}
