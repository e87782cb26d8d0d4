//! INSERT and REPLACE

use super::common::{Column, IntoColumnValues, IntoColumns};
use super::{QueryBuilder, QueryKind, ToSql};
use crate::quote::{quote_column, quote_index, quote_value};
use crate::{Error, Result, Value};

/// Where the inserted rows come from
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// Literal value groups, one per row
    Values(Vec<Vec<Value>>),
    /// `INSERT ... SELECT`
    Select(Box<QueryBuilder>),
}

impl Default for InsertSource {
    fn default() -> Self {
        InsertSource::Values(Vec::new())
    }
}

impl QueryBuilder {
    /// Make this an INSERT into `index` with one row of `column => value`
    /// pairs
    ///
    /// The row's keys become the column list unless columns were already
    /// set; calling it again appends another row.
    ///
    /// # Examples
    /// ```
    /// use sphinxql_core::{QueryBuilder, ToSql};
    ///
    /// let query = QueryBuilder::new().insert("docs", [("id", 1), ("gid", 7)]);
    /// assert_eq!(
    ///     query.to_sql().unwrap(),
    ///     "INSERT INTO `docs` (`id`, `gid`) VALUES (1, 7)"
    /// );
    /// ```
    pub fn insert<D>(self, index: impl Into<Column>, data: D) -> Self
    where
        D: IntoColumnValues,
    {
        self.insert_into(index).push_row(data)
    }

    /// Same as [`QueryBuilder::insert`] but replaces documents with the same id
    pub fn replace<D>(self, index: impl Into<Column>, data: D) -> Self
    where
        D: IntoColumnValues,
    {
        self.replace_into(index).push_row(data)
    }

    /// Make this an INSERT into `index` without adding a row
    pub fn insert_into(mut self, index: impl Into<Column>) -> Self {
        self.set_kind(QueryKind::Insert);
        self.index_target = Some(index.into());
        self
    }

    /// Make this a REPLACE into `index` without adding a row
    pub fn replace_into(mut self, index: impl Into<Column>) -> Self {
        self.set_kind(QueryKind::Replace);
        self.index_target = Some(index.into());
        self
    }

    /// Set the target index of INSERT, REPLACE, UPDATE or DELETE
    pub fn index(mut self, index: impl Into<Column>) -> Self {
        self.index_target = Some(index.into());
        self
    }

    /// Replace the INSERT column list
    pub fn columns<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.insert_columns = columns.into_columns();
        self
    }

    /// Append one value group
    pub fn values<I, V>(mut self, row: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        match &mut self.insert_source {
            InsertSource::Values(groups) => {
                groups.push(row.into_iter().map(Into::into).collect());
                Ok(self)
            }
            InsertSource::Select(_) => Err(Error::kind_conflict(
                "cannot add VALUES to an INSERT that already has a sub-select",
            )),
        }
    }

    /// Append several value groups
    pub fn values_many<R, I, V>(mut self, rows: R) -> Result<Self>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for row in rows {
            self = self.values(row)?;
        }
        Ok(self)
    }

    /// Insert the rows produced by a SELECT
    pub fn subselect(mut self, query: QueryBuilder) -> Result<Self> {
        if let InsertSource::Values(groups) = &self.insert_source {
            if !groups.is_empty() {
                return Err(Error::kind_conflict(
                    "cannot attach a sub-select to an INSERT that already has VALUES",
                ));
            }
        }
        self.insert_source = InsertSource::Select(Box::new(query));
        Ok(self)
    }

    fn push_row<D>(mut self, data: D) -> Self
    where
        D: IntoColumnValues,
    {
        let (columns, row): (Vec<Column>, Vec<Value>) =
            data.into_column_values().into_iter().unzip();
        if row.is_empty() {
            return self;
        }
        if self.insert_columns.is_empty() {
            self.insert_columns = columns;
        }
        if let InsertSource::Values(groups) = &mut self.insert_source {
            groups.push(row);
        } else {
            // A fresh row switches the source back to literal values
            self.insert_source = InsertSource::Values(vec![row]);
        }
        self
    }

    pub(crate) fn compile_insert(&self) -> Result<String> {
        let keyword = match self.kind {
            Some(QueryKind::Replace) => "REPLACE INTO",
            _ => "INSERT INTO",
        };
        let index = self
            .index_target
            .as_ref()
            .ok_or_else(|| Error::invalid_query(format!("{keyword} requires a target index")))?;

        let columns = self
            .insert_columns
            .iter()
            .map(quote_column)
            .collect::<Result<Vec<_>>>()?;

        let mut sql = format!("{keyword} {} ({}) ", quote_index(index)?, columns.join(", "));

        match &self.insert_source {
            InsertSource::Values(groups) => {
                let groups = groups
                    .iter()
                    .map(|group| {
                        let values = group.iter().map(quote_value).collect::<Result<Vec<_>>>()?;
                        Ok(format!("({})", values.join(", ")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                sql.push_str("VALUES ");
                sql.push_str(&groups.join(", "));
            }
            InsertSource::Select(query) => sql.push_str(&query.to_sql()?),
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_insert_with_escaping() {
        let sql = QueryBuilder::new()
            .insert("docs", [("id", Value::from(1)), ("body", Value::from("it's ok"))])
            .to_sql()
            .unwrap();
        assert_eq!(sql, r"INSERT INTO `docs` (`id`, `body`) VALUES (1, 'it\'s ok')");
    }

    #[test]
    fn test_insert_and_replace_keywords() {
        let insert = QueryBuilder::new().insert("rt", [("id", 1)]);
        let replace = QueryBuilder::new().replace("rt", [("id", 1)]);
        assert_eq!(insert.kind(), Some(QueryKind::Insert));
        assert_eq!(replace.kind(), Some(QueryKind::Replace));
        assert_eq!(insert.to_sql().unwrap(), "INSERT INTO `rt` (`id`) VALUES (1)");
        assert_eq!(replace.to_sql().unwrap(), "REPLACE INTO `rt` (`id`) VALUES (1)");
    }

    #[test]
    fn test_repeated_insert_appends_rows() {
        let sql = QueryBuilder::new()
            .insert("rt", [("id", 1), ("gid", 10)])
            .insert("rt", [("id", 2), ("gid", 20)])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO `rt` (`id`, `gid`) VALUES (1, 10), (2, 20)");
    }

    #[test]
    fn test_columns_and_values() {
        let sql = QueryBuilder::new()
            .insert_into("rt")
            .columns(["id", "title", "tags"])
            .values([Value::from(1), Value::from("one"), Value::from(vec![1, 2])])
            .unwrap()
            .values_many([[Value::from(2), Value::from("two"), Value::from(vec![3])]])
            .unwrap()
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO `rt` (`id`, `title`, `tags`) VALUES (1, 'one', (1, 2)), (2, 'two', (3))"
        );
    }

    #[test]
    fn test_btree_map_data() {
        let mut row = BTreeMap::new();
        row.insert("id".to_string(), Value::from(5));
        row.insert("content".to_string(), Value::from("x"));
        let sql = QueryBuilder::new().replace("rt", row).to_sql().unwrap();
        assert_eq!(sql, "REPLACE INTO `rt` (`content`, `id`) VALUES ('x', 5)");
    }

    #[test]
    fn test_subselect() {
        let source = QueryBuilder::new().select(["id", "title"]).from("plain");
        let sql = QueryBuilder::new()
            .insert_into("rt")
            .columns(["id", "title"])
            .subselect(source)
            .unwrap()
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO `rt` (`id`, `title`) SELECT `id`, `title` FROM `plain`"
        );
    }

    #[test]
    fn test_values_after_subselect_conflicts() {
        let result = QueryBuilder::new()
            .insert_into("rt")
            .subselect(QueryBuilder::new().select("id").from("plain"))
            .unwrap()
            .values([1]);
        assert!(matches!(result, Err(Error::KindConflict { .. })));
    }

    #[test]
    fn test_subselect_after_values_conflicts() {
        let result = QueryBuilder::new()
            .insert("rt", [("id", 1)])
            .subselect(QueryBuilder::new().select("id").from("plain"));
        assert!(matches!(result, Err(Error::KindConflict { .. })));
    }

    #[test]
    fn test_empty_insert_renders_empty_lists() {
        let sql = QueryBuilder::new().insert_into("rt").to_sql().unwrap();
        assert_eq!(sql, "INSERT INTO `rt` () VALUES ");
    }

    #[test]
    fn test_missing_index() {
        let result = QueryBuilder::of_kind(QueryKind::Insert).to_sql();
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
    }
}
