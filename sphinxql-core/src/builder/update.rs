//! UPDATE

use super::common::{Column, IntoColumnValues};
use super::{QueryBuilder, QueryKind};
use crate::quote::quote_index;
use crate::{Error, Result};

impl QueryBuilder {
    /// Make this an UPDATE of `index`
    pub fn update(mut self, index: impl Into<Column>) -> Self {
        self.set_kind(QueryKind::Update);
        self.index_target = Some(index.into());
        self
    }

    /// Append `column = value` assignments
    ///
    /// # Examples
    /// ```
    /// use sphinxql_core::{QueryBuilder, ToSql};
    ///
    /// let query = QueryBuilder::new()
    ///     .update("products")
    ///     .set([("price", 10), ("in_stock", 1)])
    ///     .where_(("id", 42));
    ///
    /// assert_eq!(
    ///     query.to_sql().unwrap(),
    ///     "UPDATE `products` SET `price` = 10, `in_stock` = 1 WHERE `id` = 42"
    /// );
    /// ```
    pub fn set<D>(mut self, data: D) -> Self
    where
        D: IntoColumnValues,
    {
        self.assignments.extend(data.into_column_values());
        self
    }

    pub(crate) fn compile_update(&self) -> Result<String> {
        let index = self
            .index_target
            .as_ref()
            .ok_or_else(|| Error::invalid_query("UPDATE requires a target index"))?;

        if self.assignments.is_empty() {
            return Err(Error::invalid_query("UPDATE requires SET clauses"));
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            quote_index(index)?,
            self.render_assignments()?.join(", ")
        );

        self.write_where(&mut sql)?;
        self.write_order_by(&mut sql)?;

        if let Some(limit) = self.limit_value {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{op, ToSql, Value};

    #[test]
    fn test_update_with_conditions() {
        let sql = QueryBuilder::new()
            .update("products")
            .set([("price", Value::from(19.99)), ("title", Value::from("new"))])
            .where_(("id", op::IN, vec![1, 2, 3]))
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE `products` SET `price` = 19.990000, `title` = 'new' WHERE `id` IN (1,2,3)"
        );
    }

    #[test]
    fn test_set_appends() {
        let sql = QueryBuilder::new()
            .update("rt")
            .set([("a", 1)])
            .set(vec![("b", 2)])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE `rt` SET `a` = 1, `b` = 2");
    }

    #[test]
    fn test_update_order_and_limit() {
        let sql = QueryBuilder::new()
            .update("rt")
            .set([("gid", 0)])
            .where_(("gid", op::GT, 100))
            .order_by_asc("id")
            .limit(50)
            .offset(10)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE `rt` SET `gid` = 0 WHERE `gid` > 100 ORDER BY `id` ASC LIMIT 50"
        );
    }

    #[test]
    fn test_update_mva_attribute() {
        let sql = QueryBuilder::new()
            .update("rt")
            .set([("tags", vec![3, 4])])
            .where_(("id", 1))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE `rt` SET `tags` = (3, 4) WHERE `id` = 1");
    }

    #[test]
    fn test_update_requires_set() {
        let result = QueryBuilder::new().update("rt").where_(("id", 1)).to_sql();
        assert!(result.unwrap_err().to_string().contains("UPDATE requires SET clauses"));
    }
}
