//! DELETE

use super::common::Column;
use super::{QueryBuilder, QueryKind};
use crate::quote::quote_index;
use crate::{Error, Result};

impl QueryBuilder {
    /// Make this a DELETE from `index`
    ///
    /// # Examples
    /// ```
    /// use sphinxql_core::{QueryBuilder, ToSql, op};
    ///
    /// let query = QueryBuilder::new()
    ///     .delete("rt")
    ///     .where_(("id", op::IN, vec![1, 2]));
    /// assert_eq!(query.to_sql().unwrap(), "DELETE FROM `rt` WHERE `id` IN (1,2)");
    /// ```
    pub fn delete(mut self, index: impl Into<Column>) -> Self {
        self.set_kind(QueryKind::Delete);
        self.index_target = Some(index.into());
        self
    }

    pub(crate) fn compile_delete(&self) -> Result<String> {
        let index = self
            .index_target
            .as_ref()
            .ok_or_else(|| Error::invalid_query("DELETE requires a target index"))?;

        let mut sql = format!("DELETE FROM {}", quote_index(index)?);

        self.write_where(&mut sql)?;
        self.write_order_by(&mut sql)?;

        if let Some(limit) = self.limit_value {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(sql)
    }
}
