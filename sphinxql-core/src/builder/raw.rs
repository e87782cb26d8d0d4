//! Raw statements with named parameters

use super::{QueryBuilder, QueryKind, ToSql};
use crate::{Error, Expression, Result, Value};

impl QueryBuilder {
    /// Build a statement from literal text
    ///
    /// Placeholders in the text are substituted with quoted values bound
    /// through [`QueryBuilder::raw_param`].
    ///
    /// ```
    /// use sphinxql_core::{QueryBuilder, ToSql};
    ///
    /// let query = QueryBuilder::raw("SHOW TABLES LIKE :pattern").raw_param(":pattern", "rt%");
    /// assert_eq!(query.to_sql().unwrap(), "SHOW TABLES LIKE 'rt%'");
    /// ```
    pub fn raw(template: impl Into<Expression>) -> Self {
        Self::new().raw_statement(template)
    }

    /// Turn this builder into a raw statement
    pub fn raw_statement(mut self, template: impl Into<Expression>) -> Self {
        self.set_kind(QueryKind::Raw);
        self.raw_template = Some(template.into());
        self
    }

    /// Bind a placeholder of the raw statement
    pub fn raw_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let template = self.raw_template.take().unwrap_or_default();
        self.raw_template = Some(template.param(key, value));
        self
    }

    pub(crate) fn compile_raw(&self) -> Result<String> {
        self.raw_template
            .as_ref()
            .ok_or_else(|| Error::invalid_query("raw statement has no text"))?
            .to_sql()
    }
}
