//! Literal SQL fragments with named placeholders

use std::collections::BTreeMap;
use std::fmt;

use crate::quote::quote_value;
use crate::{Result, ToSql, Value};

/// A fragment that is inserted into the statement without identifier
/// quoting, such as `COUNT(*)`, `WEIGHT()` or `IN(tags, :a, :b)`
///
/// Placeholders are replaced by their quoted values when the fragment is
/// compiled. Keys are used exactly as written, so `:id` and `{id}` are both
/// valid placeholder styles.
///
/// ```
/// use sphinxql_core::Expression;
///
/// let expr = Expression::new("IN(tags, :first, :second)")
///     .param(":first", 1)
///     .param(":second", "two");
/// assert_eq!(expr.compile().unwrap(), "IN(tags, 1, 'two')");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    template: String,
    parameters: BTreeMap<String, Value>,
}

impl Expression {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Bind a value to a placeholder key, replacing any previous binding
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Alias of [`Expression::param`]
    pub fn bind(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.param(key, value)
    }

    /// Merge several bindings; later keys win
    pub fn parameters<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.parameters.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The template without substitution
    pub fn value(&self) -> &str {
        &self.template
    }

    /// Substitute every bound placeholder with its quoted value
    ///
    /// One left-to-right pass; at each position the longest matching key
    /// is used, and substituted text is not scanned again.
    pub fn compile(&self) -> Result<String> {
        if self.parameters.is_empty() {
            return Ok(self.template.clone());
        }

        let mut replacements = self
            .parameters
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| Ok((key.as_str(), quote_value(value)?)))
            .collect::<Result<Vec<_>>>()?;
        replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        'scan: while let Some(ch) = rest.chars().next() {
            for (key, quoted) in &replacements {
                if let Some(tail) = rest.strip_prefix(key) {
                    out.push_str(quoted);
                    rest = tail;
                    continue 'scan;
                }
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
        Ok(out)
    }
}

impl ToSql for Expression {
    fn to_sql(&self) -> Result<String> {
        self.compile()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl From<&str> for Expression {
    fn from(template: &str) -> Self {
        Expression::new(template)
    }
}

impl From<String> for Expression {
    fn from(template: String) -> Self {
        Expression::new(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_without_parameters_is_verbatim() {
        let expr = Expression::new("COUNT(*)");
        assert_eq!(expr.compile().unwrap(), "COUNT(*)");
        assert_eq!(expr.to_string(), "COUNT(*)");
    }

    #[test]
    fn test_values_are_quoted() {
        let expr = Expression::new("title = :t AND price > :p")
            .param(":t", "it's")
            .param(":p", 9.5);
        assert_eq!(expr.compile().unwrap(), r"title = 'it\'s' AND price > 9.500000");
    }

    #[test]
    fn test_longest_key_wins() {
        let expr = Expression::new(":id, :id_2")
            .param(":id", 1)
            .param(":id_2", 2);
        assert_eq!(expr.compile().unwrap(), "1, 2");
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let expr = Expression::new("{a} {b}")
            .param("{a}", "{b}")
            .param("{b}", "x");
        assert_eq!(expr.compile().unwrap(), "'{b}' 'x'");
    }

    #[test]
    fn test_unbound_placeholder_stays() {
        let expr = Expression::new(":bound :unbound").param(":bound", 1);
        assert_eq!(expr.compile().unwrap(), "1 :unbound");
    }

    #[test]
    fn test_parameters_merge_last_write_wins() {
        let expr = Expression::new(":a :b")
            .param(":a", 1)
            .parameters([(":a", 10), (":b", 20)])
            .bind(":b", 30);
        assert_eq!(expr.compile().unwrap(), "10 30");
        assert_eq!(expr.parameters.len(), 2);
    }

    #[test]
    fn test_multibyte_template() {
        let expr = Expression::new("ÿ :k ü").param(":k", "é");
        assert_eq!(expr.compile().unwrap(), "ÿ 'é' ü");
    }

    #[test]
    fn test_list_parameter() {
        let expr = Expression::new("IN(tags, :tags)").param(":tags", vec![1, 2]);
        assert_eq!(expr.compile().unwrap(), "IN(tags, (1, 2))");
        assert_eq!(expr.value(), "IN(tags, :tags)");
    }
}
