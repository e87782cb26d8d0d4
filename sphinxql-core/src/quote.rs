//! Quoting and escaping of values, identifiers and full-text terms
//!
//! Every fragment that reaches the statement text passes through one of
//! these functions. Values are escaped the way the MySQL wire protocol
//! expects; full-text terms are additionally escaped so that user input
//! cannot form MATCH operators.

use crate::builder::{Column, MatchToken};
use crate::{Result, ToSql, Value};

/// Characters that carry meaning in the full-text query language
const MATCH_SPECIAL: [char; 15] = [
    '\\', '(', ')', '|', '-', '!', '@', '~', '"', '&', '/', '^', '$', '=', '<',
];

/// Escape a string and wrap it in single quotes
///
/// Escapes `\`, `'`, `"`, NUL, LF, CR and Ctrl-Z.
///
/// ```
/// use sphinxql_core::quote::escape_string;
///
/// assert_eq!(escape_string("it's"), r"'it\'s'");
/// ```
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Render a value as a SphinxQL literal
pub fn quote_value(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(true) => Ok("'1'".to_string()),
        Value::Bool(false) => Ok("'0'".to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) => quote_float(*f),
        Value::String(s) => Ok(escape_string(s)),
        Value::List(items) => {
            let quoted = items.iter().map(quote_value).collect::<Result<Vec<_>>>()?;
            Ok(format!("({})", quoted.join(", ")))
        }
        Value::SubQuery(query) => Ok(format!("({})", query.to_sql()?)),
        Value::Expr(expr) => expr.to_sql(),
    }
}

// Fixed six-digit notation, never exponent form
fn quote_float(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(crate::Error::invalid_query(format!(
            "cannot render non-finite float {value}"
        )));
    }
    Ok(format!("{value:.6}"))
}

fn quote_name(name: &str) -> String {
    if name == "*" {
        return name.to_string();
    }
    name.split('.')
        .map(|part| {
            if part == "*" {
                part.to_string()
            } else {
                format!("`{}`", part.replace('`', "``"))
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_alias(alias: &str) -> String {
    format!(" AS `{}`", alias.replace('`', "``"))
}

/// Quote a possibly dotted identifier with an optional alias
///
/// ```
/// use sphinxql_core::quote::quote_identifier;
///
/// assert_eq!(quote_identifier("t.*", None), "`t`.*");
/// assert_eq!(quote_identifier("price", Some("p")), "`price` AS `p`");
/// ```
pub fn quote_identifier(name: &str, alias: Option<&str>) -> String {
    let mut out = quote_name(name);
    if let Some(alias) = alias {
        out.push_str(&quote_alias(alias));
    }
    out
}

/// Render a column reference
pub fn quote_column(column: &Column) -> Result<String> {
    match column {
        Column::Name(name) => Ok(quote_name(name)),
        Column::Expr(expr) => expr.to_sql(),
        Column::SubQuery(query) => Ok(format!("({})", query.to_sql()?)),
        Column::Aliased(inner, alias) => {
            Ok(format!("{}{}", quote_column(inner)?, quote_alias(alias)))
        }
    }
}

/// Render an index reference; index names are never split on dots
pub fn quote_index(index: &Column) -> Result<String> {
    match index {
        Column::Name(name) => Ok(format!("`{}`", name.replace('`', "``"))),
        Column::Aliased(inner, alias) => {
            Ok(format!("{}{}", quote_index(inner)?, quote_alias(alias)))
        }
        other => quote_column(other),
    }
}

/// Escape a full-text term so it matches literally
///
/// Expression tokens are trusted query syntax and returned verbatim.
///
/// ```
/// use sphinxql_core::quote::escape_match;
///
/// assert_eq!(escape_match(&"a-b".into()), r"a\-b");
/// ```
pub fn escape_match(token: &MatchToken) -> String {
    match token {
        MatchToken::Text(text) => {
            let mut out = String::with_capacity(text.len());
            for ch in text.chars() {
                if MATCH_SPECIAL.contains(&ch) {
                    out.push('\\');
                }
                out.push(ch);
            }
            out
        }
        MatchToken::Expr(expr) => expr.value().to_string(),
    }
}
