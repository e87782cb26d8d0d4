//! Daemon maintenance and introspection statements

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::executor::{ExecutableQuery, Executor, Row};
use crate::quote::{escape_string, quote_index};
use crate::{Column, Error, QueryBuilder, Result};

/// CALL KEYWORDS options used when none are given
pub const DEFAULT_KEYWORD_OPTIONS: [&str; 5] = [
    "fold_wildcards",
    "fold_lemmas",
    "fold_blended",
    "expansion_limit",
    "stats",
];

/// `SHOW META`, optionally filtered by a LIKE pattern
///
/// ```
/// use sphinxql_core::{command, ToSql};
///
/// assert_eq!(command::show_meta(Some("total%")).to_sql().unwrap(), "SHOW META LIKE 'total%'");
/// ```
pub fn show_meta(like: Option<&str>) -> QueryBuilder {
    match like {
        Some(pattern) => QueryBuilder::raw("SHOW META LIKE :like").raw_param(":like", pattern),
        None => QueryBuilder::raw("SHOW META"),
    }
}

/// `CALL KEYWORDS` for tokenizing `text` with the settings of `index`
///
/// Each option is enabled as `1 AS name`; an empty slice enables
/// [`DEFAULT_KEYWORD_OPTIONS`]. Option names must be plain identifiers.
pub fn call_keywords(text: &str, index: &str, options: &[&str]) -> Result<QueryBuilder> {
    let options = if options.is_empty() {
        &DEFAULT_KEYWORD_OPTIONS[..]
    } else {
        options
    };

    let mut enabled = Vec::with_capacity(options.len());
    for option in options {
        if option.is_empty() || !option.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::invalid_query(format!(
                "invalid CALL KEYWORDS option {option:?}"
            )));
        }
        enabled.push(format!("1 AS {option}"));
    }

    let sql = format!(
        "CALL KEYWORDS({}, {}, {})",
        escape_string(text),
        escape_string(index),
        enabled.join(", ")
    );
    Ok(QueryBuilder::raw(sql))
}

/// `OPTIMIZE INDEX <name>`
pub fn optimize_index(index: &str) -> Result<QueryBuilder> {
    maintenance("OPTIMIZE INDEX", index)
}

/// `FLUSH RTINDEX <name>`
pub fn flush_rtindex(index: &str) -> Result<QueryBuilder> {
    maintenance("FLUSH RTINDEX", index)
}

/// `TRUNCATE RTINDEX <name>`
pub fn truncate_rtindex(index: &str) -> Result<QueryBuilder> {
    maintenance("TRUNCATE RTINDEX", index)
}

fn maintenance(statement: &str, index: &str) -> Result<QueryBuilder> {
    let index = quote_index(&Column::from(index))?;
    Ok(QueryBuilder::raw(format!("{statement} {index}")))
}

/// Fold `SHOW META` rows into `Variable_name => Value`
pub fn parse_meta(rows: &[Row]) -> BTreeMap<String, String> {
    rows.iter()
        .filter_map(|row| {
            let name = row.get("Variable_name")?.as_str()?.to_string();
            let value = match row.get("Value")? {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((name, value))
        })
        .collect()
}

/// Run `SHOW META` and fold the result
pub async fn fetch_meta<E>(executor: &E, like: Option<&str>) -> Result<BTreeMap<String, String>>
where
    E: Executor,
{
    let rows = show_meta(like).execute(executor).await?.into_rows()?;
    Ok(parse_meta(&rows))
}

/// A user search string normalized for MATCH, with helpers for reading
/// keyword statistics back from `SHOW META`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    query: String,
    words: Vec<String>,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        let query = clean_query(raw);
        let words = query.split(' ').filter(|w| !w.is_empty()).map(String::from).collect();
        Self { query, words }
    }

    /// The cleaned query text
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Keywords of this query that matched no documents
    ///
    /// Reads the `keyword[i]` / `docs[i]` pairs of a [`parse_meta`] map for
    /// each word position. With `expanded`, entries the daemon generated
    /// itself (prefixed with `=` or `*`) are skipped.
    pub fn missing_keywords(
        &self,
        meta: &BTreeMap<String, String>,
        expanded: bool,
    ) -> Vec<String> {
        (0..self.word_count())
            .filter_map(|i| {
                let keyword = meta.get(&format!("keyword[{i}]"))?;
                let docs = meta.get(&format!("docs[{i}]"))?;
                if docs.trim().parse::<u64>().ok()? != 0 {
                    return None;
                }
                if expanded && keyword.starts_with(['=', '*']) {
                    return None;
                }
                Some(keyword.clone())
            })
            .collect()
    }

    /// Run `SHOW META` and return [`missing_keywords`](Self::missing_keywords)
    ///
    /// `SHOW META` describes the previous statement of the same connection,
    /// so `executor` must not hand the call to another session.
    pub async fn fetch_missing_keywords<E>(
        &self,
        executor: &E,
        expanded: bool,
    ) -> Result<Vec<String>>
    where
        E: Executor,
    {
        let meta = fetch_meta(executor, None).await?;
        Ok(self.missing_keywords(&meta, expanded))
    }
}

/// Lower-case `raw`, drop everything but word characters and whitespace,
/// and collapse whitespace runs into single spaces
pub fn clean_query(raw: &str) -> String {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();

    let punctuation = PUNCTUATION
        .get_or_init(|| Regex::new(r"[^\w\s]+").expect("invalid built-in punctuation regex"));
    let whitespace =
        WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("invalid built-in whitespace regex"));

    let lowered = raw.to_lowercase();
    let stripped = punctuation.replace_all(&lowered, "");
    whitespace.replace_all(&stripped, " ").trim().to_string()
}
