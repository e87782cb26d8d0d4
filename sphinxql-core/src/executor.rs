//! Statement execution boundary

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::Level;

use crate::{Error, QueryBuilder, QueryKind, Result, ToSql};

/// A result row keyed by column name
pub type Row = serde_json::Map<String, serde_json::Value>;

/// What the daemon answered
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// SELECT rows
    Rows(Vec<Row>),
    /// Document id of an INSERT / REPLACE
    InsertId(u64),
    /// Affected rows of UPDATE / DELETE and of raw statements without rows
    Affected(u64),
    /// One row sequence per statement of a multi-result response, in order
    ResultSets(Vec<Vec<Row>>),
}

impl QueryResult {
    /// The rows of a row-producing result; a multi-result response yields
    /// its first set
    pub fn into_rows(self) -> Result<Vec<Row>> {
        match self {
            QueryResult::Rows(rows) => Ok(rows),
            QueryResult::ResultSets(sets) => Ok(sets.into_iter().next().unwrap_or_default()),
            other => Err(Error::invalid_query(format!(
                "statement returned no rows: {other:?}"
            ))),
        }
    }

    pub fn into_result_sets(self) -> Result<Vec<Vec<Row>>> {
        match self {
            QueryResult::ResultSets(sets) => Ok(sets),
            QueryResult::Rows(rows) => Ok(vec![rows]),
            other => Err(Error::invalid_query(format!(
                "statement returned no result sets: {other:?}"
            ))),
        }
    }

    pub fn insert_id(&self) -> Option<u64> {
        match self {
            QueryResult::InsertId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn affected_rows(&self) -> Option<u64> {
        match self {
            QueryResult::Affected(count) => Some(*count),
            _ => None,
        }
    }
}

/// Something that sends compiled statements to a search daemon
///
/// The kind tells the executor which shape of [`QueryResult`] to build:
/// `Select` gives `Rows`, `Insert`/`Replace` give `InsertId`,
/// `Update`/`Delete` give `Affected`, `MultiSelect` gives `ResultSets`
/// and `Raw` gives `Rows` when the statement produced any, else `Affected`.
pub trait Executor: Send + Sync {
    fn execute(
        &self,
        kind: QueryKind,
        sql: &str,
    ) -> impl Future<Output = Result<QueryResult>> + Send;
}

/// Extension trait for query builders to add execution methods
pub trait ExecutableQuery {
    /// Compile and run the statement
    fn execute<E>(&self, executor: &E) -> impl Future<Output = Result<QueryResult>> + Send
    where
        E: Executor;

    /// Run the statement and deserialize every row
    fn fetch_all<T, E>(&self, executor: &E) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send,
        E: Executor;

    /// Run the statement and deserialize the first row, if any
    fn fetch_optional<T, E>(&self, executor: &E) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send,
        E: Executor;

    /// Run a faceted SELECT and return the main rows followed by one
    /// sequence per facet
    fn fetch_sets<E>(&self, executor: &E) -> impl Future<Output = Result<Vec<Vec<Row>>>> + Send
    where
        E: Executor;
}

impl ExecutableQuery for QueryBuilder {
    async fn execute<E>(&self, executor: &E) -> Result<QueryResult>
    where
        E: Executor,
    {
        let sql = self.to_sql()?;
        let kind = self.kind().ok_or(Error::UnsupportedKind)?;
        executor.execute(kind, &sql).await
    }

    async fn fetch_all<T, E>(&self, executor: &E) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
        E: Executor,
    {
        let rows = self.execute(executor).await?.into_rows()?;
        rows.into_iter().map(from_row).collect()
    }

    async fn fetch_optional<T, E>(&self, executor: &E) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
        E: Executor,
    {
        let rows = self.execute(executor).await?.into_rows()?;
        rows.into_iter().next().map(from_row).transpose()
    }

    async fn fetch_sets<E>(&self, executor: &E) -> Result<Vec<Vec<Row>>>
    where
        E: Executor,
    {
        if self.kind() != Some(QueryKind::MultiSelect) {
            return Err(Error::invalid_query(
                "result sets are only returned for queries with FACET clauses",
            ));
        }
        self.execute(executor).await?.into_result_sets()
    }
}

/// Deserialize a row into any serde type
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(row))?)
}

/// An executor wrapper that emits one `tracing` event per statement
///
/// Successful statements are logged at the configured level under the
/// `sphinxql.sql` target; failures are always logged at WARN.
#[derive(Debug, Clone)]
pub struct TracingExecutor<E> {
    inner: E,
    level: Level,
    max_sql_length: Option<usize>,
}

impl<E> TracingExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length (in chars) to display
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) => match sql.char_indices().nth(max) {
                Some((end, _)) => format!("{}...", &sql[..end]),
                None => sql.to_string(),
            },
            None => sql.to_string(),
        }
    }
}

impl<E: Executor> Executor for TracingExecutor<E> {
    async fn execute(&self, kind: QueryKind, sql: &str) -> Result<QueryResult> {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN => tracing::warn!($($field)*),
                    Level::INFO => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let started = tokio::time::Instant::now();
        let result = self.inner.execute(kind, sql).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let shown = self.truncate_sql(sql);

        match &result {
            Ok(_) => emit_at_level!(
                self.level,
                target: "sphinxql.sql",
                kind = ?kind,
                sql = %shown,
                elapsed_ms,
                "statement executed"
            ),
            Err(err) => tracing::warn!(
                target: "sphinxql.sql",
                kind = ?kind,
                sql = %shown,
                elapsed_ms,
                error = %err,
                "statement failed"
            ),
        }

        result
    }
}

/// MySQL-protocol connection pool for Sphinx / Manticore
#[cfg(feature = "mysql")]
pub mod mysql {
    use super::*;
    use crate::config::SphinxConfig;
    use futures::TryStreamExt;
    use sqlx::mysql::{
        MySqlConnectOptions, MySqlDatabaseError, MySqlPool, MySqlPoolOptions, MySqlRow,
    };
    use sqlx::{Column as _, Either, Row as _, ValueRef as _};

    /// Connection pool speaking the MySQL wire protocol to `searchd`
    #[derive(Clone, Debug)]
    pub struct SphinxPool {
        inner: MySqlPool,
    }

    impl SphinxPool {
        /// Create a pool that connects on first use
        pub fn connect_lazy(config: &SphinxConfig) -> Self {
            let options = MySqlConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .statement_cache_capacity(0)
                .pipes_as_concat(false);
            let pool = MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout())
                .connect_lazy_with(options);
            tracing::debug!(
                target: "sphinxql",
                host = %config.host,
                port = config.port,
                "configured SphinxQL pool"
            );
            Self { inner: pool }
        }

        /// Create from an existing MySqlPool
        pub fn from_pool(pool: MySqlPool) -> Self {
            Self { inner: pool }
        }

        pub fn inner(&self) -> &MySqlPool {
            &self.inner
        }

        pub async fn close(&self) {
            self.inner.close().await;
        }
    }

    impl Executor for SphinxPool {
        async fn execute(&self, kind: QueryKind, sql: &str) -> Result<QueryResult> {
            match kind {
                QueryKind::Select => {
                    let rows = sqlx::Executor::fetch_all(&self.inner, sql)
                        .await
                        .map_err(|err| map_error(err, sql))?;
                    Ok(QueryResult::Rows(rows.iter().map(row_to_json).collect()))
                }
                QueryKind::Insert | QueryKind::Replace => {
                    let done = sqlx::Executor::execute(&self.inner, sql)
                        .await
                        .map_err(|err| map_error(err, sql))?;
                    Ok(QueryResult::InsertId(done.last_insert_id()))
                }
                QueryKind::Update | QueryKind::Delete => {
                    let done = sqlx::Executor::execute(&self.inner, sql)
                        .await
                        .map_err(|err| map_error(err, sql))?;
                    Ok(QueryResult::Affected(done.rows_affected()))
                }
                QueryKind::MultiSelect => {
                    let (sets, _) = self.fetch_sets(sql).await?;
                    Ok(QueryResult::ResultSets(sets))
                }
                QueryKind::Raw => {
                    let (sets, affected) = self.fetch_sets(sql).await?;
                    let rows: Vec<Row> = sets.into_iter().flatten().collect();
                    if rows.is_empty() {
                        Ok(QueryResult::Affected(affected))
                    } else {
                        Ok(QueryResult::Rows(rows))
                    }
                }
            }
        }
    }

    impl SphinxPool {
        // Each statement result in the response closes one row sequence
        async fn fetch_sets(&self, sql: &str) -> Result<(Vec<Vec<Row>>, u64)> {
            let mut stream = sqlx::Executor::fetch_many(&self.inner, sql);
            let mut sets = Vec::new();
            let mut current = Vec::new();
            let mut affected = 0;

            while let Some(step) = stream.try_next().await.map_err(|err| map_error(err, sql))? {
                match step {
                    Either::Left(done) => {
                        affected += done.rows_affected();
                        sets.push(std::mem::take(&mut current));
                    }
                    Either::Right(row) => current.push(row_to_json(&row)),
                }
            }
            if !current.is_empty() {
                sets.push(current);
            }

            tracing::debug!(target: "sphinxql", result_sets = sets.len(), "multi-result response");
            Ok((sets, affected))
        }
    }

    fn map_error(err: sqlx::Error, sql: &str) -> Error {
        match &err {
            sqlx::Error::Database(db) => {
                let code = db
                    .try_downcast_ref::<MySqlDatabaseError>()
                    .map(|e| u32::from(e.number()))
                    .unwrap_or(0);
                Error::query_failed(format!("{} [ {} ]", db.message(), sql), code)
            }
            _ => Error::Database(err),
        }
    }

    /// Materialize a row into a JSON map
    fn row_to_json(row: &MySqlRow) -> Row {
        let mut map = Row::new();
        for (index, column) in row.columns().iter().enumerate() {
            map.insert(column.name().to_string(), decode_column(row, index));
        }
        map
    }

    // searchd reports most attributes as text or integers; try the
    // narrowest decoding first
    fn decode_column(row: &MySqlRow, index: usize) -> serde_json::Value {
        use serde_json::Value as Json;

        match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => return Json::Null,
            Err(_) => return Json::Null,
            Ok(_) => {}
        }
        if let Ok(v) = row.try_get::<i64, _>(index) {
            return Json::from(v);
        }
        if let Ok(v) = row.try_get::<u64, _>(index) {
            return Json::from(v);
        }
        if let Ok(v) = row.try_get::<f32, _>(index) {
            return serde_json::Number::from_f64(f64::from(v)).map_or(Json::Null, Json::Number);
        }
        if let Ok(v) = row.try_get::<f64, _>(index) {
            return serde_json::Number::from_f64(v).map_or(Json::Null, Json::Number);
        }
        if let Ok(v) = row.try_get::<String, _>(index) {
            return Json::String(v);
        }
        if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
            return Json::String(String::from_utf8_lossy(&v).into_owned());
        }
        Json::Null
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{op, Expression};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Product {
        id: i64,
        title: String,
    }

    // Mock executor recording every statement it receives
    #[derive(Default)]
    struct MockExecutor {
        statements: Mutex<Vec<(QueryKind, String)>>,
        fail: bool,
    }

    impl MockExecutor {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn statements(&self) -> Vec<(QueryKind, String)> {
            self.statements.lock().unwrap().clone()
        }
    }

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    impl Executor for MockExecutor {
        async fn execute(&self, kind: QueryKind, sql: &str) -> Result<QueryResult> {
            self.statements.lock().unwrap().push((kind, sql.to_string()));
            if self.fail {
                return Err(Error::query_failed("unknown local index 'nope'", 1064));
            }
            Ok(match kind {
                QueryKind::Select => QueryResult::Rows(vec![
                    row(json!({"id": 1, "title": "first"})),
                    row(json!({"id": 2, "title": "second"})),
                ]),
                QueryKind::MultiSelect => QueryResult::ResultSets(vec![
                    vec![row(json!({"id": 1, "title": "first"}))],
                    vec![row(json!({"brand_id": 7, "count(*)": 3}))],
                    vec![row(json!({"price": 10, "count(*)": 1}))],
                ]),
                QueryKind::Insert | QueryKind::Replace => QueryResult::InsertId(42),
                QueryKind::Update | QueryKind::Delete | QueryKind::Raw => QueryResult::Affected(3),
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_all_deserializes_rows() {
        let exec = MockExecutor::default();
        let products: Vec<Product> = QueryBuilder::new()
            .select(["id", "title"])
            .from("products")
            .fetch_all(&exec)
            .await
            .unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0], Product { id: 1, title: "first".to_string() });
        assert_eq!(
            exec.statements(),
            vec![(QueryKind::Select, "SELECT `id`, `title` FROM `products`".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_optional() {
        let exec = MockExecutor::default();
        let product: Option<Product> = QueryBuilder::new()
            .select("*")
            .from("products")
            .where_(("id", 1))
            .fetch_optional(&exec)
            .await
            .unwrap();
        assert_eq!(product.map(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn test_modification_results() {
        let exec = MockExecutor::default();

        let inserted = QueryBuilder::new()
            .insert("rt", [("id", 42)])
            .execute(&exec)
            .await
            .unwrap();
        assert_eq!(inserted.insert_id(), Some(42));

        let updated = QueryBuilder::new()
            .update("rt")
            .set([("gid", 1)])
            .where_(("id", op::IN, vec![1, 2, 3]))
            .execute(&exec)
            .await
            .unwrap();
        assert_eq!(updated.affected_rows(), Some(3));
        assert_eq!(exec.statements()[1].0, QueryKind::Update);
    }

    #[tokio::test]
    async fn test_fetch_sets_returns_facets_in_order() {
        let exec = MockExecutor::default();
        let sets = QueryBuilder::new()
            .select("*")
            .from("products")
            .facet("brand_id")
            .facet("price")
            .fetch_sets(&exec)
            .await
            .unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[1][0]["brand_id"], json!(7));
        assert_eq!(sets[2][0]["price"], json!(10));
        assert_eq!(
            exec.statements()[0].1,
            "SELECT * FROM `products` FACET brand_id FACET price"
        );
    }

    #[tokio::test]
    async fn test_fetch_sets_requires_facets() {
        let exec = MockExecutor::default();
        let result = QueryBuilder::new().select("*").from("products").fetch_sets(&exec).await;
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
        assert!(exec.statements().is_empty());
    }

    #[tokio::test]
    async fn test_compile_errors_never_reach_executor() {
        let exec = MockExecutor::default();
        let result = QueryBuilder::new().where_(("id", 1)).execute(&exec).await;
        assert!(matches!(result, Err(Error::UnsupportedKind)));

        let result = QueryBuilder::new()
            .select("*")
            .from("rt")
            .where_open()
            .execute(&exec)
            .await;
        assert!(matches!(result, Err(Error::MalformedGroup { .. })));
        assert!(exec.statements().is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_carries_code() {
        let exec = MockExecutor::failing();
        let err = QueryBuilder::new()
            .select("*")
            .from("nope")
            .execute(&exec)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(1064));
    }

    #[tokio::test]
    async fn test_fetch_rows_from_modification_fails() {
        let exec = MockExecutor::default();
        let result: Result<Vec<Product>> =
            QueryBuilder::new().delete("rt").where_(("id", 1)).fetch_all(&exec).await;
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
    }

    #[tokio::test]
    async fn test_tracing_executor_passes_through() {
        let exec = TracingExecutor::new(MockExecutor::default()).max_sql_length(10);
        let result = QueryBuilder::raw(Expression::new("FLUSH RTINDEX rt"))
            .execute(&exec)
            .await
            .unwrap();
        assert_eq!(result, QueryResult::Affected(3));
        assert_eq!(exec.inner().statements()[0].1, "FLUSH RTINDEX rt");

        let failing = TracingExecutor::new(MockExecutor::failing()).level(Level::INFO);
        assert!(QueryBuilder::raw("SHOW STATUS").execute(&failing).await.is_err());
    }

    #[test]
    fn test_truncate_sql_respects_char_boundaries() {
        let exec = TracingExecutor::new(MockExecutor::default()).max_sql_length(3);
        assert_eq!(exec.truncate_sql("ééééé"), "ééé...");
        assert_eq!(exec.truncate_sql("abc"), "abc");
        assert_eq!(exec.no_truncate().truncate_sql("abcdef"), "abcdef");
    }

    #[test]
    fn test_result_conversions() {
        let rows = vec![row(json!({"id": 1}))];
        assert_eq!(QueryResult::Rows(rows.clone()).into_result_sets().unwrap(), vec![rows.clone()]);
        assert_eq!(
            QueryResult::ResultSets(vec![rows.clone(), vec![]]).into_rows().unwrap(),
            rows
        );
        assert!(QueryResult::InsertId(1).into_rows().is_err());
        assert_eq!(QueryResult::InsertId(9).affected_rows(), None);
    }

    #[test]
    fn test_from_row() {
        let product: Product = from_row(row(json!({"id": 5, "title": "x"}))).unwrap();
        assert_eq!(product.id, 5);
    }
}
