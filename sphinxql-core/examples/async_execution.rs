use serde::Deserialize;
use serde_json::json;
use sphinxql_core::{
    op, ExecutableQuery, Executor, QueryBuilder, QueryKind, QueryResult, Result, Row,
    TracingExecutor, Value,
};

#[derive(Debug, Deserialize)]
struct Article {
    id: u64,
    title: String,
}

// Mock executor for demonstration
struct MockExecutor;

impl Executor for MockExecutor {
    async fn execute(&self, kind: QueryKind, _sql: &str) -> Result<QueryResult> {
        let article = |id: u64, title: &str| -> Row {
            match json!({"id": id, "title": title}) {
                serde_json::Value::Object(map) => map,
                _ => Row::new(),
            }
        };

        Ok(match kind {
            QueryKind::Select => QueryResult::Rows(vec![
                article(1, "Async Rust in practice"),
                article(2, "Tokio internals"),
            ]),
            QueryKind::Insert | QueryKind::Replace => QueryResult::InsertId(3),
            _ => QueryResult::Affected(1),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== SphinxQL Core - Async Execution Examples ===\n");

    // Every statement is logged under the `sphinxql.sql` target
    let exec = TracingExecutor::new(MockExecutor).max_sql_length(120);

    let articles: Vec<Article> = QueryBuilder::new()
        .select(["id", "title"])
        .from("articles")
        .match_text("rust")
        .fetch_all(&exec)
        .await?;
    println!("1. fetch_all:");
    for article in &articles {
        println!("   #{} {}", article.id, article.title);
    }

    let first: Option<Article> = QueryBuilder::new()
        .select(["id", "title"])
        .from("articles")
        .where_(("id", 2))
        .fetch_optional(&exec)
        .await?;
    println!("\n2. fetch_optional: {first:?}");

    let inserted = QueryBuilder::new()
        .insert("articles", [("id", Value::from(3)), ("title", Value::from("New post"))])
        .execute(&exec)
        .await?;
    println!("\n3. INSERT id: {:?}", inserted.insert_id());

    let affected = QueryBuilder::new()
        .delete("articles")
        .where_(("id", op::IN, vec![1, 2]))
        .execute(&exec)
        .await?;
    println!("\n4. DELETE affected: {:?}", affected.affected_rows());

    Ok(())
}
