use serde_json::json;
use sphinxql::{expr, from, op, ExecutableQuery, Executor, QueryKind, QueryResult, Row, ToSql};

// Stands in for a searchd connection
struct CannedExecutor;

fn row(value: serde_json::Value) -> Row {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Row::new(),
    }
}

impl Executor for CannedExecutor {
    async fn execute(&self, kind: QueryKind, sql: &str) -> sphinxql::Result<QueryResult> {
        println!("-> [{kind:?}] {sql}");
        Ok(QueryResult::ResultSets(vec![
            vec![
                row(json!({"id": 1, "title": "Trail runner"})),
                row(json!({"id": 2, "title": "Road runner"})),
            ],
            vec![
                row(json!({"brand_id": 4, "count(*)": 12})),
                row(json!({"brand_id": 9, "count(*)": 3})),
            ],
            vec![row(json!({"size": 42, "count(*)": 7}))],
        ]))
    }
}

#[tokio::main]
async fn main() -> sphinxql::Result<()> {
    println!("=== SphinxQL - Faceted Search ===\n");

    let query = from("shoes")
        .select(["id", "title"])
        .match_text("running")
        .where_(("price", op::LTE, 150))
        .limit(10)
        .facet("brand_id")
        .facet(expr("size ORDER BY COUNT(*) DESC LIMIT :n").bind(":n", 5));

    println!("SQL: {}\n", query.to_sql()?);

    let sets = query.fetch_sets(&CannedExecutor).await?;
    let names = ["hits", "brand_id", "size"];
    for (name, set) in names.iter().zip(&sets) {
        println!("{name}:");
        for row in set {
            println!("   {}", serde_json::Value::Object(row.clone()));
        }
    }

    Ok(())
}
