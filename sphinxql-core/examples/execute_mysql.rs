//! Runs against a live searchd; configure with SPHINX_HOST / SPHINX_PORT.
//!
//! cargo run -p sphinxql-core --example execute_mysql --features mysql

use sphinxql_core::{
    command, ExecutableQuery, QueryBuilder, Result, SphinxConfig, SphinxPool, TracingExecutor,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = SphinxConfig::from_env()?;
    println!("Connecting to {}", config.url());

    let pool = TracingExecutor::new(SphinxPool::connect_lazy(&config)).no_truncate();

    let status = QueryBuilder::raw("SHOW STATUS").execute(&pool).await?;
    println!("SHOW STATUS -> {status:?}");

    let hits = QueryBuilder::new()
        .select("*")
        .from("test_index")
        .match_text("test")
        .limit(5)
        .facet("gid")
        .fetch_sets(&pool)
        .await?;
    println!("{} result sets", hits.len());

    let meta = command::fetch_meta(&pool, None).await?;
    for (name, value) in &meta {
        println!("{name} = {value}");
    }

    pool.into_inner().close().await;
    Ok(())
}
