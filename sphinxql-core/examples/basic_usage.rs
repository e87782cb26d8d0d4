use sphinxql_core::{command, op, Column, Expression, QueryBuilder, ToSql, Value};

fn main() -> sphinxql_core::Result<()> {
    println!("=== SphinxQL Core - Basic Usage Examples ===\n");

    // Expressions keep their own placeholders
    let freshness = Expression::new("IF(published > :since, 1, 0)").param(":since", 1_700_000_000);
    let query = QueryBuilder::new()
        .select(vec![Column::from("id"), Column::from(freshness).alias("fresh")])
        .from("articles")
        .match_text("rust async")
        .where_(("author_id", op::IN, vec![3, 5, 8]))
        .and_where(("deleted_at", Value::Null))
        .order_by_desc("fresh")
        .limit(5);

    println!("1. Expression column:");
    println!("   SQL: {}\n", query.to_sql()?);

    // INSERT ... SELECT between indexes
    let copy = QueryBuilder::new()
        .insert_into("rt_articles")
        .columns(["id", "title"])
        .subselect(QueryBuilder::new().select(["id", "title"]).from("articles").limit(1000))?;
    println!("2. INSERT ... SELECT:");
    println!("   SQL: {}\n", copy.to_sql()?);

    // Daemon commands
    println!("3. Commands:");
    println!("   {}", command::show_meta(Some("total%")).to_sql()?);
    println!("   {}", command::call_keywords("running shoes", "products", &[])?.to_sql()?);
    println!("   {}", command::optimize_index("rt_articles")?.to_sql()?);
    println!("   {}", command::truncate_rtindex("rt_articles")?.to_sql()?);

    // Compile errors are reported, never silently fixed
    let broken = QueryBuilder::new().select("*").from("articles").where_open().where_(("id", 1));
    println!("\n4. Unbalanced group:");
    println!("   {}", broken.to_sql().unwrap_err());

    Ok(())
}
