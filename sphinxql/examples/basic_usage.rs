use sphinxql::{
    col, delete, expr, from, insert, op, raw, replace, update, Column, SortDirection, ToSql, Value,
};

fn main() -> sphinxql::Result<()> {
    println!("=== SphinxQL - Basic Usage Examples ===\n");

    // Full-text search with attribute filters
    let search = from("products")
        .select(vec![
            col("id"),
            col("title"),
            Column::from(expr("WEIGHT()")).alias("weight"),
        ])
        .match_(["title", "description"], "wireless keyboard")
        .where_(("price", op::BETWEEN, [20, 120]))
        .and_where(("in_stock", true))
        .order_by("weight", SortDirection::Desc)
        .limit(20)
        .offset(40)
        .option("ranker=bm25");

    println!("1. Search:");
    println!("   SQL: {}\n", search.to_sql()?);

    // User input never forms full-text operators
    let untrusted = from("products").match_text("C++ -\"quotes\" @title");
    println!("2. Escaped MATCH:");
    println!("   SQL: {}\n", untrusted.to_sql()?);

    // Bracketed condition groups
    let grouped = from("products")
        .where_(("category_id", 3))
        .and_where_open()
        .where_(("brand", "acme"))
        .or_where(("brand", "zenith"))
        .end(false)?
        .where_open()
        .end(true)?;
    println!("3. Condition groups:");
    println!("   SQL: {}\n", grouped.to_sql()?);

    // Grouping with HAVING
    let grouped_counts = from("products")
        .select(vec![
            col("brand_id"),
            Column::from(expr("COUNT(*)")).alias("cnt"),
        ])
        .group_by("brand_id")
        .having(("cnt", op::GT, 10))
        .order_by_desc("cnt");
    println!("4. GROUP BY / HAVING:");
    println!("   SQL: {}\n", grouped_counts.to_sql()?);

    // Writes to a real-time index
    let add = insert("rt_products")
        .columns(["id", "title", "price", "tags"])
        .values([
            Value::from(1001),
            Value::from("Mechanical keyboard"),
            Value::from(89.5),
            Value::from(vec![4, 8]),
        ])?
        .values([
            Value::from(1002),
            Value::from("It's a mouse"),
            Value::from(19.0),
            Value::from(vec![4]),
        ])?;
    println!("5. INSERT:");
    println!("   SQL: {}\n", add.to_sql()?);

    let upsert = replace("rt_products")
        .columns(["id", "title"])
        .values([Value::from(1001), Value::from("Keyboard v2")])?;
    println!("6. REPLACE:");
    println!("   SQL: {}\n", upsert.to_sql()?);

    let reprice = update("rt_products")
        .set([("price", 79.0)])
        .where_(("id", op::IN, vec![1001, 1002]));
    println!("7. UPDATE:");
    println!("   SQL: {}\n", reprice.to_sql()?);

    let cleanup = delete("rt_products").where_(("id", op::LT, 100));
    println!("8. DELETE:");
    println!("   SQL: {}\n", cleanup.to_sql()?);

    let status = raw("SHOW INDEX :index STATUS").raw_param(":index", "rt_products");
    println!("9. Raw statement:");
    println!("   SQL: {}", status.to_sql()?);

    Ok(())
}
