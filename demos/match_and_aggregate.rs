//! Integer mapping, get/exists by id, a match query and a sum aggregation.

mod common;

use common::{DemoResult, section, show};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sift::prelude::*;

const INDEX: &str = "test-index";

#[derive(Debug, Serialize, Deserialize)]
struct Item {
    id: u32,
    name: String,
    price: i64,
}

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Match and Aggregate Example").await?;

    section("Create index");
    let definition = IndexDefinition::new(INDEX)
        .mapping(Mapping::new().field("price", FieldMapping::integer()));
    let outcome = client.create_index(&definition, ExistingIndex::Skip).await?;
    println!("{:?}\n", outcome);

    section("Index document");
    let item = Item {
        id: 1,
        name: "Foo".to_string(),
        price: 10,
    };
    let written = client.index_document(INDEX, &item, Some("1")).await?;
    // make it visible to the searches below
    client.refresh_index(INDEX).await?;
    show("Indexed", &written)?;

    section("Get document");
    let fetched = client.get_document::<Item>(INDEX, "1").await?;
    match &fetched.source {
        Some(item) if fetched.found => println!("Found: {:?}\n", item),
        _ => println!("Document not found\n"),
    }

    section("Document exists");
    println!("exists: {}\n", client.document_exists(INDEX, "1").await?);

    section("Match query");
    let matched: SearchResponse<Value> = client
        .search(INDEX, &SearchRequest::with_query(Query::matches("name", "Foo")))
        .await?;
    println!("{} hit(s)", matched.total);
    for hit in &matched.hits {
        println!("ID: {}, Score: {:.4}", hit.id, hit.score.unwrap_or_default());
    }
    println!();

    section("Sum aggregation");
    let request = SearchRequest::new()
        .size(0)
        .aggregation("total_prices", Aggregation::sum("price"));
    let summed: SearchResponse<Value> = client.search(INDEX, &request).await?;
    match summed.aggregation("total_prices").and_then(|agg| agg.metric_value()) {
        Some(total) => println!("Total price: {}", total),
        None => println!("No prices to sum"),
    }

    Ok(())
}
