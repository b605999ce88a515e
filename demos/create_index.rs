//! Index settings, reading a mapping back, and a typed book index.

mod common;

use common::{DemoResult, section, show};
use serde_json::json;
use sift::prelude::*;

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Create Index Example").await?;

    // ========== Shards, replicas and a dynamic field ==========

    section("Create test_1 with 3 shards and 2 replicas");
    let definition = IndexDefinition::new("test_1")
        .settings(IndexSettings::new().shards(3).replicas(2))
        .mapping(Mapping::new().field("price", FieldMapping::integer()));
    println!("{:?}\n", client.create_index(&definition, ExistingIndex::Recreate).await?);

    section("Index documents into test_1");
    let written = client
        .index_document(
            "test_1",
            &json!({ "name": "John Doe", "age": 30, "city": "New York", "price": "100" }),
            None,
        )
        .await?;
    println!("result: {:?}, id: {}, index: {}", written.result, written.id, written.index);

    for person in [
        json!({ "name": "John Doe", "age": 30, "city": "New York" }),
        json!({ "name": "Jane Doe", "age": 25, "city": "Los Angeles" }),
    ] {
        client.index_document("test_1", &person, None).await?;
    }
    println!("All documents indexed\n");

    // The service added mappings for the fields it saw for the first time
    section("Mapping of test_1");
    let mapping = client.get_mapping("test_1").await?;
    show("Mapping", &mapping.to_json())?;

    // ========== Book index with explicit field types ==========

    section("Create book_index");
    let books = IndexDefinition::new("book_index").mapping(
        Mapping::new()
            .field("book_reference", FieldMapping::keyword())
            .field("price", FieldMapping::float())
            .field("publish_date", FieldMapping::date())
            .field("is_available", FieldMapping::boolean()),
    );
    println!("{:?}\n", client.create_index(&books, ExistingIndex::Recreate).await?);

    section("Index books");
    let book = json!({
        "book_reference": "1234567890",
        "price": 100.0,
        "publish_date": "2023-01-01",
        "is_available": true
    });
    for _ in 0..2 {
        client.index_document("book_index", &book, None).await?;
    }
    println!("All books indexed");

    Ok(())
}
