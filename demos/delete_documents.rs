//! Delete a document, then try a missing one and handle the not-found error.

mod common;

use common::{DemoResult, section};
use serde_json::json;
use sift::prelude::*;

const INDEX: &str = "my_index";

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Delete Documents Example").await?;

    section("Create index");
    client
        .create_index(&IndexDefinition::new(INDEX), ExistingIndex::Recreate)
        .await?;

    section("Add documents");
    let documents = [
        json!({
            "title": "Search Engine Basics",
            "content": "An open source search and analytics engine.",
            "tags": ["search", "engine", "nosql"]
        }),
        json!({
            "title": "The Rust Programming Language",
            "content": "Rust is a language empowering everyone to build reliable software.",
            "tags": ["rust", "programming", "systems"]
        }),
        json!({
            "title": "Data Structures",
            "content": "Data structures organize data for efficient access.",
            "tags": ["data structures", "algorithms", "programming"]
        }),
    ];

    let mut ids = Vec::with_capacity(documents.len());
    for (i, document) in documents.iter().enumerate() {
        let id = format!("doc{}", i + 1);
        client.index_document(INDEX, document, Some(&id)).await?;
        println!("Indexed document {}", id);
        ids.push(id);
    }
    println!();

    section("Delete existing document");
    let deleted = client.delete_document(INDEX, &ids[0]).await?;
    println!("Deleted {}: {:?}\n", deleted.id, deleted.result);

    section("Delete missing document");
    match client.delete_document(INDEX, "id").await {
        Ok(deleted) => println!("Unexpectedly deleted: {:?}", deleted),
        Err(err) if err.is_not_found() => println!("Expected error, document not found: {}", err),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
