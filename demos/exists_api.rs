//! Index and document existence checks.

mod common;

use common::{DemoResult, section};
use serde_json::Value;
use sift::prelude::*;
use std::path::Path;

const INDEX: &str = "my_index";

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Exists API Example").await?;

    client
        .create_index(&IndexDefinition::new(INDEX), ExistingIndex::Recreate)
        .await?;

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/fixtures/articles.json");
    let articles: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(path)?)?;

    let mut ids = Vec::with_capacity(articles.len());
    for article in &articles {
        ids.push(client.index_document(INDEX, article, None).await?.id);
    }
    println!("Document ids: {:?}\n", ids);

    section("Index exists");
    println!("{} exists: {}", INDEX, client.index_exists(INDEX).await?);
    println!("missing_index exists: {}\n", client.index_exists("missing_index").await?);

    section("Document exists");
    if let Some(first) = ids.first() {
        println!("{} exists: {}", first, client.document_exists(INDEX, first).await?);
    }
    println!("no-such-id exists: {}", client.document_exists(INDEX, "no-such-id").await?);

    Ok(())
}
