//! Load documents from a JSON fixture, index them and fetch the first back.

mod common;

use common::{DemoResult, section, show};
use serde_json::{Map, Value};
use sift::prelude::*;
use sift::sift_log::warn;
use std::path::Path;

const INDEX: &str = "my_index";

/// Read the article fixture shipped with the demos.
fn load_articles() -> DemoResult<Vec<Map<String, Value>>> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/fixtures/articles.json");
    let data = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&data)?)
}

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Get Documents Example").await?;

    client
        .create_index(&IndexDefinition::new(INDEX), ExistingIndex::Recreate)
        .await?;

    section("Index fixture documents");
    let mut ids = Vec::new();
    for article in load_articles()? {
        // one bad document should not stop the rest
        match client.index_document(INDEX, &article, None).await {
            Ok(written) => ids.push(written.id),
            Err(err) => warn!(error = %err, "Skipping document"),
        }
    }
    println!("Indexed ids: {:?}\n", ids);

    section("Get first document");
    if let Some(first) = ids.first() {
        let fetched = client.get_document::<Value>(INDEX, first).await?;
        show("First document", &fetched)?;
    }

    Ok(())
}
