//! Create, read, search, update and delete in one pass.

mod common;

use common::{DemoResult, section, show};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sift::prelude::*;

const INDEX: &str = "my_index";

#[derive(Debug, Serialize, Deserialize)]
struct Library {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Basic CRUD Example").await?;

    section("Create index");
    let created = client
        .create_index(&IndexDefinition::new(INDEX), ExistingIndex::Recreate)
        .await?;
    println!("{:?}\n", created);

    section("Index document");
    let library = Library {
        name: "sift".to_string(),
        language: None,
    };
    let written = client.index_document(INDEX, &library, None).await?;
    show("Indexed", &written)?;
    let id = written.id;

    section("Get document");
    let fetched = client.get_document::<Library>(INDEX, &id).await?;
    show("Fetched", &fetched)?;

    section("Search everything");
    client.refresh_index(INDEX).await?;
    let all: SearchResponse<Library> = client.search(INDEX, &SearchRequest::new()).await?;
    println!("{} hit(s)", all.total);
    for hit in &all.hits {
        println!("  {} {:?} score={:?}", hit.id, hit.source, hit.score);
    }
    println!();

    section("Update document");
    let updated = client
        .update_document(INDEX, &id, &UpdateRequest::patch(json!({ "language": "Rust" })))
        .await?;
    show("Updated", &updated)?;

    section("Delete document");
    let deleted = client.delete_document(INDEX, &id).await?;
    show("Deleted", &deleted)?;

    section("Delete index");
    let ack = client.delete_index(INDEX, false).await?;
    show("Deleted index", &ack)?;

    Ok(())
}
