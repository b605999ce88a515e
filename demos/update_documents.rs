//! Script and partial-document updates, removing a field, upsert and count.

mod common;

use common::{DemoResult, section};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sift::prelude::*;

const INDEX: &str = "my_index";

#[derive(Debug, Serialize, Deserialize)]
struct Article {
    title: String,
    text: String,
    created_on: String,
}

async fn apply(client: &SearchClient, id: &str, request: UpdateRequest) -> DemoResult {
    let updated = client.update_document(INDEX, id, &request).await?;
    println!(
        "update -> id: {}, version: {}, result: {:?}",
        updated.id, updated.version, updated.result
    );

    // untyped, since updates add fields the struct does not know about
    let fetched = client.get_document::<Value>(INDEX, id).await?;
    println!("document: {}\n", serde_json::to_string(&fetched.source)?);
    Ok(())
}

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Update Documents Example").await?;

    let article = Article {
        title: "First Document".to_string(),
        text: "This is the first sample document.".to_string(),
        created_on: "2024-09-22".to_string(),
    };
    let id = client.index_document(INDEX, &article, None).await?.id;
    println!("Indexed document {}\n", id);

    section("Set an existing field with a script");
    let set_title = Script::new("ctx._source.title = params.title").param("title", "New Title");
    apply(&client, &id, UpdateRequest::script(set_title)).await?;

    section("Add a field with a script");
    let add_field = Script::new("ctx._source.new_field = 'dummy_value'");
    apply(&client, &id, UpdateRequest::script(add_field)).await?;

    section("Add a field with a partial document");
    apply(&client, &id, UpdateRequest::patch(json!({ "new_value_2": "dummy_value_2" }))).await?;

    section("Remove a field");
    let remove_field = Script::new("ctx._source.remove('new_field')");
    apply(&client, &id, UpdateRequest::script(remove_field)).await?;

    // "1" is not an id the service generates, so the first run creates it
    section("Upsert a missing document");
    let upsert = UpdateRequest::patch(json!({ "book_id": 1234, "book_name": "A Book" })).upsert();
    apply(&client, "1", upsert).await?;

    section("Count");
    client.refresh_index(INDEX).await?;
    println!("Documents in {}: {}", INDEX, client.count_documents(INDEX, None).await?);

    Ok(())
}
