//! Create a document under a fixed id and find it again with a term query.

mod common;

use common::{DemoResult, section, show};
use serde_json::{Value, json};
use sift::prelude::*;

const INDEX: &str = "my_index";
const DOC_ID: &str = "my_doc_id";

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Term Search Example").await?;

    section("Create document");
    match client
        .create_document(INDEX, DOC_ID, &json!({ "name": "Foo", "language": "Go" }))
        .await
    {
        Ok(written) => show("Created", &written)?,
        // _create never overwrites; a second run lands here
        Err(err) if err.is_conflict() => println!("Document {} already exists\n", DOC_ID),
        Err(err) => return Err(err.into()),
    }
    client.refresh_index(INDEX).await?;

    section("Search all");
    let all: SearchResponse<Value> = client.search(INDEX, &SearchRequest::new()).await?;
    println!("{} document(s) in {}\n", all.total, INDEX);

    section("Document exists");
    if client.document_exists(INDEX, DOC_ID).await? {
        println!("Document {} exists\n", DOC_ID);
    } else {
        println!("Document {} not found\n", DOC_ID);
    }

    section("Term query");
    // `name` is analyzed text, so the exact term lives in the keyword sub-field
    let request = SearchRequest::with_query(Query::term("name.keyword", "Foo"));
    let found: SearchResponse<Value> = client.search(INDEX, &request).await?;
    if found.total == 0 {
        println!("No documents matched");
        return Ok(());
    }

    println!("{} document(s) matched", found.total);
    for hit in &found.hits {
        println!("ID: {}, Score: {:.4}", hit.id, hit.score.unwrap_or_default());
    }

    Ok(())
}
