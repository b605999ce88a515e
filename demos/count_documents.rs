//! Count all documents, then only those created on one day.

mod common;

use common::{DemoResult, section};
use serde_json::json;
use sift::prelude::*;

const INDEX: &str = "my_index";

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Count Documents Example").await?;

    section("Prepare");
    let definition = IndexDefinition::new(INDEX).mapping(
        Mapping::new()
            .field("title", FieldMapping::text())
            .field("text", FieldMapping::text())
            .field("created_on", FieldMapping::date().format("yyyy-MM-dd")),
    );
    client.create_index(&definition, ExistingIndex::Recreate).await?;

    for (n, day) in [(1, "2024-09-22"), (2, "2024-09-23"), (3, "2024-09-24")] {
        let document = json!({
            "title": format!("Sample Title {}", n),
            "text": format!("This is sample document number {}.", n),
            "created_on": day
        });
        client.index_document(INDEX, &document, None).await?;
    }
    // counts only see refreshed documents
    client.refresh_index(INDEX).await?;

    section("Count");
    let total = client.count_documents(INDEX, None).await?;
    println!("Documents in {}: {}", INDEX, total);

    let filter = Query::term("created_on", "2024-09-24");
    let on_day = client.count_documents(INDEX, Some(&filter)).await?;
    println!("Documents created on 2024-09-24: {}", on_day);

    Ok(())
}
