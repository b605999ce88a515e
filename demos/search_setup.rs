//! Idempotent setup: create the index only when missing, then index with refresh.

mod common;

use common::{DemoResult, show};
use serde::Serialize;
use sift::WriteResponse;
use sift::prelude::*;
use sift::sift_log::info;

const SEARCH_INDEX: &str = "test_index";

#[derive(Debug, Serialize)]
struct Document {
    title: String,
    content: String,
}

/// Everything the program needs, created once and passed to each step.
struct Search {
    client: SearchClient,
    index: &'static str,
}

impl Search {
    async fn create_index_if_not_exists(&self) -> sift::Result<()> {
        let outcome = self
            .client
            .create_index(&IndexDefinition::new(self.index), ExistingIndex::Skip)
            .await?;
        if outcome.created() {
            info!(index = self.index, "Created index");
        }
        Ok(())
    }

    async fn index_document(&self, id: &str, document: &Document) -> sift::Result<WriteResponse> {
        let written = self.client.index_document(self.index, document, Some(id)).await?;
        self.client.refresh_index(self.index).await?;
        Ok(written)
    }
}

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Search Setup Example").await?;
    let search = Search {
        client,
        index: SEARCH_INDEX,
    };

    search.create_index_if_not_exists().await?;

    let document = Document {
        title: "Test Title".to_string(),
        content: "Test Content".to_string(),
    };
    let written = search.index_document("1", &document).await?;
    show(&format!("Indexed document into {}", search.index), &written)?;

    Ok(())
}
