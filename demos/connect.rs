//! Connect to the search service and print what it reports about itself.
//!
//! The endpoint list, credentials and timeouts come from `sift.toml`, `.env`
//! or `SIFT_*` variables, e.g. `SIFT_URLS=http://localhost:9200`.

mod common;

use common::{DemoResult, show};

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Connect Example").await?;

    // A fresh round trip, as opposed to the answer cached at connect time
    let info = client.info().await?;
    show("Service info", &info)?;

    println!("Connection settings: {:?}", client.config());
    Ok(())
}
