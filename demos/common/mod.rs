//! Common utilities for the demo programs

#![allow(dead_code)]

use serde::Serialize;
use sift::{SearchClient, sift_log};

/// Boxed error every demo `main` returns.
pub type DemoResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Install logging and connect using `sift.toml`, `.env` and `SIFT_*` variables.
pub async fn connect(title: &str) -> DemoResult<SearchClient> {
    sift_log::init();

    println!("{}", title);
    println!("{}\n", "=".repeat(title.chars().count()));

    let client = sift::connect_from_env().await?;
    let service = client.service();
    println!(
        "Connected to {} ({} {}) at {}\n",
        service.cluster_name,
        service.version.distribution.as_deref().unwrap_or("elasticsearch"),
        service.version.number,
        client.endpoint()
    );

    Ok(client)
}

/// Print a labelled value as pretty JSON.
pub fn show<T: Serialize + ?Sized>(label: &str, value: &T) -> DemoResult {
    println!("{}:\n{}\n", label, serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn section(name: &str) {
    println!("--- {} ---", name);
}
