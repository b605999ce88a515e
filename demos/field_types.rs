//! Text, completion and spatial field types.

mod common;

use common::{DemoResult, section};
use serde_json::{Value, json};
use sift::prelude::*;

/// Recreate `index` with a single typed field and index each document into it.
async fn populate(
    client: &SearchClient,
    index: &str,
    field: &str,
    mapping: FieldMapping,
    documents: &[Value],
) -> sift::Result<()> {
    let definition = IndexDefinition::new(index).mapping(Mapping::new().field(field, mapping));
    client.create_index(&definition, ExistingIndex::Recreate).await?;

    for document in documents {
        let written = client.index_document(index, document, None).await?;
        println!("{} -> {} ({:?})", index, written.id, written.result);
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Field Types Example").await?;

    // Tokenized into words, each searchable on its own
    section("text");
    populate(
        &client,
        "text_index",
        "email_body",
        FieldMapping::text(),
        &[json!({ "email_body": "Hello, this is a test email." })],
    )
    .await?;

    // Prefix suggestions while typing
    section("completion");
    populate(
        &client,
        "text_completion_index",
        "suggest",
        FieldMapping::completion(),
        &[
            json!({ "suggest": { "input": ["Mars", "Planet"] } }),
            json!({ "suggest": { "input": ["Andromeda", "Galaxy"] } }),
        ],
    )
    .await?;

    section("geo_point");
    populate(
        &client,
        "geo_point_index",
        "location",
        FieldMapping::geo_point(),
        &[json!({
            "text": "Geopoint as an object using GeoJSON format",
            "location": { "type": "Point", "coordinates": [-71.34, 41.12] }
        })],
    )
    .await?;

    // Lines and polygons; the second polygon ring is a hole
    section("geo_shape");
    populate(
        &client,
        "geo_shape_index",
        "location",
        FieldMapping::geo_shape(),
        &[
            json!({ "location": {
                "type": "LineString",
                "coordinates": [[-77.03653, 38.897676], [-77.009051, 38.889939]]
            } }),
            json!({ "location": {
                "type": "Polygon",
                "coordinates": [
                    [[100.0, 0.0], [101.0, 0.0], [101.0, 1.0], [100.0, 1.0], [100.0, 0.0]],
                    [[100.2, 0.2], [100.8, 0.2], [100.8, 0.8], [100.2, 0.8], [100.2, 0.2]]
                ]
            } }),
        ],
    )
    .await?;

    // Cartesian x/y, not latitude and longitude
    section("point");
    populate(
        &client,
        "point_index",
        "location",
        FieldMapping::point(),
        &[json!({ "location": { "type": "Point", "coordinates": [-71.34, 41.12] } })],
    )
    .await?;

    Ok(())
}
