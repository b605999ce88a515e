//! Object, flattened and nested fields side by side.
//!
//! - object: each sub-field gets its own mapping and is queried by path (`author.first_name`)
//! - flattened: the whole object is indexed as one field of keywords
//! - nested: each array element is indexed as a hidden document, so
//!   conditions on its fields stay paired

mod common;

use common::{DemoResult, section};
use serde_json::{Value, json};
use sift::WriteResponse;
use sift::prelude::*;

fn print_write(written: &WriteResponse) {
    println!("Index: {}", written.index);
    println!("ID: {}", written.id);
    println!("Version: {}", written.version);
    println!("Result: {:?}\n", written.result);
}

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Object Types Example").await?;

    let author = json!({
        "author": { "first_name": "Imad", "last_name": "Saddik" },
        "sell_count": 100
    });

    section("Object");
    let object_index = IndexDefinition::new("object_index").mapping(
        Mapping::new()
            .field(
                "author",
                FieldMapping::object()
                    .property("first_name", FieldMapping::text())
                    .property("last_name", FieldMapping::text()),
            )
            .field("sell_count", FieldMapping::integer()),
    );
    client.create_index(&object_index, ExistingIndex::Recreate).await?;
    print_write(&client.index_document("object_index", &author, None).await?);

    section("Flattened");
    let flattened_index = IndexDefinition::new("flattened_object_index")
        .mapping(Mapping::new().field("author", FieldMapping::flattened()));
    client.create_index(&flattened_index, ExistingIndex::Recreate).await?;
    print_write(
        &client
            .index_document("flattened_object_index", &json!({ "author": author["author"] }), None)
            .await?,
    );

    section("Nested");
    let nested_index = IndexDefinition::new("nested_user_index").mapping(
        Mapping::new().field(
            "user",
            FieldMapping::nested()
                .property("first", FieldMapping::keyword())
                .property("last", FieldMapping::keyword()),
        ),
    );
    client.create_index(&nested_index, ExistingIndex::Recreate).await?;
    let users = json!({
        "user": [
            { "first": "John", "last": "Smith" },
            { "first": "Imad", "last": "Saddik" }
        ]
    });
    print_write(&client.index_document("nested_user_index", &users, Some("1")).await?);
    client.refresh_index("nested_user_index").await?;

    // John Saddik is not a person in the array, so a nested query finds nothing
    section("Nested query");
    for (first, last) in [("John", "Smith"), ("John", "Saddik")] {
        let query = Query::nested(
            "user",
            BoolQuery::new()
                .must(Query::term("user.first", first))
                .must(Query::term("user.last", last))
                .into(),
        );
        let found: SearchResponse<Value> = client
            .search("nested_user_index", &SearchRequest::with_query(query))
            .await?;
        println!("{} {}: {} hit(s)", first, last, found.total);
    }

    Ok(())
}
