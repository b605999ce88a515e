//! Typed client for Elasticsearch/OpenSearch-compatible search services.
//!
//! Every operation is one HTTP round trip: arguments are validated locally,
//! sent, and the answer is decoded into a typed result or a [`SearchError`].
//! Nothing is cached, batched or retried.
//!
//! - Index lifecycle: create with settings and mappings, delete, exists, mapping, refresh
//! - Documents: index, create, get, exists, update (patch or script, with upsert), delete
//! - Search with the query DSL, sorting and aggregations; counting
//!
//! # Example
//!
//! ```rust,no_run
//! use sift_search::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Book {
//!     title: String,
//!     price: f64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SearchClient::connect(ConnectionConfig::new("http://localhost:9200")).await?;
//!
//!     let books = IndexDefinition::new("books")
//!         .mapping(Mapping::new().field("price", FieldMapping::float()));
//!     client.create_index(&books, ExistingIndex::Skip).await?;
//!
//!     let book = Book { title: "Dune".to_string(), price: 10.0 };
//!     client.index_document("books", &book, Some("1")).await?;
//!     client.refresh_index("books").await?;
//!
//!     let cheap: SearchResponse<Book> = client
//!         .search(
//!             "books",
//!             &SearchRequest::with_query(RangeQuery::new("price").lt(20))
//!                 .sort_by("price", SortOrder::Asc),
//!         )
//!         .await?;
//!
//!     for hit in &cheap.hits {
//!         println!("{} {:?}", hit.id, hit.source);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

mod client;
mod config;
mod document;
mod error;
mod index;
mod query;
mod response;
mod search;

pub use client::{SearchClient, ServiceInfo, ServiceVersion};
pub use config::ConnectionConfig;
pub use document::{GetResult, Script, UpdateAction, UpdateRequest, WriteResponse, WriteResult};
pub use error::{Result, SearchError};
pub use index::{
    Acknowledged, ExistingIndex, FieldKind, FieldMapping, IndexCreation, IndexDefinition,
    IndexSettings, Mapping, validate_index_name,
};
pub use query::{
    BoolQuery, ExistsQuery, MatchQuery, NestedQuery, Query, RangeQuery, TermQuery, TermsQuery,
};
pub use search::{
    Aggregation, AggregationResult, Bucket, Hit, SearchRequest, SearchResponse, SortOrder,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Aggregation, BoolQuery, ConnectionConfig, ExistingIndex, FieldMapping, IndexDefinition,
        IndexSettings, Mapping, MatchQuery, Query, RangeQuery, Script, SearchClient,
        SearchError, SearchRequest, SearchResponse, SortOrder, UpdateRequest,
    };
}
