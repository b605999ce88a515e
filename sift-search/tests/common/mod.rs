#![allow(dead_code)]

use serde_json::{Value, json};
use sift_search::{ConnectionConfig, SearchClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn service_info() -> Value {
    json!({
        "name": "node-1",
        "cluster_name": "sift-test",
        "cluster_uuid": "c1u5t3r",
        "version": {
            "distribution": "opensearch",
            "number": "2.11.0",
            "lucene_version": "9.7.0"
        },
        "tagline": "The OpenSearch Project: https://opensearch.org/"
    })
}

/// Mock service that answers `GET /`.
pub async fn mock_service() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_info()))
        .mount(&server)
        .await;

    server
}

pub async fn connect(server: &MockServer) -> SearchClient {
    SearchClient::connect(ConnectionConfig::new(server.uri()))
        .await
        .unwrap()
}

pub fn error_body(status: u16, error_type: &str, reason: &str) -> Value {
    json!({
        "error": {
            "root_cause": [{ "type": error_type, "reason": reason }],
            "type": error_type,
            "reason": reason
        },
        "status": status
    })
}

pub fn write_body(index: &str, id: &str, version: u64, result: &str) -> Value {
    json!({
        "_index": index,
        "_id": id,
        "_version": version,
        "result": result,
        "_shards": { "total": 2, "successful": 1, "failed": 0 },
        "_seq_no": version - 1,
        "_primary_term": 1
    })
}
