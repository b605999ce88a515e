mod common;

use common::{mock_service, service_info};
use sift_search::{ConnectionConfig, SearchClient, SearchError};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_connect_returns_service_info() {
    let server = mock_service().await;

    let client = SearchClient::connect(ConnectionConfig::new(server.uri()))
        .await
        .unwrap();

    assert_eq!(client.service().cluster_name, "sift-test");
    assert_eq!(client.service().version.number, "2.11.0");
    assert_eq!(client.endpoint().port(), Some(server.address().port()));

    let info = client.info().await.unwrap();
    assert_eq!(info.name, "node-1");
}

#[tokio::test]
async fn test_connect_skips_unreachable_endpoint() {
    let server = mock_service().await;

    let config = ConnectionConfig::cluster(vec!["http://127.0.0.1:1".to_string(), server.uri()])
        .with_request_timeout(Duration::from_secs(5));
    let client = SearchClient::connect(config).await.unwrap();

    assert_eq!(client.endpoint().port(), Some(server.address().port()));
}

#[tokio::test]
async fn test_connect_fails_when_no_endpoint_answers() {
    let err = SearchClient::connect(ConnectionConfig::new("http://127.0.0.1:1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Connection(_)));
    assert!(err.to_string().contains("127.0.0.1:1"));
}

#[tokio::test]
async fn test_connect_skips_endpoint_answering_with_error() {
    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&broken)
        .await;
    let healthy = mock_service().await;

    let client = SearchClient::connect(ConnectionConfig::cluster(vec![broken.uri(), healthy.uri()]))
        .await
        .unwrap();

    assert_eq!(client.endpoint().port(), Some(healthy.address().port()));
}

#[tokio::test]
async fn test_basic_auth_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_info()))
        .expect(1)
        .mount(&server)
        .await;

    let config = ConnectionConfig::new(server.uri()).with_basic_auth("admin", "secret");
    SearchClient::connect(config).await.unwrap();
}

#[tokio::test]
async fn test_deadline_expiry_yields_timeout() {
    let server = mock_service().await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = common::connect(&server).await;
    let err = client
        .with_deadline(Duration::from_millis(50))
        .index_exists("slow")
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Timeout));

    // the client it was derived from has no deadline
    assert!(client.deadline().is_none());
    assert!(client.index_exists("slow").await.unwrap());
}
