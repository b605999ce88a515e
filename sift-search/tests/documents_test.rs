mod common;

use common::{connect, error_body, mock_service, write_body};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sift_search::{Script, SearchError, UpdateRequest, WriteResult};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Book {
    price: f64,
}

#[tokio::test]
async fn test_index_with_id_then_get_returns_same_source() {
    let server = mock_service().await;
    Mock::given(path("/books/_doc/1"))
        .and(body_json(json!({ "price": 10.0 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(write_body("books", "1", 1, "created")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/books/_doc/1"))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "books",
            "_id": "1",
            "_version": 1,
            "_seq_no": 0,
            "_primary_term": 1,
            "found": true,
            "_source": { "price": 10.0 }
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let book = Book { price: 10.0 };

    let written = client.index_document("books", &book, Some("1")).await.unwrap();
    assert_eq!(written.result, WriteResult::Created);
    assert_eq!(written.id, "1");

    let fetched = client.get_document::<Book>("books", "1").await.unwrap();
    assert!(fetched.found);
    assert_eq!(fetched.version, Some(1));
    assert_eq!(fetched.source, Some(book));
}

#[tokio::test]
async fn test_index_without_id_gets_generated_id() {
    let server = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/articles/_doc"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(write_body("articles", "kZ3x9YsB", 1, "created")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let written = client
        .index_document("articles", &json!({ "title": "First post" }), None)
        .await
        .unwrap();

    assert_eq!(written.id, "kZ3x9YsB");
}

#[tokio::test]
async fn test_non_object_document_is_rejected_locally() {
    let server = mock_service().await;
    Mock::given(path("/books/_doc"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client.index_document("books", &[1, 2, 3], None).await.unwrap_err();
    assert!(matches!(err, SearchError::Validation { status: None, .. }));

    let err = client.index_document("books", &json!({}), Some("")).await.unwrap_err();
    assert!(matches!(err, SearchError::Validation { status: None, .. }));
}

#[tokio::test]
async fn test_rejected_document_is_validation_error() {
    let server = mock_service().await;
    Mock::given(path("/books/_doc/1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "mapper_parsing_exception",
            "failed to parse field [price] of type [float]",
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client
        .index_document("books", &json!({ "price": "cheap" }), Some("1"))
        .await
        .unwrap_err();

    match err {
        SearchError::Validation { status, reason } => {
            assert_eq!(status, Some(400));
            assert!(reason.contains("[price]"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_create_document_conflict() {
    let server = mock_service().await;
    Mock::given(path("/tags/_create/rust"))
        .respond_with(ResponseTemplate::new(409).set_body_json(error_body(
            409,
            "version_conflict_engine_exception",
            "[rust]: version conflict, document already exists (current version [1])",
        )))
        .mount(&server)
        .await;
    Mock::given(path("/tags/_create/go"))
        .respond_with(ResponseTemplate::new(201).set_body_json(write_body("tags", "go", 1, "created")))
        .mount(&server)
        .await;

    let client = connect(&server).await;

    let created = client.create_document("tags", "go", &json!({ "name": "go" })).await.unwrap();
    assert_eq!(created.result, WriteResult::Created);

    let err = client
        .create_document("tags", "rust", &json!({ "name": "rust" }))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.status_code(), Some(409));
}

#[tokio::test]
async fn test_get_missing_document_and_missing_index() {
    let server = mock_service().await;
    Mock::given(method("GET"))
        .and(path("/books/_doc/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": "books",
            "_id": "404",
            "found": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ghost/_doc/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "index_not_found_exception",
            "no such index [ghost]",
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;

    let missing = client.get_document::<Value>("books", "404").await.unwrap();
    assert!(!missing.found);
    assert!(missing.source.is_none());

    let err = client.get_document::<Value>("ghost", "1").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.error_type(), Some("index_not_found_exception"));
}

#[tokio::test]
async fn test_document_exists() {
    let server = mock_service().await;
    Mock::given(method("HEAD"))
        .and(path("/books/_doc/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/books/_doc/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    assert!(client.document_exists("books", "1").await.unwrap());
    assert!(!client.document_exists("books", "2").await.unwrap());
}

#[tokio::test]
async fn test_script_update() {
    let server = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/articles/_update/1"))
        .and(body_json(json!({
            "script": {
                "source": "ctx._source.title = params.title",
                "params": { "title": "Updated title" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(write_body("articles", "1", 2, "updated")))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let request = UpdateRequest::script(
        Script::new("ctx._source.title = params.title").param("title", "Updated title"),
    );

    let updated = client.update_document("articles", "1", &request).await.unwrap();
    assert_eq!(updated.result, WriteResult::Updated);
    assert_eq!(updated.version, 2);
}

#[tokio::test]
async fn test_update_missing_document_without_upsert() {
    let server = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/articles/_update/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "document_missing_exception",
            "[9]: document missing",
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client
        .update_document("articles", "9", &UpdateRequest::patch(json!({ "views": 1 })))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.error_type(), Some("document_missing_exception"));
}

#[tokio::test]
async fn test_upsert_creates_then_updates() {
    let server = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/articles/_update/new"))
        .and(body_partial_json(json!({ "doc_as_upsert": true })))
        .respond_with(ResponseTemplate::new(201).set_body_json(write_body("articles", "new", 1, "created")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/articles/_update/new"))
        .and(body_partial_json(json!({ "doc_as_upsert": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(write_body("articles", "new", 2, "updated")))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let request = UpdateRequest::patch(json!({ "title": "Upserted" })).upsert();

    let first = client.update_document("articles", "new", &request).await.unwrap();
    assert_eq!(first.result, WriteResult::Created);

    let second = client.update_document("articles", "new", &request).await.unwrap();
    assert_eq!(second.result, WriteResult::Updated);
}

#[tokio::test]
async fn test_noop_update() {
    let server = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/articles/_update/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(write_body("articles", "1", 3, "noop")))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let result = client
        .update_document("articles", "1", &UpdateRequest::patch(json!({ "title": "Same" })))
        .await
        .unwrap();
    assert_eq!(result.result, WriteResult::Noop);
}

#[tokio::test]
async fn test_delete_document() {
    let server = mock_service().await;
    Mock::given(method("DELETE"))
        .and(path("/books/_doc/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(write_body("books", "1", 2, "deleted")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/books/_doc/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": "books",
            "_id": "missing",
            "_version": 1,
            "result": "not_found",
            "_shards": { "total": 2, "successful": 1, "failed": 0 },
            "_seq_no": 3,
            "_primary_term": 1
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;

    let deleted = client.delete_document("books", "1").await.unwrap();
    assert_eq!(deleted.result, WriteResult::Deleted);

    let err = client.delete_document("books", "missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status_code(), Some(404));
}
