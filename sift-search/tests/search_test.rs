mod common;

use common::{connect, error_body, mock_service};
use serde::Deserialize;
use serde_json::{Value, json};
use sift_search::{
    Aggregation, BoolQuery, Query, RangeQuery, SearchError, SearchRequest, SearchResponse,
    SortOrder,
};
use wiremock::matchers::{body_json, body_partial_json, path};
use wiremock::{Mock, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Product {
    name: String,
    sold_count: u32,
}

fn search_answer(total: u64, hits: Value, aggregations: Value) -> Value {
    json!({
        "took": 2,
        "timed_out": false,
        "_shards": { "total": 1, "successful": 1, "skipped": 0, "failed": 0 },
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "max_score": 1.0,
            "hits": hits
        },
        "aggregations": aggregations
    })
}

#[tokio::test]
async fn test_match_all_finds_indexed_book() {
    let server = mock_service().await;
    Mock::given(path("/books/_search"))
        .and(body_json(json!({ "query": { "match_all": {} } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_answer(
            1,
            json!([{ "_index": "books", "_id": "1", "_score": 1.0, "_source": { "price": 10.0 } }]),
            json!({}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let response: SearchResponse<Value> = client.search("books", &SearchRequest::new()).await.unwrap();

    assert_eq!(response.total, 1);
    assert_eq!(response.hits.len(), 1);
    assert_eq!(response.hits[0].id, "1");
    assert_eq!(response.hits[0].score, Some(1.0));
    assert_eq!(response.hits[0].source["price"], 10.0);
}

#[tokio::test]
async fn test_sort_by_sold_count_desc() {
    let server = mock_service().await;
    Mock::given(path("/products/_search"))
        .and(body_partial_json(json!({
            "sort": [{ "sold_count": { "order": "desc" } }],
            "size": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_answer(
            2,
            json!([
                { "_index": "products", "_id": "2", "_score": null,
                  "_source": { "name": "Phone", "sold_count": 50 }, "sort": [50] },
                { "_index": "products", "_id": "1", "_score": null,
                  "_source": { "name": "Cable", "sold_count": 5 }, "sort": [5] }
            ]),
            json!({}),
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let request = SearchRequest::new()
        .sort_by("sold_count", SortOrder::Desc)
        .size(20);
    let response: SearchResponse<Product> = client.search("products", &request).await.unwrap();

    assert_eq!(response.hits[0].source.sold_count, 50);
    assert_eq!(response.hits[1].source.sold_count, 5);
    assert_eq!(response.hits[0].score, None);
}

#[tokio::test]
async fn test_bool_query_and_sum_aggregation() {
    let server = mock_service().await;
    Mock::given(path("/products/_search"))
        .and(body_partial_json(json!({
            "query": { "bool": { "must": [
                { "range": { "price": { "gte": 100, "lte": 1000 } } },
                { "match": { "name": { "query": "phone" } } }
            ] } },
            "aggs": { "total_prices": { "sum": { "field": "price" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_answer(
            0,
            json!([]),
            json!({ "total_prices": { "value": 1498.0 } }),
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let request = SearchRequest::with_query(
        BoolQuery::new()
            .must(RangeQuery::new("price").gte(100).lte(1000))
            .must(Query::matches("name", "phone")),
    )
    .aggregation("total_prices", Aggregation::sum("price"));

    let response: SearchResponse<Value> = client.search("products", &request).await.unwrap();
    let total = response.aggregation("total_prices").unwrap();
    assert_eq!(total.metric_value(), Some(1498.0));
}

#[tokio::test]
async fn test_terms_aggregation_buckets() {
    let server = mock_service().await;
    Mock::given(path("/products/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_answer(
            3,
            json!([]),
            json!({ "by_category": {
                "doc_count_error_upper_bound": 0,
                "sum_other_doc_count": 0,
                "buckets": [
                    { "key": "electronics", "doc_count": 2 },
                    { "key": "books", "doc_count": 1 }
                ]
            } }),
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let request = SearchRequest::new()
        .size(0)
        .aggregation("by_category", Aggregation::terms("category"));
    let response: SearchResponse<Value> = client.search("products", &request).await.unwrap();

    let result = response.aggregation("by_category").unwrap();
    let buckets = result.buckets().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].key, json!("electronics"));
    assert_eq!(buckets[0].doc_count, 2);
}

#[tokio::test]
async fn test_malformed_query_rejected_by_service() {
    let server = mock_service().await;
    Mock::given(path("/products/_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "search_phase_execution_exception",
            "all shards failed",
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client
        .search::<Value>("products", &SearchRequest::with_query(Query::term("price", "abc")))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Validation { status: Some(400), .. }));
}

#[tokio::test]
async fn test_invalid_query_never_leaves_the_client() {
    let server = mock_service().await;
    Mock::given(path("/products/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_answer(0, json!([]), json!({}))))
        .expect(0)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let request = SearchRequest::with_query(RangeQuery::new("price"));
    let err = client.search::<Value>("products", &request).await.unwrap_err();

    assert!(matches!(err, SearchError::Validation { status: None, .. }));
}

#[tokio::test]
async fn test_search_missing_index() {
    let server = mock_service().await;
    Mock::given(path("/ghost/_search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "index_not_found_exception",
            "no such index [ghost]",
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client.search::<Value>("ghost", &SearchRequest::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_count_all_and_filtered() {
    let server = mock_service().await;
    Mock::given(path("/articles/_count"))
        .and(body_json(json!({ "query": { "term": { "created_on": "2024-05-01" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "_shards": { "total": 1, "successful": 1, "skipped": 0, "failed": 0 }
        })))
        .mount(&server)
        .await;
    Mock::given(path("/articles/_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 5,
            "_shards": { "total": 1, "successful": 1, "skipped": 0, "failed": 0 }
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;

    assert_eq!(client.count_documents("articles", None).await.unwrap(), 5);

    let filter = Query::term("created_on", "2024-05-01");
    assert_eq!(client.count_documents("articles", Some(&filter)).await.unwrap(), 2);
}

#[tokio::test]
async fn test_count_missing_index() {
    let server = mock_service().await;
    Mock::given(path("/ghost/_count"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "index_not_found_exception",
            "no such index [ghost]",
        )))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    assert!(client.count_documents("ghost", None).await.unwrap_err().is_not_found());
}
