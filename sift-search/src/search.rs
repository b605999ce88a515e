//! Search requests, aggregations and results.

use crate::{
    client::SearchClient,
    error::{Result, SearchError},
    index::validate_index_name,
    query::Query,
    response::RawResponse,
};
use opensearch::{CountParts, SearchParts};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use sift_log::debug;

/// Sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Body of `POST /{index}/_search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub query: Query,
    /// Applied in order; `_score` sorts by relevance.
    pub sort: Vec<(String, SortOrder)>,
    pub from: Option<u64>,
    pub size: Option<u64>,
    pub aggregations: Vec<(String, Aggregation)>,
    /// Count hits exactly past the service's default cap.
    pub track_total_hits: Option<bool>,
    /// Only return these `_source` fields.
    pub source_includes: Option<Vec<String>>,
}

impl SearchRequest {
    /// `match_all`, service defaults for everything else.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<Query>) -> Self {
        Self::new().query(query)
    }

    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = query.into();
        self
    }

    /// Add sort field.
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push((field.into(), order));
        self
    }

    /// Set pagination offset.
    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Set result size limit.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add aggregation; a later one with the same name replaces the earlier.
    pub fn aggregation(mut self, name: impl Into<String>, agg: Aggregation) -> Self {
        let name = name.into();
        self.aggregations.retain(|(existing, _)| *existing != name);
        self.aggregations.push((name, agg));
        self
    }

    pub fn track_total_hits(mut self, track: bool) -> Self {
        self.track_total_hits = Some(track);
        self
    }

    pub fn source_includes<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.source_includes = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.query.validate()?;

        if self.sort.iter().any(|(field, _)| field.trim().is_empty()) {
            return Err(SearchError::validation("sort fields must not be empty"));
        }
        for (name, agg) in &self.aggregations {
            if name.trim().is_empty() {
                return Err(SearchError::validation("aggregation names must not be empty"));
            }
            agg.validate(name)?;
        }
        Ok(())
    }

    /// Build the search body.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();

        body.insert("query".to_string(), self.query.to_json());

        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        if !self.sort.is_empty() {
            let sort = self
                .sort
                .iter()
                .map(|(field, order)| json!({ field: { "order": order.as_str() } }))
                .collect();
            body.insert("sort".to_string(), Value::Array(sort));
        }
        if let Some(includes) = &self.source_includes {
            body.insert("_source".to_string(), json!({ "includes": includes }));
        }
        if !self.aggregations.is_empty() {
            let aggs = self
                .aggregations
                .iter()
                .map(|(name, agg)| (name.clone(), agg.to_json()))
                .collect();
            body.insert("aggs".to_string(), Value::Object(aggs));
        }
        if let Some(track) = self.track_total_hits {
            body.insert("track_total_hits".to_string(), json!(track));
        }

        Value::Object(body)
    }
}

/// Aggregation types.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// One bucket per distinct value.
    Terms {
        field: String,
        /// Maximum number of buckets.
        size: Option<u64>,
    },
    Sum { field: String },
    Avg { field: String },
    Min { field: String },
    Max { field: String },
    /// Approximate distinct count.
    Cardinality { field: String },
    ValueCount { field: String },
    /// Fixed-width numeric buckets.
    Histogram { field: String, interval: f64 },
}

impl Aggregation {
    pub fn terms(field: impl Into<String>) -> Self {
        Aggregation::Terms {
            field: field.into(),
            size: None,
        }
    }

    pub fn sum(field: impl Into<String>) -> Self {
        Aggregation::Sum { field: field.into() }
    }

    pub fn avg(field: impl Into<String>) -> Self {
        Aggregation::Avg { field: field.into() }
    }

    pub fn min(field: impl Into<String>) -> Self {
        Aggregation::Min { field: field.into() }
    }

    pub fn max(field: impl Into<String>) -> Self {
        Aggregation::Max { field: field.into() }
    }

    pub fn field(&self) -> &str {
        match self {
            Aggregation::Terms { field, .. }
            | Aggregation::Sum { field }
            | Aggregation::Avg { field }
            | Aggregation::Min { field }
            | Aggregation::Max { field }
            | Aggregation::Cardinality { field }
            | Aggregation::ValueCount { field }
            | Aggregation::Histogram { field, .. } => field,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.field().trim().is_empty() {
            return Err(SearchError::validation(format!(
                "aggregation {:?} needs a field",
                name
            )));
        }
        if let Aggregation::Histogram { interval, .. } = self {
            if interval.is_nan() || *interval <= 0.0 {
                return Err(SearchError::validation(format!(
                    "histogram {:?} needs a positive interval",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Convert to JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Aggregation::Terms { field, size } => {
                let mut terms = json!({ "field": field });
                if let Some(s) = size {
                    terms["size"] = json!(s);
                }
                json!({ "terms": terms })
            }
            Aggregation::Sum { field } => json!({ "sum": { "field": field } }),
            Aggregation::Avg { field } => json!({ "avg": { "field": field } }),
            Aggregation::Min { field } => json!({ "min": { "field": field } }),
            Aggregation::Max { field } => json!({ "max": { "field": field } }),
            Aggregation::Cardinality { field } => json!({ "cardinality": { "field": field } }),
            Aggregation::ValueCount { field } => json!({ "value_count": { "field": field } }),
            Aggregation::Histogram { field, interval } => {
                json!({ "histogram": { "field": field, "interval": interval } })
            }
        }
    }
}

/// Decoded answer of a search.
#[derive(Debug, Clone)]
pub struct SearchResponse<T> {
    /// Time taken in milliseconds.
    pub took: u64,
    pub timed_out: bool,
    /// Total matching documents.
    pub total: u64,
    /// `eq`, or `gte` when the total is a lower bound.
    pub total_relation: String,
    pub max_score: Option<f64>,
    pub hits: Vec<Hit<T>>,
    pub aggregations: Map<String, Value>,
}

impl<T> SearchResponse<T> {
    /// Sources of all hits, in rank order.
    pub fn documents(&self) -> impl Iterator<Item = &T> {
        self.hits.iter().map(|hit| &hit.source)
    }

    /// Decoded aggregation result by name.
    pub fn aggregation(&self, name: &str) -> Option<AggregationResult> {
        self.aggregations.get(name).map(AggregationResult::from_json)
    }
}

impl<T: DeserializeOwned> SearchResponse<T> {
    fn from_json(result: &Value) -> Result<Self> {
        let hits = match result["hits"]["hits"].as_array() {
            Some(hits) => hits.iter().map(Hit::from_json).collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        // older services report the total as a bare number
        let (total, total_relation) = match &result["hits"]["total"] {
            Value::Number(n) => (n.as_u64().unwrap_or(0), "eq".to_string()),
            total => (
                total["value"].as_u64().unwrap_or(0),
                total["relation"].as_str().unwrap_or("eq").to_string(),
            ),
        };

        Ok(Self {
            took: result["took"].as_u64().unwrap_or(0),
            timed_out: result["timed_out"].as_bool().unwrap_or(false),
            total,
            total_relation,
            max_score: result["hits"]["max_score"].as_f64(),
            hits,
            aggregations: result["aggregations"].as_object().cloned().unwrap_or_default(),
        })
    }
}

/// A search hit.
#[derive(Debug, Clone)]
pub struct Hit<T> {
    pub index: String,
    pub id: String,
    /// Absent when sorting by something other than `_score`.
    pub score: Option<f64>,
    pub source: T,
    /// Sort values of this hit.
    pub sort: Vec<Value>,
}

impl<T: DeserializeOwned> Hit<T> {
    fn from_json(hit: &Value) -> Result<Self> {
        let source = hit.get("_source").cloned().unwrap_or(Value::Null);

        Ok(Self {
            index: hit["_index"].as_str().unwrap_or("").to_string(),
            id: hit["_id"].as_str().unwrap_or("").to_string(),
            score: hit["_score"].as_f64(),
            source: serde_json::from_value(source)?,
            sort: hit["sort"].as_array().cloned().unwrap_or_default(),
        })
    }
}

/// Decoded aggregation result.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationResult {
    /// Single-value metric; `None` when no document had the field.
    Metric { value: Option<f64> },
    Buckets(Vec<Bucket>),
    /// Any other shape, as returned.
    Raw(Value),
}

impl AggregationResult {
    pub fn from_json(value: &Value) -> Self {
        if let Some(buckets) = value.get("buckets").and_then(Value::as_array) {
            return AggregationResult::Buckets(
                buckets
                    .iter()
                    .map(|b| Bucket {
                        key: b["key"].clone(),
                        key_as_string: b["key_as_string"].as_str().map(String::from),
                        doc_count: b["doc_count"].as_u64().unwrap_or(0),
                    })
                    .collect(),
            );
        }
        if let Some(v) = value.get("value") {
            return AggregationResult::Metric { value: v.as_f64() };
        }
        AggregationResult::Raw(value.clone())
    }

    /// Get a metric value (avg, sum, min, max).
    pub fn metric_value(&self) -> Option<f64> {
        match self {
            AggregationResult::Metric { value } => *value,
            _ => None,
        }
    }

    /// Get buckets from bucket aggregation.
    pub fn buckets(&self) -> Option<&[Bucket]> {
        match self {
            AggregationResult::Buckets(buckets) => Some(buckets),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: Value,
    pub key_as_string: Option<String>,
    pub doc_count: u64,
}

impl SearchClient {
    /// Run a search against one index.
    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse<T>> {
        validate_index_name(index)?;
        request.validate()?;
        debug!("Searching index {}", index);

        let body = request.to_json();
        let result: Value = self
            .round_trip(async {
                let response = self
                    .inner()
                    .search(SearchParts::Index(&[index]))
                    .body(body)
                    .send()
                    .await?;
                RawResponse::read(response).await?.into_result()
            })
            .await?;

        SearchResponse::from_json(&result)
    }

    /// Count documents, optionally only those matching `filter`.
    pub async fn count_documents(&self, index: &str, filter: Option<&Query>) -> Result<u64> {
        validate_index_name(index)?;
        if let Some(query) = filter {
            query.validate()?;
        }
        debug!("Counting documents in index {}", index);

        let indices = [index];
        let result: Value = self
            .round_trip(async {
                let count = self.inner().count(CountParts::Index(&indices));
                let response = match filter {
                    Some(query) => count.body(json!({ "query": query.to_json() })).send().await?,
                    None => count.send().await?,
                };
                RawResponse::read(response).await?.into_result()
            })
            .await?;

        result["count"].as_u64().ok_or_else(|| SearchError::Service {
            status: 200,
            error_type: "malformed_response".to_string(),
            reason: "count missing from response".to_string(),
        })
    }
}
