//! Single-document operations.

use crate::{
    client::SearchClient,
    error::{Result, SearchError},
    index::{exists_from_status, validate_index_name},
    response::RawResponse,
};
use opensearch::{CreateParts, DeleteParts, ExistsParts, GetParts, IndexParts, UpdateParts};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use sift_log::debug;

/// Outcome of a document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteResult {
    Created,
    Updated,
    Deleted,
    /// An update that changed nothing.
    Noop,
}

/// Answer to index, create, update and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: u64,
    pub result: WriteResult,
    #[serde(rename = "_seq_no", default, skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<u64>,
    #[serde(rename = "_primary_term", default, skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<u64>,
}

/// Answer to a get. `found` is false when the index exists but the document does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResult<T> {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub found: bool,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(rename = "_source", default = "none", skip_serializing_if = "Option::is_none")]
    pub source: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

/// Script run by an update.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub source: String,
    pub params: Map<String, Value>,
    /// Defaults to `painless` on the service.
    pub lang: Option<String>,
}

impl Script {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            params: Map::new(),
            lang: None,
        }
    }

    /// Add a parameter, available to the script as `params.<name>`.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut script = json!({ "source": self.source });
        if !self.params.is_empty() {
            script["params"] = Value::Object(self.params.clone());
        }
        if let Some(lang) = &self.lang {
            script["lang"] = json!(lang);
        }
        script
    }
}

/// How an update changes the document.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Merge these fields into the source.
    Patch(Value),
    Script(Script),
}

/// Body of `POST /{index}/_update/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub action: UpdateAction,
    /// Create the document when it is missing.
    pub upsert: bool,
    /// Starting document for a scripted upsert; `{}` when unset.
    pub upsert_document: Option<Value>,
}

impl UpdateRequest {
    /// Merge `fields` into the existing source.
    pub fn patch(fields: impl Into<Value>) -> Self {
        Self {
            action: UpdateAction::Patch(fields.into()),
            upsert: false,
            upsert_document: None,
        }
    }

    pub fn script(script: Script) -> Self {
        Self {
            action: UpdateAction::Script(script),
            upsert: false,
            upsert_document: None,
        }
    }

    /// Create the document if it does not exist. A patch becomes the new
    /// document; a script runs against the upsert document.
    pub fn upsert(mut self) -> Self {
        self.upsert = true;
        self
    }

    pub fn upsert_document(mut self, document: impl Into<Value>) -> Self {
        self.upsert = true;
        self.upsert_document = Some(document.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        match &self.action {
            UpdateAction::Patch(fields) if !fields.is_object() => {
                return Err(SearchError::validation("update patch must be a JSON object"));
            }
            UpdateAction::Script(script) if script.source.trim().is_empty() => {
                return Err(SearchError::validation("update script must not be empty"));
            }
            UpdateAction::Patch(_) if self.upsert_document.is_some() => {
                return Err(SearchError::validation(
                    "an upsert document only applies to scripted updates",
                ));
            }
            _ => {}
        }
        if self.upsert_document.as_ref().is_some_and(|d| !d.is_object()) {
            return Err(SearchError::validation("upsert document must be a JSON object"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        match &self.action {
            UpdateAction::Patch(fields) => {
                let mut body = json!({ "doc": fields });
                if self.upsert {
                    body["doc_as_upsert"] = json!(true);
                }
                body
            }
            UpdateAction::Script(script) => {
                let mut body = json!({ "script": script.to_json() });
                if self.upsert {
                    body["scripted_upsert"] = json!(true);
                    body["upsert"] = self.upsert_document.clone().unwrap_or_else(|| json!({}));
                }
                body
            }
        }
    }
}

/// Serialize a document, requiring a JSON object.
fn document_body<D: Serialize + ?Sized>(document: &D) -> Result<Value> {
    let body = serde_json::to_value(document)?;
    if !body.is_object() {
        return Err(SearchError::validation("documents must serialize to a JSON object"));
    }
    Ok(body)
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(SearchError::validation("document id must not be empty"));
    }
    Ok(())
}

impl SearchClient {
    /// Index a document, replacing any document with the same id.
    /// Without an id the service generates one.
    pub async fn index_document<D: Serialize + ?Sized>(
        &self,
        index: &str,
        document: &D,
        id: Option<&str>,
    ) -> Result<WriteResponse> {
        validate_index_name(index)?;
        if let Some(id) = id {
            validate_id(id)?;
        }
        let body = document_body(document)?;
        debug!("Indexing document {:?} in index {}", id, index);

        self.round_trip(async {
            let parts = match id {
                Some(id) => IndexParts::IndexId(index, id),
                None => IndexParts::Index(index),
            };
            let response = self.inner().index(parts).body(body).send().await?;
            RawResponse::read(response).await?.into_result()
        })
        .await
    }

    /// Index a document only if `id` is not taken.
    pub async fn create_document<D: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        document: &D,
    ) -> Result<WriteResponse> {
        validate_index_name(index)?;
        validate_id(id)?;
        let body = document_body(document)?;
        debug!("Creating document {} in index {}", id, index);

        self.round_trip(async {
            let response = self
                .inner()
                .create(CreateParts::IndexId(index, id))
                .body(body)
                .send()
                .await?;
            RawResponse::read(response).await?.into_result()
        })
        .await
    }

    /// Get a document by id.
    pub async fn get_document<T: DeserializeOwned>(&self, index: &str, id: &str) -> Result<GetResult<T>> {
        validate_index_name(index)?;
        validate_id(id)?;
        debug!("Getting document {} from index {}", id, index);

        let raw = self
            .round_trip(async {
                let response = self.inner().get(GetParts::IndexId(index, id)).send().await?;
                RawResponse::read(response).await
            })
            .await?;

        // a missing document answers 404 with `found: false`; a missing index carries an error
        if raw.status == 404 {
            let body = raw.json()?;
            if body.get("found").and_then(Value::as_bool) == Some(false) {
                return Ok(GetResult {
                    index: index.to_string(),
                    id: id.to_string(),
                    found: false,
                    version: None,
                    source: None,
                });
            }
        }

        raw.into_result()
    }

    /// Check if a document exists.
    pub async fn document_exists(&self, index: &str, id: &str) -> Result<bool> {
        validate_index_name(index)?;
        validate_id(id)?;
        debug!("Checking if document {} exists in index {}", id, index);

        let raw = self
            .round_trip(async {
                let response = self.inner().exists(ExistsParts::IndexId(index, id)).send().await?;
                RawResponse::read(response).await
            })
            .await?;

        exists_from_status(raw)
    }

    /// Update a document with a patch or a script.
    pub async fn update_document(
        &self,
        index: &str,
        id: &str,
        request: &UpdateRequest,
    ) -> Result<WriteResponse> {
        validate_index_name(index)?;
        validate_id(id)?;
        request.validate()?;
        debug!("Updating document {} in index {}", id, index);

        let body = request.to_json();
        self.round_trip(async {
            let response = self
                .inner()
                .update(UpdateParts::IndexId(index, id))
                .body(body)
                .send()
                .await?;
            RawResponse::read(response).await?.into_result()
        })
        .await
    }

    /// Delete a document by id. A missing document is [`SearchError::NotFound`].
    pub async fn delete_document(&self, index: &str, id: &str) -> Result<WriteResponse> {
        validate_index_name(index)?;
        validate_id(id)?;
        debug!("Deleting document {} from index {}", id, index);

        self.round_trip(async {
            let response = self.inner().delete(DeleteParts::IndexId(index, id)).send().await?;
            RawResponse::read(response).await?.into_result()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_response_decodes() {
        let body = r#"{"_index":"books","_id":"1","_version":2,"result":"updated",
            "_shards":{"total":2,"successful":1,"failed":0},"_seq_no":5,"_primary_term":1}"#;
        let response: WriteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.result, WriteResult::Updated);
        assert_eq!(response.version, 2);
        assert_eq!(response.seq_no, Some(5));
    }

    #[test]
    fn test_get_result_decodes_typed_source() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Book {
            price: f64,
        }

        let found: GetResult<Book> = serde_json::from_str(
            r#"{"_index":"books","_id":"1","_version":1,"found":true,"_source":{"price":10.0}}"#,
        )
        .unwrap();
        assert!(found.found);
        assert_eq!(found.source, Some(Book { price: 10.0 }));

        let missing: GetResult<Book> =
            serde_json::from_str(r#"{"_index":"books","_id":"2","found":false}"#).unwrap();
        assert!(!missing.found);
        assert!(missing.source.is_none());
    }

    #[test]
    fn test_patch_body() {
        let request = UpdateRequest::patch(json!({ "new_field": "dummy_value" }));
        assert_eq!(request.to_json(), json!({ "doc": { "new_field": "dummy_value" } }));

        let upsert = UpdateRequest::patch(json!({ "title": "New" })).upsert();
        assert_eq!(upsert.to_json()["doc_as_upsert"], true);
    }

    #[test]
    fn test_script_body() {
        let request = UpdateRequest::script(
            Script::new("ctx._source.title = params.title").param("title", "Updated title"),
        );
        assert_eq!(
            request.to_json(),
            json!({ "script": {
                "source": "ctx._source.title = params.title",
                "params": { "title": "Updated title" }
            } })
        );

        let upsert = UpdateRequest::script(Script::new("ctx._source.count += 1"))
            .upsert_document(json!({ "count": 0 }));
        let body = upsert.to_json();
        assert_eq!(body["scripted_upsert"], true);
        assert_eq!(body["upsert"], json!({ "count": 0 }));
    }

    #[test]
    fn test_update_validation() {
        assert!(UpdateRequest::patch(json!([1, 2])).validate().is_err());
        assert!(UpdateRequest::script(Script::new("  ")).validate().is_err());
        assert!(
            UpdateRequest::patch(json!({ "a": 1 }))
                .upsert_document(json!({ "a": 0 }))
                .validate()
                .is_err()
        );
        assert!(UpdateRequest::script(Script::new("ctx.op = 'noop'")).validate().is_ok());
    }

    #[test]
    fn test_document_body_requires_object() {
        assert!(document_body(&json!({ "price": 10.0 })).is_ok());
        assert!(document_body(&42).is_err());
        assert!(document_body("text").is_err());
        assert!(validate_id("").is_err());
    }
}
