//! Response decoding and error classification.

use crate::error::{Result, SearchError};
use opensearch::http::response::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Status and raw body of a response.
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub(crate) async fn read(response: Response) -> Result<Self> {
        let status = response.status_code().as_u16();
        let body = response.text().await?;
        Ok(Self { status, body })
    }

    pub(crate) fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as JSON; an empty body reads as `null`.
    pub(crate) fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    pub(crate) fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Decode a success body, or classify the failure.
    pub(crate) fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        if !self.is_success() {
            return Err(self.into_error());
        }
        self.decode()
    }

    pub(crate) fn into_error(self) -> SearchError {
        classify(self.status, &self.body)
    }
}

/// Read a response and decode its success body.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    RawResponse::read(response).await?.into_result()
}

/// Map a non-success status and its body to a [`SearchError`].
pub(crate) fn classify(status: u16, body: &str) -> SearchError {
    let (error_type, reason) = error_details(status, body);

    match status {
        409 => SearchError::Conflict {
            status,
            error_type,
            reason,
        },
        400 if error_type == "resource_already_exists_exception"
            || error_type == "version_conflict_engine_exception" =>
        {
            SearchError::Conflict {
                status,
                error_type,
                reason,
            }
        }
        400 => SearchError::Validation {
            status: Some(status),
            reason,
        },
        404 => SearchError::NotFound {
            status,
            error_type,
            reason,
        },
        _ => SearchError::Service {
            status,
            error_type,
            reason,
        },
    }
}

fn error_details(status: u16, body: &str) -> (String, String) {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    match parsed.get("error") {
        Some(Value::Object(error)) => {
            let error_type = error
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            let reason = error
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("no reason given")
                .to_string();
            (error_type, reason)
        }
        Some(Value::String(reason)) => ("unknown".to_string(), reason.clone()),
        _ => {
            // document-level 404s report `result` or `found` instead of an error object
            if parsed.get("result").and_then(Value::as_str) == Some("not_found")
                || parsed.get("found").and_then(Value::as_bool) == Some(false)
            {
                let index = parsed.get("_index").and_then(Value::as_str).unwrap_or("");
                let id = parsed.get("_id").and_then(Value::as_str).unwrap_or("");
                return (
                    "not_found".to_string(),
                    format!("document [{}] not found in [{}]", id, index),
                );
            }

            let reason = if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body.trim().to_string()
            };
            ("unknown".to_string(), reason)
        }
    }
}
