//! Search client construction and the round-trip plumbing shared by every operation.

use crate::{
    config::ConnectionConfig,
    error::{Result, SearchError},
    response,
};
use opensearch::{
    OpenSearch,
    auth::Credentials,
    http::{
        Url,
        transport::{SingleNodeConnectionPool, Transport, TransportBuilder},
    },
};
use serde::{Deserialize, Serialize};
use sift_log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Handle to a connected search service.
///
/// Cheap to clone; clones share the same transport and configuration.
#[derive(Clone)]
pub struct SearchClient {
    client: Arc<OpenSearch>,
    config: Arc<ConnectionConfig>,
    endpoint: Arc<Url>,
    service: Arc<ServiceInfo>,
    deadline: Option<Duration>,
}

impl SearchClient {
    /// Connect to the first URL in `config` that answers `GET /`.
    ///
    /// URLs are tried in order; unreachable ones are logged and skipped.
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        let urls = config.parsed_urls()?;
        info!("Connecting to search service: {:?}", config.urls);

        let mut failures = Vec::new();
        for url in urls {
            let client = OpenSearch::new(build_transport(&config, url.clone())?);

            let answer = with_deadline(config.deadline, async {
                let response = client.info().send().await?;
                response::decode::<ServiceInfo>(response).await
            })
            .await;

            match answer {
                Ok(service) => {
                    info!(
                        "Connected to {} ({} {})",
                        url,
                        service.cluster_name,
                        service.version.number
                    );
                    return Ok(Self {
                        client: Arc::new(client),
                        deadline: config.deadline,
                        config: Arc::new(config),
                        endpoint: Arc::new(url),
                        service: Arc::new(service),
                    });
                }
                Err(err) => {
                    warn!("Endpoint {} did not answer: {}", url, err);
                    failures.push(format!("{}: {}", url, err));
                }
            }
        }

        Err(SearchError::Connection(format!(
            "no endpoint answered ({})",
            failures.join("; ")
        )))
    }

    /// Same client, with a different deadline for calls made through it.
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    /// Same client, without a per-call deadline.
    pub fn without_deadline(&self) -> Self {
        Self {
            deadline: None,
            ..self.clone()
        }
    }

    /// Get the underlying OpenSearch client.
    pub fn inner(&self) -> &OpenSearch {
        &self.client
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The URL that answered at connect time.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Service description captured at connect time.
    pub fn service(&self) -> &ServiceInfo {
        &self.service
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Fetch the current service description.
    pub async fn info(&self) -> Result<ServiceInfo> {
        debug!("Fetching service info");

        self.round_trip(async {
            let response = self.client.info().send().await?;
            response::decode(response).await
        })
        .await
    }

    /// Run one round trip under the client's deadline.
    pub(crate) async fn round_trip<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        with_deadline(self.deadline, call).await
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("deadline", &self.deadline)
            .finish()
    }
}

fn build_transport(config: &ConnectionConfig, url: Url) -> Result<Transport> {
    let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(url));

    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    if !config.use_proxy {
        builder = builder.disable_proxy();
    }
    if let (Some(user), Some(pass)) = (&config.username, &config.password) {
        builder = builder.auth(Credentials::Basic(user.clone(), pass.clone()));
    }

    builder
        .build()
        .map_err(|e| SearchError::Connection(e.to_string()))
}

async fn with_deadline<T, F>(deadline: Option<Duration>, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| SearchError::Timeout)?,
        None => call.await,
    }
}

/// Answer to `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Node name.
    pub name: String,
    pub cluster_name: String,
    #[serde(default)]
    pub cluster_uuid: String,
    pub version: ServiceVersion,
    #[serde(default)]
    pub tagline: Option<String>,
}

/// Version block of [`ServiceInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceVersion {
    pub number: String,
    /// `opensearch` on OpenSearch, absent on Elasticsearch.
    #[serde(default)]
    pub distribution: Option<String>,
    #[serde(default)]
    pub build_flavor: Option<String>,
    #[serde(default)]
    pub lucene_version: Option<String>,
}
