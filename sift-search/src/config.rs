//! Search client connection configuration.

use crate::error::{Result, SearchError};
use opensearch::http::Url;
use std::fmt;
use std::time::Duration;

/// Where the search service lives and how to talk to it.
///
/// Fixed once a [`SearchClient`](crate::SearchClient) is connected.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Base URLs, tried in order at connect time.
    pub urls: Vec<String>,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Transport-level timeout applied to every request.
    pub request_timeout: Option<Duration>,
    /// Deadline applied to every call made through the client.
    pub deadline: Option<Duration>,
    /// Honour system proxy settings.
    pub use_proxy: bool,
}

impl ConnectionConfig {
    /// Configuration with a single URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self::cluster(vec![url.into()])
    }

    /// Configuration with several candidate URLs.
    pub fn cluster(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: None,
            password: None,
            request_timeout: None,
            deadline: None,
            use_proxy: false,
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the transport request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the per-call deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Route requests through the system proxy.
    pub fn with_proxy(mut self, enabled: bool) -> Self {
        self.use_proxy = enabled;
        self
    }

    /// Parse every URL, in order.
    pub fn parsed_urls(&self) -> Result<Vec<Url>> {
        if self.urls.is_empty() {
            return Err(SearchError::Connection("no URLs provided".to_string()));
        }

        self.urls
            .iter()
            .map(|raw| {
                let url = Url::parse(raw)
                    .map_err(|e| SearchError::Connection(format!("invalid URL {:?}: {}", raw, e)))?;
                match url.scheme() {
                    "http" | "https" => Ok(url),
                    other => Err(SearchError::Connection(format!(
                        "unsupported scheme {:?} in {:?}",
                        other, raw
                    ))),
                }
            })
            .collect()
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new("http://localhost:9200")
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("urls", &self.urls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("request_timeout", &self.request_timeout)
            .field("deadline", &self.deadline)
            .field("use_proxy", &self.use_proxy)
            .finish()
    }
}
