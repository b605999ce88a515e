// Sift - a typed client for Elasticsearch/OpenSearch-compatible search services
//
// This library bundles the search client facade with the settings loader and
// logging setup used by programs that embed it.

use thiserror::Error;

// Re-export the client facade
pub use sift_search::*;

// Re-export ambient crates
pub use sift_config;
pub use sift_log;

pub use sift_config::{ClientSettings, ConfigError};

/// Errors raised while bringing up a client from settings.
#[derive(Debug, Error)]
pub enum Error {
    #[error("settings error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Build a [`ConnectionConfig`] from loaded settings.
///
/// Credentials are only carried over when both username and password are set.
pub fn connection_config(settings: &ClientSettings) -> ConnectionConfig {
    let mut config = ConnectionConfig::cluster(settings.urls.clone());

    if let Some((username, password)) = settings.credentials() {
        config = config.with_basic_auth(username, password);
    }
    if let Some(timeout) = settings.request_timeout() {
        config = config.with_request_timeout(timeout);
    }
    if let Some(deadline) = settings.deadline() {
        config = config.with_deadline(deadline);
    }

    config
}

/// Connect using settings from `sift.toml`, `.env` and `SIFT_*` variables.
pub async fn connect_from_env() -> std::result::Result<SearchClient, Error> {
    let settings = ClientSettings::load()?;
    connect_with(&settings).await
}

/// Connect using already loaded settings.
pub async fn connect_with(settings: &ClientSettings) -> std::result::Result<SearchClient, Error> {
    sift_log::debug!(urls = ?settings.urls, "Connecting from settings");
    let client = SearchClient::connect(connection_config(settings)).await?;
    Ok(client)
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{ClientSettings, connect_from_env, connect_with};
    pub use sift_search::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings() -> ClientSettings {
        ClientSettings {
            urls: vec!["http://a:9200".to_string(), "http://b:9200".to_string()],
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            request_timeout_secs: Some(5),
            deadline_secs: Some(30),
        }
    }

    #[test]
    fn test_connection_config_copies_settings() {
        let config = connection_config(&settings());

        assert_eq!(config.urls, vec!["http://a:9200", "http://b:9200"]);
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.deadline, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_connection_config_defaults() {
        let config = connection_config(&ClientSettings::default());

        assert_eq!(config, ConnectionConfig::default());
    }

    #[test]
    fn test_unpaired_username_is_dropped() {
        let settings = ClientSettings {
            password: None,
            ..settings()
        };
        let config = connection_config(&settings);

        assert!(config.username.is_none());
        assert!(config.password.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = Error::from(ConfigError::ValidationError("urls is empty".to_string()));
        assert_eq!(err.to_string(), "settings error: Validation error: urls is empty");

        let err = Error::from(SearchError::Timeout);
        assert_eq!(err.to_string(), SearchError::Timeout.to_string());
    }
}
