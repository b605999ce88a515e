// Connection settings supplied by the program embedding the search client

use crate::{ConfigManager, ConfigValidator, Result, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Prefix of the environment variables read by [`ClientSettings::load`].
pub const ENV_PREFIX: &str = "SIFT";

/// Settings file picked up from the working directory when `SIFT_CONFIG` is unset.
pub const DEFAULT_FILE: &str = "sift.toml";

/// Where the search service lives and how to authenticate against it.
///
/// Environment values arrive as strings, so `urls` also accepts a
/// comma-separated list and the timeouts accept numeric strings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(deserialize_with = "url_list")]
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "optional_secs")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, deserialize_with = "optional_secs")]
    pub deadline_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            urls: vec![DEFAULT_URL.to_string()],
            username: None,
            password: None,
            request_timeout_secs: None,
            deadline_secs: None,
        }
    }
}

impl ClientSettings {
    /// Load from defaults, the settings file, `.env` and `SIFT_*` variables,
    /// in increasing order of precedence.
    pub fn load() -> Result<Self> {
        let mut manager = ConfigManager::with_prefix(ENV_PREFIX);
        // exports .env into the process environment; the merge below re-reads it
        manager.load_dotenv(None)?;

        let file = std::env::var("SIFT_CONFIG")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_FILE);
                default.exists().then_some(default)
            });

        Self::load_from(ENV_PREFIX, file.as_deref(), std::env::vars())
    }

    /// Load from an explicit file and variable list.
    pub fn load_from(
        prefix: &str,
        file: Option<&Path>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let mut manager = ConfigManager::with_prefix(prefix);
        manager.set("urls", [DEFAULT_URL])?;

        if let Some(path) = file {
            manager.load_file(path)?;
        }
        manager.load_env_vars(vars);

        manager.load_validated()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Username and password, when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        if self.urls.is_empty() {
            return Err(crate::ConfigError::ValidationError(
                "urls must list at least one endpoint".to_string(),
            ));
        }
        for url in &self.urls {
            ConfigValidator::is_url(url, "urls")?;
        }

        match (&self.username, &self.password) {
            (Some(user), Some(_)) => ConfigValidator::not_empty(user, "username")?,
            (None, None) => {}
            _ => {
                return Err(crate::ConfigError::ValidationError(
                    "username and password must be set together".to_string(),
                ));
            }
        }

        if let Some(secs) = self.request_timeout_secs {
            ConfigValidator::in_range(secs, 1, 3600, "request_timeout_secs")?;
        }
        if let Some(secs) = self.deadline_secs {
            ConfigValidator::in_range(secs, 1, 3600, "deadline_secs")?;
        }

        Ok(())
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("urls", &self.urls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("deadline_secs", &self.deadline_secs)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<String>),
    One(String),
}

fn url_list<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(urls) => urls,
        OneOrMany::One(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(String::from)
            .collect(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Seconds {
    Number(u64),
    Text(String),
}

fn optional_secs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<u64>, D::Error> {
    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Number(secs)) => Ok(Some(secs)),
        Some(Seconds::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Seconds::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected seconds, got {:?}", text))),
    }
}
