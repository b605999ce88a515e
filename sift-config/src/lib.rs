// Settings management for Sift programs

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::ClientSettings;
pub use validation::{ConfigValidator, Validate};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;

/// Layered key/value store; later loads override earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: Map<String, Value>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `PREFIX_*` variables are taken from the environment.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            values: Map::new(),
            env_prefix: Some(prefix.into()),
        }
    }

    /// Merge the process environment.
    pub fn load_env(&mut self) {
        self.load_env_vars(std::env::vars());
    }

    /// Merge an explicit variable list, filtered by the prefix.
    pub fn load_env_vars(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        let loader = EnvLoader::new(self.env_prefix.clone());
        for (key, value) in loader.collect(vars) {
            self.values.insert(key, Value::String(value));
        }
    }

    /// Export a `.env` file into the process environment, then merge the environment.
    ///
    /// Without a path a missing `.env` in the working directory is not an error.
    /// Variables already set in the environment are left untouched.
    pub fn load_dotenv(&mut self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                if let Err(err) = dotenvy::dotenv() {
                    if !err.not_found() {
                        return Err(ConfigError::LoadError(err.to_string()));
                    }
                }
            }
        }
        self.load_env();
        Ok(())
    }

    /// Merge a JSON/TOML/.env file, format chosen by extension.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = ConfigLoader::auto(path)?.load_file(path)?;

        if let Value::Object(map) = data {
            self.values.extend(map);
        }

        Ok(())
    }

    pub fn set<T: serde::Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;
        self.values.insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::DeserializationError(format!("{}: {}", key, e)))
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Deserialize everything loaded so far into `T` and run its validation.
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let validated: T = serde_json::from_value(Value::Object(self.values.clone()))
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        validated.validate()?;

        Ok(validated)
    }
}
