// Settings loading errors

use thiserror::Error;

/// Why settings could not be produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `get` on a key no source provided.
    #[error("Setting not found: {0}")]
    KeyNotFound(String),

    /// A settings or `.env` file could not be located or read.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// A file was read but is not valid JSON, TOML or `.env` syntax.
    #[error("Failed to parse settings: {0}")]
    ParseError(String),

    /// Loaded values violate a rule of the target struct.
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Merged values do not fit the target struct.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Environment variable error: {0}")]
    EnvError(#[from] std::env::VarError),
}

impl ConfigError {
    /// True when the settings were found but rejected.
    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            ConfigError::ValidationError(_) | ConfigError::DeserializationError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
