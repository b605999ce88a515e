// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::BTreeMap;
use std::env;

/// Reads `PREFIX_*` environment variables.
///
/// Keys are returned with the prefix stripped and lowercased, so
/// `SIFT_REQUEST_TIMEOUT_SECS` becomes `request_timeout_secs`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// All matching variables of the current process.
    pub fn load(&self) -> BTreeMap<String, String> {
        self.collect(env::vars())
    }

    /// Same filtering as [`EnvLoader::load`] over an explicit variable list.
    pub fn collect(&self, vars: impl IntoIterator<Item = (String, String)>) -> BTreeMap<String, String> {
        vars.into_iter()
            .filter_map(|(key, value)| match &self.prefix {
                Some(prefix) => key
                    .strip_prefix(prefix.as_str())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_lowercase(), value)),
                None => Some((key.to_lowercase(), value)),
            })
            .collect()
    }

    /// A single variable; `key` is given without the prefix.
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.full_key(key)).map_err(ConfigError::EnvError)
    }

    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_prefix_is_stripped_and_lowercased() {
        let loader = EnvLoader::new(Some("SIFT".to_string()));
        let loaded = loader.collect(vars(&[
            ("SIFT_URLS", "http://a:9200"),
            ("SIFT_REQUEST_TIMEOUT_SECS", "5"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["urls"], "http://a:9200");
        assert_eq!(loaded["request_timeout_secs"], "5");
    }

    #[test]
    fn test_prefix_requires_separator() {
        let loader = EnvLoader::new(Some("SIFT".to_string()));
        let loaded = loader.collect(vars(&[("SIFTER_URLS", "x"), ("SIFT_", "y")]));
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_without_prefix_keeps_everything() {
        let loader = EnvLoader::default();
        let loaded = loader.collect(vars(&[("HOME", "/root")]));
        assert_eq!(loaded["home"], "/root");
    }

    #[test]
    fn test_load_var_or_default() {
        let loader = EnvLoader::new(Some("SIFT_UNIT".to_string()));
        assert_eq!(loader.load_var_or("NONEXISTENT_VAR_12345", "fallback"), "fallback");
        assert!(loader.load_var("NONEXISTENT_VAR_12345").is_err());
    }
}
