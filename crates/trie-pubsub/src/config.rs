// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration.
//!
//! Supports both programmatic and file-based configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How the trie is guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Shared-exclusive lock: publishes run in parallel, mutations are
    /// exclusive. A callback must not subscribe or unsubscribe on the same
    /// engine (it would deadlock).
    #[default]
    ReadWrite,

    /// Reentrant lock: all calls are serialized, and callbacks may subscribe
    /// or unsubscribe. Such changes are staged and applied once the outermost
    /// publish returns.
    Reentrant,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubSubConfig {
    /// Engine name (for identification in logs).
    #[serde(default = "default_name")]
    pub name: String,

    /// Lock strategy.
    #[serde(default)]
    pub lock_mode: LockMode,

    /// Seed for the default random source. Unset means seeded from the
    /// process-wide generator.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_name() -> String {
    "trie-pubsub".to_string()
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            lock_mode: LockMode::default(),
            seed: None,
        }
    }
}

impl PubSubConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("Engine name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PubSubConfig::default();
        assert_eq!(config.name, "trie-pubsub");
        assert_eq!(config.lock_mode, LockMode::ReadWrite);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = PubSubConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, PubSubConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let config = PubSubConfig::from_toml_str(
            r#"
name = "orders"
lock_mode = "reentrant"
seed = 42
"#,
        )
        .expect("valid config");

        assert_eq!(config.name, "orders");
        assert_eq!(config.lock_mode, LockMode::Reentrant);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_unknown_lock_mode_rejected() {
        let err = PubSubConfig::from_toml_str(r#"lock_mode = "none""#).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = PubSubConfig::from_toml_str(r#"name = "  ""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "name = \"from-disk\"\nlock_mode = \"read_write\"").expect("write");

        let config = PubSubConfig::from_file(file.path()).expect("load");
        assert_eq!(config.name, "from-disk");
        assert_eq!(config.lock_mode, LockMode::ReadWrite);
    }

    #[test]
    fn test_from_missing_file() {
        let err = PubSubConfig::from_file("/nonexistent/trie-pubsub.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_serialize_roundtrip_names() {
        let config = PubSubConfig {
            name: "x".into(),
            lock_mode: LockMode::Reentrant,
            seed: Some(1),
        };
        let text = toml::to_string_pretty(&config).expect("serialize");
        assert!(text.contains("lock_mode = \"reentrant\""));
    }
}
