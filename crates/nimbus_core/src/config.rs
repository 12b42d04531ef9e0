//! Stack configuration.
//!
//! Configuration is a flat key/value map with per-key secret marking, loaded
//! from a stack YAML file or built in memory for tests:
//!
//! ```yaml
//! config:
//!   sqlAdmin: dbadmin
//!   sqlPassword:
//!     value: s3cret
//!     secret: true
//! ```
//!
//! A secret key is only handed out as a secret [`Output`], never as a plain
//! string, so the value cannot leak into plans or logs downstream.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::output::Output;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ConfigEntry {
    Plain(String),
    Rich {
        value: String,
        #[serde(default)]
        secret: bool,
    },
}

#[derive(Debug, Deserialize)]
struct StackFile {
    #[serde(default)]
    config: BTreeMap<String, ConfigEntry>,
}

#[derive(Clone)]
struct ConfigValue {
    value: String,
    secret: bool,
}

/// Key/value configuration for a deployment run.
#[derive(Clone, Default)]
pub struct StackConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl StackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the `config:` section of a stack YAML file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path)?;
        let file: StackFile = serde_yaml::from_str(&content)?;

        let mut config = Self::new();
        for (key, entry) in file.config {
            match entry {
                ConfigEntry::Plain(value) => config.set(key, value),
                ConfigEntry::Rich { value, secret: true } => config.set_secret(key, value),
                ConfigEntry::Rich { value, secret: false } => config.set(key, value),
            }
        }
        debug!("Loaded {} config keys from {}", config.values.len(), path.display());
        Ok(config)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(
            key.into(),
            ConfigValue {
                value: value.into(),
                secret: false,
            },
        );
    }

    pub fn set_secret(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(
            key.into(),
            ConfigValue {
                value: value.into(),
                secret: true,
            },
        );
    }

    /// A plain value, if present. Secret keys are not readable this way.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .filter(|v| !v.secret)
            .map(|v| v.value.clone())
    }

    /// A plain value, or the given default when unset.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// A required plain value; missing keys are a fatal configuration error.
    pub fn require(&self, key: &str) -> CoreResult<String> {
        self.get(key)
            .ok_or_else(|| CoreError::MissingConfig(key.to_string()))
    }

    /// A required secret, returned as a secret-classified output. Missing
    /// keys are fatal; a key present but not marked secret is rejected so a
    /// password cannot silently live in plaintext config.
    pub fn require_secret(&self, key: &str) -> CoreResult<Output<String>> {
        match self.values.get(key) {
            None => Err(CoreError::MissingConfig(key.to_string())),
            Some(v) if !v.secret => Err(CoreError::NotSecret(key.to_string())),
            Some(v) => Ok(Output::secret(v.value.clone())),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }
}

impl fmt::Debug for StackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if value.secret {
                map.entry(key, &"[secret]");
            } else {
                map.entry(key, &value.value);
            }
        }
        map.finish()
    }
}
