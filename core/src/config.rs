//! Client configuration.
//!
//! Defaults target the backend layout the front end was written against:
//! same-origin requests to `/be/users`, items embedded under `users`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the reconciler folds a successful mutation back into local state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Mutate local state immediately; refetch only when the request fails.
    #[default]
    Optimistic,
    /// Leave local state alone; refetch after every mutation.
    Pessimistic,
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(Policy::Optimistic),
            "pessimistic" => Ok(Policy::Pessimistic),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown reconcile policy `{0}` (expected optimistic or pessimistic)")]
    InvalidPolicy(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin prepended to every request path. Empty means same-origin.
    pub base_url: String,
    pub collection_path: String,
    /// Key under `_embedded` holding the item array.
    pub embedded_rel: String,
    pub policy: Policy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            collection_path: "/be/users".to_string(),
            embedded_rel: "users".to_string(),
            policy: Policy::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `HAL_SYNC_BASE_URL`, `HAL_SYNC_COLLECTION_PATH`,
    /// `HAL_SYNC_EMBEDDED_REL` and `HAL_SYNC_POLICY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = lookup("HAL_SYNC_BASE_URL") {
            config.base_url = v;
        }
        if let Some(v) = lookup("HAL_SYNC_COLLECTION_PATH") {
            config.collection_path = v;
        }
        if let Some(v) = lookup("HAL_SYNC_EMBEDDED_REL") {
            config.embedded_rel = v;
        }
        if let Some(v) = lookup("HAL_SYNC_POLICY") {
            config.policy = v.parse()?;
        }
        Ok(config)
    }
}
