//! Connection configuration for remote table store backends.
//!
//! The core access layer never reads credentials itself; backend
//! implementations construct themselves from a `StoreConfig`, which is
//! read from the process environment where deployments keep the storage
//! account identity.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Environment variable holding the storage account name.
pub const ACCOUNT_NAME_ENV: &str = "GRIDTABLE_ACCOUNT_NAME";

/// Environment variable holding the storage account key.
pub const ACCOUNT_KEY_ENV: &str = "GRIDTABLE_ACCOUNT_KEY";

/// Optional environment variable overriding the derived endpoint URL.
pub const ENDPOINT_ENV: &str = "GRIDTABLE_ENDPOINT";

const DEFAULT_ENDPOINT_SUFFIX: &str = "table.gridtable.net";

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
}

/// Account identity and credential for a remote backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub account_name: String,
    pub account_key: String,
    /// Full endpoint URL; when absent the well-known suffix is used.
    pub endpoint: Option<String>,
}

impl StoreConfig {
    pub fn new(account_name: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            account_key: account_key.into(),
            endpoint: None,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// `GRIDTABLE_ACCOUNT_NAME` and `GRIDTABLE_ACCOUNT_KEY` are required;
    /// `GRIDTABLE_ENDPOINT` is honored when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let account_name =
            env::var(ACCOUNT_NAME_ENV).map_err(|_| ConfigError::MissingVar(ACCOUNT_NAME_ENV))?;
        let account_key =
            env::var(ACCOUNT_KEY_ENV).map_err(|_| ConfigError::MissingVar(ACCOUNT_KEY_ENV))?;
        Ok(Self {
            account_name,
            account_key,
            endpoint: env::var(ENDPOINT_ENV).ok(),
        })
    }

    /// The endpoint URL this account's tables are served from.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}.{}", self.account_name, DEFAULT_ENDPOINT_SUFFIX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_endpoint() {
        let config = StoreConfig::new("acme", "s3cret");
        assert_eq!(config.endpoint_url(), "https://acme.table.gridtable.net");
    }

    #[test]
    fn test_explicit_endpoint_wins() {
        let mut config = StoreConfig::new("acme", "s3cret");
        config.endpoint = Some("http://localhost:10002".to_string());
        assert_eq!(config.endpoint_url(), "http://localhost:10002");
    }
}
