//! Environment-driven client configuration.

use std::time::Duration;

use stockia_inventory::StockPolicy;
use thiserror::Error;

pub const API_URL_VAR: &str = "STOCKIA_API_URL";
pub const AUTH_TOKEN_VAR: &str = "STOCKIA_AUTH_TOKEN";
pub const MOVEMENTS_PATH_VAR: &str = "STOCKIA_MOVEMENTS_PATH";
pub const STOCK_POLICY_VAR: &str = "STOCKIA_STOCK_POLICY";
pub const HTTP_TIMEOUT_VAR: &str = "STOCKIA_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_MOVEMENTS_PATH: &str = "/api/inventory/movements";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must be a path starting with '/', got {value:?}")]
    InvalidPath { var: &'static str, value: String },
    #[error("{var} must be block or clamp, got {value:?}")]
    InvalidStockPolicy { var: &'static str, value: String },
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub auth_token: Option<String>,
    pub movements_path: String,
    pub stock_policy: StockPolicy,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            movements_path: DEFAULT_MOVEMENTS_PATH.to_string(),
            stock_policy: StockPolicy::default(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get(API_URL_VAR) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    var: API_URL_VAR,
                    value: url,
                });
            }
            config.api_url = url.trim_end_matches('/').to_string();
        }

        config.auth_token = get(AUTH_TOKEN_VAR);

        if let Some(path) = get(MOVEMENTS_PATH_VAR) {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPath {
                    var: MOVEMENTS_PATH_VAR,
                    value: path,
                });
            }
            config.movements_path = path;
        }

        if let Some(policy) = get(STOCK_POLICY_VAR) {
            config.stock_policy =
                policy
                    .parse()
                    .map_err(|_| ConfigError::InvalidStockPolicy {
                        var: STOCK_POLICY_VAR,
                        value: policy.clone(),
                    })?;
        }

        if let Some(secs) = get(HTTP_TIMEOUT_VAR) {
            config.request_timeout = match secs.parse::<u64>() {
                Ok(n) if n > 0 => Duration::from_secs(n),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: HTTP_TIMEOUT_VAR,
                        value: secs,
                    });
                }
            };
        }

        Ok(config)
    }

    /// Absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.movements_path, "/api/inventory/movements");
        assert_eq!(config.stock_policy, StockPolicy::Block);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://api.stockia.test/"),
            (AUTH_TOKEN_VAR, "abc"),
            (MOVEMENTS_PATH_VAR, "/api/inventory-movements"),
            (STOCK_POLICY_VAR, "clamp"),
            (HTTP_TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.stockia.test");
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
        assert_eq!(config.movements_path, "/api/inventory-movements");
        assert_eq!(config.stock_policy, StockPolicy::Clamp);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_token_counts_as_unset() {
        let config = ClientConfig::from_lookup(lookup(&[(AUTH_TOKEN_VAR, "  ")])).unwrap();
        assert_eq!(config.auth_token, None);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "localhost:8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = ClientConfig::from_lookup(lookup(&[(STOCK_POLICY_VAR, "ignore")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStockPolicy { .. }));

        let err = ClientConfig::from_lookup(lookup(&[(HTTP_TIMEOUT_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));

        let err =
            ClientConfig::from_lookup(lookup(&[(MOVEMENTS_PATH_VAR, "api/movements")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath { .. }));
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ClientConfig::new("http://localhost:8080/");
        assert_eq!(
            config.endpoint("/api/products"),
            "http://localhost:8080/api/products"
        );
        assert_eq!(config.endpoint("api/products"), "http://localhost:8080/api/products");
    }
}
