//! Client configuration
//!
//! The authentication secret and endpoint a client submits requests
//! with. Each in-flight request captures its own snapshot at
//! submission time, so reconfiguring a shared client never races a
//! request already sent.

use reqwest::Url;

use super::errors::{ClientError, ClientResult};

/// Default service endpoint
const DEFAULT_ENDPOINT: &str = "https://db.lagoondb.com/";

/// Connection settings for a [`Client`](super::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Authentication secret, sent as a bearer credential
    pub secret: String,
    /// Endpoint queries are POSTed to
    pub endpoint: Url,
}

impl ClientConfig {
    /// Creates a config for the default endpoint.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint URL is valid"),
        }
    }

    /// Points the config at an alternate endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> ClientResult<Self> {
        self.endpoint = Url::parse(endpoint)
            .map_err(|e| ClientError::Config(format!("endpoint {}: {}", endpoint, e)))?;
        Ok(self)
    }
}

/// The per-request view of the config, captured at submission.
#[derive(Debug, Clone)]
pub(crate) struct ConfigSnapshot {
    pub secret: String,
    pub endpoint: Url,
}

impl ClientConfig {
    pub(crate) fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            secret: self.secret.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let config = ClientConfig::new("secret");
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.secret, "secret");
    }

    #[test]
    fn test_alternate_endpoint() {
        let config = ClientConfig::new("secret")
            .with_endpoint("http://127.0.0.1:8443/")
            .unwrap();
        assert_eq!(config.endpoint.as_str(), "http://127.0.0.1:8443/");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = ClientConfig::new("secret").with_endpoint("not a url");
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut config = ClientConfig::new("old");
        let snapshot = config.snapshot();
        config.secret = "new".to_string();
        assert_eq!(snapshot.secret, "old");
    }
}
