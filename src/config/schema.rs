//! Configuration schema for the BOS client.
//!
//! This module defines the client configuration structure and its
//! validation rules.

use crate::auth::Credentials;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting has an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    /// The settings document could not be deserialized.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// A required environment variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Configuration of an [`HttpClient`](crate::executor::HttpClient).
///
/// Only `endpoint` is required; everything else has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Service endpoint, e.g. `https://bj.bcebos.com`.
    ///
    /// Request paths are appended to it verbatim.
    pub endpoint: String,

    /// Credentials handed to the signer.
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Temporary session token, sent as `x-bce-security-token`.
    #[serde(default)]
    pub session_token: Option<String>,

    /// Overall request timeout in seconds. Defaults to 120.
    ///
    /// Must be greater than 0.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for `endpoint` with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials: None,
            session_token: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Sets the credentials.
    pub fn with_credentials(mut self, ak: impl Into<String>, sk: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(ak, sk));
        self
    }

    /// Sets the session token.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` describing the first
    /// invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".to_string()));
        }

        let parsed = url::Url::parse(endpoint)
            .map_err(|e| ConfigError::Invalid(format!("endpoint {:?}: {}", endpoint, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "endpoint must use http or https, got: {}",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(ConfigError::Invalid("endpoint has no host".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeoutSecs must be greater than 0".to_string(),
            ));
        }

        if let Some(credentials) = &self.credentials {
            if credentials.ak.is_empty() || credentials.sk.is_empty() {
                return Err(ConfigError::Invalid(
                    "credentials.ak and credentials.sk must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_user_agent() -> String {
    format!(
        "bce-sdk-rust/{}/{}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
