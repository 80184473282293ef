//! Configuration loading for the BOS client.
//!
//! Configuration can come from a JSON settings document (the client settings
//! live under the `"bos"` key), from a JSON file with the same layout, or from
//! `BOS_*` environment variables. Every source is validated before use.

pub mod schema;

pub use schema::{ClientConfig, ConfigError};

use serde_json::Value;
use std::path::Path;

/// Key of the client settings inside a settings document.
pub const SETTINGS_KEY: &str = "bos";

pub const ENV_ENDPOINT: &str = "BOS_ENDPOINT";
pub const ENV_AK: &str = "BOS_AK";
pub const ENV_SK: &str = "BOS_SK";
pub const ENV_SESSION_TOKEN: &str = "BOS_SESSION_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "BOS_TIMEOUT_SECS";

/// Loads a client configuration from a settings document.
///
/// The settings are read from the `"bos"` key and merged with defaults.
///
/// # Arguments
///
/// * `settings_json` - JSON value containing the client settings under `"bos"`
///
/// # Returns
///
/// `Ok(ClientConfig)` with the loaded configuration, or `Err` if the key is
/// missing, malformed, or fails validation.
///
/// # Example
///
/// ```
/// use bos_http_client::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "bos": {
///         "endpoint": "https://bj.bcebos.com",
///         "credentials": {"ak": "my-ak", "sk": "my-sk"}
///     }
/// });
///
/// let config = load_config(&settings).unwrap();
/// assert_eq!(config.endpoint, "https://bj.bcebos.com");
/// ```
pub fn load_config(settings_json: &Value) -> Result<ClientConfig, ConfigError> {
    let section = settings_json.get(SETTINGS_KEY).ok_or_else(|| {
        ConfigError::Invalid(format!("settings have no \"{}\" section", SETTINGS_KEY))
    })?;

    let config: ClientConfig = serde_json::from_value(section.clone())?;
    config.validate()?;

    log::debug!("loaded client configuration for {}", config.endpoint);
    Ok(config)
}

/// Loads a client configuration from a JSON settings file.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<ClientConfig, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let settings: Value = serde_json::from_str(&contents)?;
    load_config(&settings)
}

impl ClientConfig {
    /// Builds a configuration from `BOS_*` environment variables.
    ///
    /// `BOS_ENDPOINT` is required. Credentials are set only when both
    /// `BOS_AK` and `BOS_SK` are present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = std::env::var(ENV_ENDPOINT).map_err(|_| ConfigError::MissingEnv(ENV_ENDPOINT))?;
        let mut config = ClientConfig::new(endpoint);

        if let (Ok(ak), Ok(sk)) = (std::env::var(ENV_AK), std::env::var(ENV_SK)) {
            config = config.with_credentials(ak, sk);
        }

        if let Ok(token) = std::env::var(ENV_SESSION_TOKEN) {
            if !token.is_empty() {
                config = config.with_session_token(token);
            }
        }

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT_SECS) {
            let timeout_secs = timeout.parse::<u64>().map_err(|e| {
                ConfigError::Invalid(format!("{} {:?}: {}", ENV_TIMEOUT_SECS, timeout, e))
            })?;
            config = config.with_timeout_secs(timeout_secs);
        }

        config.validate()?;
        Ok(config)
    }
}
