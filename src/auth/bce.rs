//! bce-auth-v1 request signing.
//!
//! The authorization value has the form
//! `bce-auth-v1/{ak}/{timestamp}/{expiration}/{signed-headers}/{signature}`,
//! where the signature is an HMAC-SHA256 over the canonical request keyed by
//! a per-request signing key derived from the secret key.

use super::canonical::{canonical_headers, canonical_query_string, canonical_uri};
use super::{AuthError, Credentials};
use crate::models::request::{Headers, HttpMethod, Params};
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Validity window of a signature when none is given.
pub const DEFAULT_EXPIRATION_SECS: u64 = 1800;

const AUTH_VERSION: &str = "bce-auth-v1";

/// Optional inputs to [`Auth::generate_authorization_with`].
#[derive(Debug, Clone, Default)]
pub struct SigningOptions {
    /// Signing time. Defaults to the current time.
    pub timestamp: Option<DateTime<Utc>>,
    /// How long the signature stays valid. Defaults to 1800 seconds.
    pub expiration_in_seconds: Option<u64>,
    /// Header names to sign in addition to `x-bce-*` headers. `None` or an
    /// empty list means `host`, `content-md5`, `content-length` and
    /// `content-type`.
    pub headers_to_sign: Option<Vec<String>>,
}

/// Signer bound to one credential pair.
#[derive(Debug, Clone)]
pub struct Auth {
    credentials: Credentials,
}

impl Auth {
    /// Creates a signer for the given access key and secret key.
    pub fn new(ak: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(ak, sk),
        }
    }

    /// Creates a signer from an existing credential pair.
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Computes the `Authorization` header value for a request signed now.
    ///
    /// # Examples
    ///
    /// ```
    /// use bos_http_client::auth::Auth;
    /// use bos_http_client::models::{Headers, HttpMethod, Params};
    ///
    /// let auth = Auth::new("my-ak", "my-sk");
    /// let value = auth
    ///     .generate_authorization(HttpMethod::GET, "/v1", &Params::new(), &Headers::new())
    ///     .unwrap();
    /// assert!(value.starts_with("bce-auth-v1/my-ak/"));
    /// ```
    pub fn generate_authorization(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<String, AuthError> {
        self.generate_authorization_with(method, path, params, headers, &SigningOptions::default())
    }

    /// Computes the `Authorization` header value with explicit options.
    pub fn generate_authorization_with(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
        headers: &Headers,
        options: &SigningOptions,
    ) -> Result<String, AuthError> {
        if self.credentials.ak.is_empty() || self.credentials.sk.is_empty() {
            return Err(AuthError::MissingCredentials(
                "access key and secret key must not be empty".to_string(),
            ));
        }

        let timestamp = options.timestamp.unwrap_or_else(Utc::now);
        let expiration = options
            .expiration_in_seconds
            .unwrap_or(DEFAULT_EXPIRATION_SECS);

        let auth_string_prefix = format!(
            "{}/{}/{}/{}",
            AUTH_VERSION,
            self.credentials.ak,
            format_timestamp(&timestamp),
            expiration
        );
        let signing_key = hex_hmac_sha256(self.credentials.sk.as_bytes(), &auth_string_prefix)?;

        let (canonical_header_block, signed_headers) =
            canonical_headers(headers, options.headers_to_sign.as_deref());
        let canonical_request = format!(
            "{}\n{}\n{}\n{}",
            method.as_str(),
            canonical_uri(path),
            canonical_query_string(params),
            canonical_header_block
        );
        let signature = hex_hmac_sha256(signing_key.as_bytes(), &canonical_request)?;

        log::trace!("canonical request for {} {}:\n{}", method, path, canonical_request);

        Ok(format!(
            "{}/{}/{}",
            auth_string_prefix,
            signed_headers.join(";"),
            signature
        ))
    }
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SSZ`, the form used by both the
/// signature and the `x-bce-date` header.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Lower-case hex HMAC-SHA256 of `data` under `key`.
pub fn hex_hmac_sha256(key: &[u8], data: &str) -> Result<String, AuthError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AuthError::InvalidKey(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
