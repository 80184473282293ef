//! Request authentication.
//!
//! This module provides the bce-auth-v1 signer used by BOS, the credential
//! type it consumes, and the [`SignFunction`] seam through which the
//! [`HttpClient`](crate::executor::HttpClient) asks for an `Authorization`
//! value.

pub mod bce;
pub mod canonical;

pub use bce::{format_timestamp, Auth, SigningOptions, DEFAULT_EXPIRATION_SECS};

use crate::models::request::{Headers, HttpMethod, Params};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Access key / secret key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key id.
    pub ak: String,
    /// Secret access key.
    pub sk: String,
}

impl Credentials {
    pub fn new(ak: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            ak: ak.into(),
            sk: sk.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ak", &self.ak)
            .field("sk", &"<redacted>")
            .finish()
    }
}

/// Errors that can occur while computing a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Credentials were not configured or are empty.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
    /// Key material was rejected by the MAC.
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
    /// A custom signer refused to sign the request.
    #[error("Signing failed: {0}")]
    Rejected(String),
}

/// Computes the `Authorization` header of a request.
///
/// The client calls this once per request, after every other header has been
/// set, so `headers` is exactly what goes on the wire. `credentials` is the
/// pair from the client configuration, if any.
///
/// Closures with the matching signature implement this trait:
///
/// ```
/// use bos_http_client::auth::{AuthError, Credentials, SignFunction};
/// use bos_http_client::models::{Headers, HttpMethod, Params};
///
/// let fixed = |_: Option<&Credentials>, _: HttpMethod, _: &str, _: &Params, _: &Headers| {
///     Ok::<_, AuthError>("token".to_string())
/// };
/// let value = fixed
///     .sign(None, HttpMethod::GET, "/", &Params::new(), &Headers::new())
///     .unwrap();
/// assert_eq!(value, "token");
/// ```
pub trait SignFunction: Send + Sync {
    fn sign(
        &self,
        credentials: Option<&Credentials>,
        method: HttpMethod,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<String, AuthError>;
}

impl<F> SignFunction for F
where
    F: Fn(Option<&Credentials>, HttpMethod, &str, &Params, &Headers) -> Result<String, AuthError>
        + Send
        + Sync,
{
    fn sign(
        &self,
        credentials: Option<&Credentials>,
        method: HttpMethod,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<String, AuthError> {
        self(credentials, method, path, params, headers)
    }
}

/// The stock signer: bce-auth-v1 over the configured credentials.
#[derive(Debug, Clone, Default)]
pub struct BceSigner {
    options: SigningOptions,
}

impl BceSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given options (expiration, header list) for every request.
    pub fn with_options(options: SigningOptions) -> Self {
        Self { options }
    }
}

impl SignFunction for BceSigner {
    fn sign(
        &self,
        credentials: Option<&Credentials>,
        method: HttpMethod,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<String, AuthError> {
        let credentials = credentials.ok_or_else(|| {
            AuthError::MissingCredentials("no credentials configured for the client".to_string())
        })?;
        let mut options = self.options.clone();
        if options.timestamp.is_none() {
            options.timestamp = request_date(headers);
        }
        Auth::from_credentials(credentials.clone())
            .generate_authorization_with(method, path, params, headers, &options)
    }
}

/// Signing time taken from the request's `x-bce-date` header, so that the
/// signature and the header carry the same instant.
fn request_date(headers: &Headers) -> Option<DateTime<Utc>> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("x-bce-date"))
        .and_then(|(_, v)| DateTime::parse_from_rfc3339(v.trim()).ok())
        .map(|date| date.with_timezone(&Utc))
}
