//! Request execution error types.
//!
//! A request either fails locally (bad endpoint, missing length, signer
//! error), in transport (DNS, connection, timeout), or with a non-2xx status
//! from the service.

use crate::auth::AuthError;
use crate::config::ConfigError;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Classification of a transport failure.
///
/// The string forms follow the familiar socket error names so callers can
/// match on `code()` without depending on the HTTP stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    /// Host name could not be resolved.
    NotFound,
    /// Nothing listens on the target port.
    ConnectionRefused,
    /// The peer dropped the connection.
    ConnectionReset,
    /// The request did not finish within the configured timeout.
    TimedOut,
    /// Any other protocol or transport failure.
    Protocol,
}

impl TransportCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportCode::NotFound => "ENOTFOUND",
            TransportCode::ConnectionRefused => "ECONNREFUSED",
            TransportCode::ConnectionReset => "ECONNRESET",
            TransportCode::TimedOut => "ETIMEDOUT",
            TransportCode::Protocol => "EPROTO",
        }
    }
}

impl fmt::Display for TransportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`HttpClient`](super::HttpClient).
#[derive(Debug, Error)]
pub enum BosError {
    /// The request never produced an HTTP response.
    #[error("{code}: {message}")]
    Transport {
        code: TransportCode,
        message: String,
    },

    /// The service answered with a non-2xx status.
    #[error("HTTP {status_code}: {message}")]
    Http {
        status_code: u16,
        /// Service error code, e.g. `AccessDenied`.
        code: Option<String>,
        message: String,
        request_id: Option<String>,
    },

    /// A stream body was supplied without a `Content-Length` header.
    #[error("No Content-Length is specified.")]
    MissingContentLength,

    /// The client configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A header name or value cannot be sent.
    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The signer failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A successful response carried a body that could not be decoded.
    #[error("Failed to decode response body: {0}")]
    Body(#[from] serde_json::Error),

    /// Writing to the output sink failed.
    #[error("Failed to write response body: {0}")]
    Io(#[from] std::io::Error),
}

impl BosError {
    /// Transport code (`ENOTFOUND`, ...) or, for HTTP errors, the service
    /// error code when one was returned.
    pub fn code(&self) -> Option<&str> {
        match self {
            BosError::Transport { code, .. } => Some(code.as_str()),
            BosError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BosError::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Request id reported by the service for a failed request.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            BosError::Http { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// `true` when the failure happened before any HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, BosError::Transport { .. })
    }
}

/// Classifies reqwest errors by walking their source chain.
impl From<reqwest::Error> for BosError {
    fn from(err: reqwest::Error) -> Self {
        let code = classify(&err);
        BosError::Transport {
            code,
            message: error_chain(&err),
        }
    }
}

fn classify(err: &reqwest::Error) -> TransportCode {
    if err.is_timeout() {
        return TransportCode::TimedOut;
    }

    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(current) = source {
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            match io.kind() {
                std::io::ErrorKind::ConnectionRefused => return TransportCode::ConnectionRefused,
                std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted => {
                    return TransportCode::ConnectionReset
                }
                std::io::ErrorKind::TimedOut => return TransportCode::TimedOut,
                _ => {}
            }
        }

        let text = current.to_string().to_ascii_lowercase();
        if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
            || text.contains("no such host")
        {
            return TransportCode::NotFound;
        }
        if text.contains("connection refused") {
            return TransportCode::ConnectionRefused;
        }

        source = current.source();
    }

    TransportCode::Protocol
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(current) = source {
        message.push_str(": ");
        message.push_str(&current.to_string());
        source = current.source();
    }
    message
}
