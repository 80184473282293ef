//! HTTP request data models.
//!
//! This module defines the data structures describing a single BOS request:
//! the method, the resource path, the optional body source, and the caller's
//! headers and query parameters.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tokio::io::AsyncRead;

/// Request headers as supplied by the caller.
///
/// Header names are case-insensitive on the wire; lookups in this crate use
/// `eq_ignore_ascii_case` rather than relying on the key casing.
pub type Headers = HashMap<String, String>;

/// Query parameters. Kept ordered so the generated query string is stable.
pub type Params = BTreeMap<String, String>;

/// Request method. BOS uses GET, PUT, DELETE, HEAD and POST; the others are
/// accepted for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    HEAD,
}

const METHODS: [HttpMethod; 7] = [
    HttpMethod::GET,
    HttpMethod::POST,
    HttpMethod::PUT,
    HttpMethod::DELETE,
    HttpMethod::PATCH,
    HttpMethod::OPTIONS,
    HttpMethod::HEAD,
];

impl HttpMethod {
    /// Upper-case name, as it appears on the request line and in the
    /// canonical request.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
        }
    }

    /// Case-insensitive lookup by name; `None` for methods BOS never sees.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        METHODS
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(name))
    }

    /// Whether a zero `Content-Length` should be left off for this method.
    pub(crate) fn omits_empty_content_length(&self) -> bool {
        matches!(self, HttpMethod::GET | HttpMethod::HEAD)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
            HttpMethod::HEAD => reqwest::Method::HEAD,
        }
    }
}

/// Source of a request body.
///
/// Buffers and strings have a known length. A stream is read lazily while the
/// request is being sent, so the caller must provide its `Content-Length`.
pub enum RequestBody {
    /// In-memory buffer.
    Bytes(Bytes),
    /// UTF-8 text, sent as its bytes.
    Text(String),
    /// Readable byte stream.
    Stream(Box<dyn AsyncRead + Send + Sync + Unpin + 'static>),
}

impl RequestBody {
    /// Wraps any async reader as a stream body.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        RequestBody::Stream(Box::new(reader))
    }

    /// Byte length when it can be known without consuming the body.
    pub fn known_length(&self) -> Option<u64> {
        match self {
            RequestBody::Bytes(bytes) => Some(bytes.len() as u64),
            RequestBody::Text(text) => Some(text.len() as u64),
            RequestBody::Stream(_) => None,
        }
    }

    /// Returns `true` for stream bodies.
    pub fn is_stream(&self) -> bool {
        matches!(self, RequestBody::Stream(_))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            RequestBody::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            RequestBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(value: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for RequestBody {
    fn from(value: Bytes) -> Self {
        RequestBody::Bytes(value)
    }
}

impl From<&'static [u8]> for RequestBody {
    fn from(value: &'static [u8]) -> Self {
        RequestBody::Bytes(Bytes::from_static(value))
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        RequestBody::Text(value)
    }
}

impl From<&str> for RequestBody {
    fn from(value: &str) -> Self {
        RequestBody::Text(value.to_string())
    }
}

/// A single request against the BOS REST endpoint.
///
/// `path` is the resource path relative to the endpoint (for example
/// `/v1/my-bucket`). It is sent as-is and signed in its canonical form.
#[derive(Debug)]
pub struct BosRequest {
    /// HTTP method (GET, PUT, DELETE, etc.).
    pub method: HttpMethod,

    /// Resource path, starting with `/`.
    pub path: String,

    /// Optional request body.
    pub body: Option<RequestBody>,

    /// Caller headers. These override the client's default headers.
    pub headers: Headers,

    /// Query parameters. An empty value is sent as `key=`.
    pub params: Params,
}

impl BosRequest {
    /// Creates a request with no body, headers or parameters.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Headers::new(),
            params: Params::new(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::GET, path)
    }

    /// Shorthand for a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::PUT, path)
    }

    /// Shorthand for a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::DELETE, path)
    }

    /// Sets the request body.
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a header, replacing any existing header with the same name
    /// regardless of case.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Adds a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Looks up a caller header, ignoring case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
