//! HTTP response data models.
//!
//! This module defines the materialized form of a BOS response: the status
//! code, the normalized header map and the body.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Materialized body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed JSON document. Empty payloads become the empty object `{}`.
    Json(Value),
    /// Payload with a non-JSON or missing content type, untouched.
    Raw(Bytes),
}

impl ResponseBody {
    /// The empty JSON object, returned for empty bodies and when the payload
    /// was written to an output sink.
    pub fn empty() -> Self {
        ResponseBody::Json(Value::Object(Map::new()))
    }

    /// Builds a body from a fully read payload.
    ///
    /// An empty payload is `{}`. Otherwise JSON is parsed only for an
    /// `application/json` or `text/json` content type; anything else,
    /// including a missing content type, is kept as raw bytes.
    ///
    /// # Returns
    ///
    /// `Err` with the parse error when a JSON payload is malformed.
    pub fn from_payload(
        content_type: Option<&str>,
        payload: Bytes,
    ) -> Result<Self, serde_json::Error> {
        if payload.is_empty() {
            return Ok(Self::empty());
        }

        if content_type.map_or(false, is_json_content_type) {
            serde_json::from_slice(&payload).map(ResponseBody::Json)
        } else {
            Ok(ResponseBody::Raw(payload))
        }
    }

    /// Returns the JSON document, if this is a JSON body.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }

    /// Returns the raw payload, if this is not a JSON body.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ResponseBody::Raw(bytes) => Some(bytes),
            ResponseBody::Json(_) => None,
        }
    }

    /// `true` for the empty JSON object.
    pub fn is_empty_object(&self) -> bool {
        matches!(self, ResponseBody::Json(Value::Object(map)) if map.is_empty())
    }

    /// Looks up a top-level field of a JSON object body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_json().and_then(|value| value.get(key))
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("application/json") || content_type.contains("text/json")
}

/// A successful response from the BOS endpoint.
#[derive(Debug, Clone)]
pub struct BosResponse {
    /// HTTP status code, always in the 2xx range.
    pub status_code: u16,

    /// Response headers keyed by lower-cased name.
    pub http_headers: HashMap<String, String>,

    /// Materialized body.
    pub body: ResponseBody,
}

impl BosResponse {
    /// Looks up a header. `name` must be lower-case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.http_headers.get(name).map(String::as_str)
    }

    /// Returns `true` if the header is present. `name` must be lower-case.
    pub fn has_header(&self, name: &str) -> bool {
        self.http_headers.contains_key(name)
    }

    /// The `x-bce-request-id` the service assigned to this request.
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-bce-request-id")
    }

    /// The `content-type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Error document returned by the service on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "requestId")]
    pub request_id: Option<String>,
}

impl ServiceErrorBody {
    /// Parses an error payload. Anything that is not a JSON object yields
    /// an empty document.
    pub fn parse(payload: &[u8]) -> Self {
        serde_json::from_slice(payload).unwrap_or_default()
    }
}

/// Normalizes raw response headers.
///
/// Names are lower-cased, values trimmed, empty values dropped and the
/// double quotes around `etag` removed. Repeated headers are joined with
/// `", "` in the order received.
pub fn normalize_headers<'a, I>(headers: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut normalized = HashMap::new();
    for (name, value) in headers {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let name = name.to_ascii_lowercase();
        let value = if name == "etag" {
            value.replace('"', "")
        } else {
            value.to_string()
        };
        normalized
            .entry(name)
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    normalized
}
