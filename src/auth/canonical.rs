//! Canonical forms used by the bce-auth-v1 signature.
//!
//! All encoding here is RFC 3986 percent-encoding: only `A-Z a-z 0-9 - _ . ~`
//! pass through unchanged.

use crate::models::request::{Headers, Params};

/// Headers that are signed by default, besides any `x-bce-*` header.
pub const DEFAULT_HEADERS_TO_SIGN: [&str; 4] =
    ["host", "content-md5", "content-length", "content-type"];

const BCE_HEADER_PREFIX: &str = "x-bce-";

/// Percent-encodes every byte outside the RFC 3986 unreserved set.
///
/// # Examples
///
/// ```
/// use bos_http_client::auth::canonical::normalize;
///
/// assert_eq!(normalize("a b/c*"), "a%20b%2Fc%2A");
/// assert_eq!(normalize("AZaz09-_.~"), "AZaz09-_.~");
/// ```
pub fn normalize(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Encodes a resource path segment by segment, keeping the `/` separators.
pub fn canonical_uri(path: &str) -> String {
    path.split('/').map(normalize).collect::<Vec<_>>().join("/")
}

/// Builds the canonical query string.
///
/// The `authorization` parameter is never part of the signature.
pub fn canonical_query_string(params: &Params) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case("authorization"))
        .map(|(key, value)| format!("{}={}", normalize(key), normalize(value)))
        .collect();
    pairs.sort();
    pairs.join("&")
}

/// Builds the canonical header block and the matching signed-header list.
///
/// Only headers named in `headers_to_sign` (or [`DEFAULT_HEADERS_TO_SIGN`]
/// when `None` or empty) and `x-bce-*` headers take part. Values are trimmed and
/// headers with an empty value are skipped.
pub fn canonical_headers(
    headers: &Headers,
    headers_to_sign: Option<&[String]>,
) -> (String, Vec<String>) {
    let wanted: Vec<String> = match headers_to_sign {
        Some(names) if !names.is_empty() => {
            names.iter().map(|n| n.to_ascii_lowercase()).collect()
        }
        _ => DEFAULT_HEADERS_TO_SIGN.iter().map(|n| n.to_string()).collect(),
    };

    let mut lines: Vec<(String, String)> = headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            let name = name.to_ascii_lowercase();
            if name.starts_with(BCE_HEADER_PREFIX) || wanted.contains(&name) {
                Some((normalize(&name), normalize(value)))
            } else {
                None
            }
        })
        .collect();
    lines.sort();

    let canonical = lines
        .iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect::<Vec<_>>()
        .join("\n");
    let signed = lines.into_iter().map(|(name, _)| name).collect();

    (canonical, signed)
}

/// Builds the query string sent on the wire. Empty values become `key=`.
pub fn build_query_string(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", normalize(key), normalize(value)))
        .collect::<Vec<_>>()
        .join("&")
}
