//! Request body conversion.

use crate::models::request::RequestBody;
use tokio_util::io::ReaderStream;

/// Turns a body source into a transport body.
///
/// Buffers and strings are sent in one piece; streams are read chunk by chunk
/// while the request is in flight.
pub(crate) fn into_transport_body(body: RequestBody) -> reqwest::Body {
    match body {
        RequestBody::Bytes(bytes) => reqwest::Body::from(bytes),
        RequestBody::Text(text) => reqwest::Body::from(text),
        RequestBody::Stream(reader) => reqwest::Body::wrap_stream(ReaderStream::new(reader)),
    }
}

/// The `Content-Length` to send when the caller did not set one.
///
/// `Ok(None)` means the header is left off (an empty GET or HEAD).
pub(crate) fn guess_content_length(
    body: Option<&RequestBody>,
    omit_when_empty: bool,
) -> Result<Option<u64>, super::BosError> {
    let length = match body {
        None => 0,
        Some(body) => body
            .known_length()
            .ok_or(super::BosError::MissingContentLength)?,
    };

    if length == 0 && omit_when_empty {
        Ok(None)
    } else {
        Ok(Some(length))
    }
}
