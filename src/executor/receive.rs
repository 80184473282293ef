//! Response materialization.

use super::BosError;
use crate::models::response::{normalize_headers, BosResponse, ResponseBody, ServiceErrorBody};
use bytes::Bytes;
use reqwest::StatusCode;
use std::collections::HashMap;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Reads a response into a [`BosResponse`], or into `output` when given.
///
/// Non-2xx statuses always become [`BosError::Http`]; their body is read and
/// never written to `output`.
pub(crate) async fn read_response(
    mut response: reqwest::Response,
    output: Option<&mut (dyn AsyncWrite + Unpin + Send)>,
) -> Result<BosResponse, BosError> {
    let status = response.status();
    let http_headers = normalize_headers(
        response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v))),
    );

    if !status.is_success() {
        // an unreadable error body still yields the HTTP error
        let payload = match response.bytes().await {
            Ok(payload) => payload,
            Err(err) => {
                log::debug!("failed to read {} error body: {}", status, err);
                Bytes::new()
            }
        };
        return Err(http_error(status, &http_headers, &payload));
    }

    if let Some(output) = output {
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await? {
            output.write_all(&chunk).await?;
            written += chunk.len();
        }
        output.flush().await?;
        log::debug!("wrote {} response bytes to output sink", written);

        return Ok(BosResponse {
            status_code: status.as_u16(),
            http_headers,
            body: ResponseBody::empty(),
        });
    }

    let payload = response.bytes().await?;
    let body = ResponseBody::from_payload(
        http_headers.get("content-type").map(String::as_str),
        payload,
    )?;

    Ok(BosResponse {
        status_code: status.as_u16(),
        http_headers,
        body,
    })
}

/// Builds the error for a non-2xx response from its (possibly empty) body.
fn http_error(
    status: StatusCode,
    http_headers: &HashMap<String, String>,
    payload: &[u8],
) -> BosError {
    let service_error = ServiceErrorBody::parse(payload);
    let message = service_error.message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string()
    });
    let request_id = service_error
        .request_id
        .or_else(|| http_headers.get("x-bce-request-id").cloned());

    BosError::Http {
        status_code: status.as_u16(),
        code: service_error.code,
        message,
        request_id,
    }
}
