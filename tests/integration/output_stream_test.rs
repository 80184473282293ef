//! Copying response bodies into caller-provided sinks.

use super::{mock_client, sign_function, TEST_ACCOUNT};
use bos_http_client::BosRequest;
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_send_request_with_output_stream() {
    let server = MockServer::start().await;
    let listing = json!({
        "owner": {"id": TEST_ACCOUNT, "displayName": "test"},
        "buckets": []
    });
    Mock::given(method("GET"))
        .and(path("/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-bce-request-id", "req-out")
                .set_body_raw(listing.to_string(), "application/json; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let mut sink: Vec<u8> = Vec::new();
    let response = client
        .send_request_with_output(BosRequest::get("/v1"), Some(&sign_function), &mut sink)
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.body.is_empty_object());
    assert_eq!(response.request_id(), Some("req-out"));

    assert!(!sink.is_empty());
    let written: Value = serde_json::from_slice(&sink).unwrap();
    assert_eq!(written["owner"]["id"], TEST_ACCOUNT);
}

#[tokio::test]
async fn test_output_stream_receives_binary_payload() {
    let server = MockServer::start().await;
    let payload: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    Mock::given(method("GET"))
        .and(path("/v1/bucket/object.bin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(payload.clone(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("object.bin");
    let mut file = tokio::fs::File::create(&file_path).await.unwrap();

    let client = mock_client(&server);
    let response = client
        .send_request_with_output(
            BosRequest::get("/v1/bucket/object.bin"),
            Some(&sign_function),
            &mut file,
        )
        .await
        .unwrap();
    drop(file);

    assert_eq!(
        response.header("content-length"),
        Some(payload.len().to_string().as_str())
    );
    assert!(response.body.is_empty_object());

    let mut written = Vec::new();
    tokio::fs::File::open(&file_path)
        .await
        .unwrap()
        .read_to_end(&mut written)
        .await
        .unwrap();
    assert_eq!(written, payload);
}

#[tokio::test]
async fn test_error_response_is_not_written_to_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_raw(
            r#"{"code":"AccessDenied","message":"Access denied.","requestId":"req-403"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let mut sink: Vec<u8> = Vec::new();
    let err = client
        .send_request_with_output(BosRequest::get("/v1"), Some(&sign_function), &mut sink)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert_eq!(err.code(), Some("AccessDenied"));
    assert!(sink.is_empty());
}
