//! Buffer, string and stream request bodies.

use super::{access_control_list, mock_client, sign_function};
use bos_http_client::{BosError, BosRequest, RequestBody};
use std::io::Cursor;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKET_ACL_PATH: &str = "/v1/no-such-bucket-name";

/// Mock that accepts an ACL upload the way the service answers it.
async fn mount_put_acl(server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path(BUCKET_ACL_PATH))
        .and(query_param("acl", ""))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-bce-request-id", "req-acl")
                .insert_header("x-bce-debug-id", "debug-acl")
                .insert_header("Date", "Wed, 15 Oct 2026 08:00:00 GMT")
                .insert_header("Server", "BWS"),
        )
        .mount(server)
        .await;
}

fn acl_request(body: impl Into<RequestBody>) -> BosRequest {
    BosRequest::put(BUCKET_ACL_PATH).param("acl", "").body(body)
}

fn assert_acl_response(response: &bos_http_client::BosResponse) {
    assert_eq!(response.status_code, 200);
    assert!(response.has_header("x-bce-request-id"));
    assert!(response.has_header("x-bce-debug-id"));
    assert!(response.has_header("content-length"));
    assert!(response.has_header("date"));
    assert!(response.has_header("server"));
    assert!(response.body.is_empty_object());
}

#[tokio::test]
async fn test_send_request_with_buffer_body() {
    let server = MockServer::start().await;
    mount_put_acl(&server).await;

    let payload = serde_json::to_vec(&access_control_list()).unwrap();
    let client = mock_client(&server);
    let response = client
        .send_request(acl_request(payload.clone()), Some(&sign_function))
        .await
        .unwrap();
    assert_acl_response(&response);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].body, payload);
    assert_eq!(
        received[0].headers.get("content-length").unwrap().to_str().unwrap(),
        payload.len().to_string()
    );
}

#[tokio::test]
async fn test_send_request_with_string_body() {
    let server = MockServer::start().await;
    mount_put_acl(&server).await;

    let payload = access_control_list().to_string();
    let client = mock_client(&server);
    let response = client
        .send_request(acl_request(payload.clone()), Some(&sign_function))
        .await
        .unwrap();
    assert_acl_response(&response);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].body, payload.as_bytes());
}

#[tokio::test]
async fn test_send_request_with_stream_body() {
    let server = MockServer::start().await;
    mount_put_acl(&server).await;

    let payload = access_control_list().to_string().into_bytes();
    let request = acl_request(RequestBody::from_reader(Cursor::new(payload.clone())))
        .header("Content-Length", payload.len().to_string());

    let client = mock_client(&server);
    let response = client
        .send_request(request, Some(&sign_function))
        .await
        .unwrap();
    assert_acl_response(&response);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].body, payload);
}

#[tokio::test]
async fn test_all_body_sources_send_the_same_bytes() {
    let server = MockServer::start().await;
    mount_put_acl(&server).await;

    let text = access_control_list().to_string();
    let bytes = text.clone().into_bytes();
    let client = mock_client(&server);

    client
        .send_request(acl_request(bytes.clone()), Some(&sign_function))
        .await
        .unwrap();
    client
        .send_request(acl_request(text.clone()), Some(&sign_function))
        .await
        .unwrap();
    client
        .send_request(
            acl_request(RequestBody::from_reader(Cursor::new(bytes.clone())))
                .header("content-length", bytes.len().to_string()),
            Some(&sign_function),
        )
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 3);
    for request in &received {
        assert_eq!(request.body, bytes);
    }
}

#[tokio::test]
async fn test_stream_body_without_content_length() {
    let server = MockServer::start().await;
    mount_put_acl(&server).await;

    let payload = access_control_list().to_string().into_bytes();
    let client = mock_client(&server);
    let err = client
        .send_request(
            acl_request(RequestBody::from_reader(Cursor::new(payload))),
            Some(&sign_function),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BosError::MissingContentLength));
    assert_eq!(err.to_string(), "No Content-Length is specified.");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_put_sends_zero_content_length() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/new-bucket"))
        .and(header("content-length", "0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client
        .send_request(BosRequest::put("/v1/new-bucket"), Some(&sign_function))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_then_put_bucket() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/scratch-bucket"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/scratch-bucket"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-bce-request-id", "req-put"))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let deleted = client
        .send_request(BosRequest::delete("/v1/scratch-bucket"), Some(&sign_function))
        .await
        .unwrap();
    assert_eq!(deleted.status_code, 204);
    assert!(deleted.body.is_empty_object());

    let created = client
        .send_request(BosRequest::put("/v1/scratch-bucket"), Some(&sign_function))
        .await
        .unwrap();
    assert_eq!(created.request_id(), Some("req-put"));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].method.as_str(), "DELETE");
    assert_eq!(received[1].method.as_str(), "PUT");
}
