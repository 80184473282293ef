//! Integration tests module for the BOS HTTP client
//!
//! Shared fixtures: a logger, mock-server backed clients, and the ACL
//! document used by the request body tests.

pub mod output_stream_test;
pub mod request_body_test;

use bos_http_client::{
    Auth, AuthError, ClientConfig, Credentials, Headers, HttpClient, HttpMethod, Params,
};
use serde_json::{json, Value};
use std::sync::Once;
use wiremock::MockServer;

static INIT: Once = Once::new();

pub const TEST_AK: &str = "992c67ee10be4e85bf444d18b638f9ba";
pub const TEST_SK: &str = "b4f9d0a4a0a34cd49e0e9a4c9bd8b3c1";
pub const TEST_ACCOUNT: &str = "992c67ee10be4e85bf444d18b638f9ba";

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Client pointed at the mock server, with test credentials.
pub fn mock_client(server: &MockServer) -> HttpClient {
    init_test_env();
    let config = ClientConfig::new(server.uri()).with_credentials(TEST_AK, TEST_SK);
    HttpClient::new(config).expect("mock endpoint is valid")
}

/// Signer in the shape callers usually write: a closure over `Auth`.
pub fn sign_function(
    credentials: Option<&Credentials>,
    method: HttpMethod,
    path: &str,
    params: &Params,
    headers: &Headers,
) -> Result<String, AuthError> {
    let credentials = credentials
        .ok_or_else(|| AuthError::MissingCredentials("test client has none".to_string()))?;
    let mut options = bos_http_client::SigningOptions::default();
    options.timestamp = headers
        .get("x-bce-date")
        .and_then(|v| chrono::DateTime::parse_from_rfc3339(v).ok())
        .map(|d| d.with_timezone(&chrono::Utc));
    Auth::from_credentials(credentials.clone())
        .generate_authorization_with(method, path, params, headers, &options)
}

/// The ACL document the body tests upload.
pub fn access_control_list() -> Value {
    json!({
        "accessControlList": [
            {
                "grantee": [
                    {"id": "992c67ee10be4e85bf444d18b638f9ba"},
                    {"id": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"}
                ],
                "permission": ["FULL_CONTROL"]
            }
        ]
    })
}
