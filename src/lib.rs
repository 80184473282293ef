//! Signed HTTP client for the BOS object storage REST API.
//!
//! This crate sends single requests to a BOS endpoint, signs them with the
//! bce-auth-v1 scheme, and turns the responses into typed results.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **models**: Request and response data structures
//! - **auth**: Credentials, the bce-auth-v1 signer and the `SignFunction` seam
//! - **executor**: `HttpClient`, which builds, signs, sends and materializes requests
//! - **config**: Client configuration and its loaders (JSON, file, environment)
//!
//! # Request flow
//!
//! `HttpClient::send_request`:
//! 1. Merges the default headers (`x-bce-date`, `Content-Type`, `Host`,
//!    `User-Agent`, `Content-Length`) with the caller's headers
//! 2. Asks the signer, if any, for the `Authorization` header
//! 3. Sends the request with the body taken from a buffer, a string or a
//!    byte stream
//! 4. Lower-cases the response headers and parses the body as JSON, or
//!    copies it into the caller's output sink
//! 5. Returns the response for 2xx statuses and a `BosError` otherwise
//!
//! # Usage
//!
//! ```no_run
//! use bos_http_client::{BceSigner, BosRequest, ClientConfig, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://bj.bcebos.com").with_credentials("my-ak", "my-sk");
//! let client = HttpClient::new(config)?;
//! let signer = BceSigner::new();
//!
//! // List buckets
//! let response = client.send_request(BosRequest::get("/v1"), Some(&signer)).await?;
//! println!("{:?}", response.body.get("buckets"));
//!
//! // Set a bucket ACL from a string body
//! let acl = r#"{"accessControlList":[{"grantee":[{"id":"*"}],"permission":["READ"]}]}"#;
//! client
//!     .send_request(BosRequest::put("/v1/my-bucket").param("acl", "").body(acl), Some(&signer))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod executor;
pub mod models;

pub use auth::{Auth, AuthError, BceSigner, Credentials, SignFunction, SigningOptions};
pub use config::{ClientConfig, ConfigError};
pub use executor::{BosError, HttpClient, TransportCode};
pub use models::{BosRequest, BosResponse, Headers, HttpMethod, Params, RequestBody, ResponseBody};
