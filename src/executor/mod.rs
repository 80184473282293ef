//! HTTP request executor.
//!
//! [`HttpClient`] sends one [`BosRequest`] per call. It fills in the default
//! headers, asks the optional [`SignFunction`] for an `Authorization` value,
//! dispatches the request with reqwest and materializes the response.
//!
//! Every call resolves exactly once: with a [`BosResponse`] for a 2xx status,
//! or with a [`BosError`] for anything else.

pub mod body;
pub mod error;
mod receive;

pub use error::{BosError, TransportCode};

use crate::auth::canonical::{build_query_string, canonical_uri};
use crate::auth::{format_timestamp, SignFunction};
use crate::config::{ClientConfig, ConfigError};
use crate::models::request::{BosRequest, Headers, Params};
use crate::models::response::BosResponse;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tokio::io::AsyncWrite;

/// Default `Content-Type` of every request.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Client for one BOS endpoint.
///
/// Cloning is cheap; clones share the connection pool and configuration.
/// Concurrent calls are independent of each other.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
    base_url: String,
    host: String,
}

impl HttpClient {
    /// Creates a client for `config.endpoint`.
    ///
    /// # Returns
    ///
    /// `Err(BosError::Config)` if the configuration does not validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use bos_http_client::{ClientConfig, HttpClient};
    ///
    /// let client = HttpClient::new(ClientConfig::new("https://bj.bcebos.com")).unwrap();
    /// assert_eq!(client.host(), "bj.bcebos.com");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self, BosError> {
        config.validate()?;

        let endpoint = url::Url::parse(config.endpoint.trim())
            .map_err(|e| ConfigError::Invalid(format!("endpoint: {}", e)))?;
        let host_name = endpoint
            .host_str()
            .ok_or_else(|| ConfigError::Invalid("endpoint has no host".to_string()))?;
        // Url::port() is None for the scheme's default port
        let host = match endpoint.port() {
            Some(port) => format!("{}:{}", host_name, port),
            None => host_name.to_string(),
        };
        let base_url = config.endpoint.trim().trim_end_matches('/').to_string();

        let http = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            http,
            base_url,
            host,
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Value sent in the `Host` header.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Sends a request and materializes the response body.
    ///
    /// # Arguments
    ///
    /// * `request` - Method, path, body, headers and query parameters
    /// * `signer` - Computes the `Authorization` header; `None` sends the
    ///   request unsigned
    ///
    /// # Returns
    ///
    /// `Ok(BosResponse)` for a 2xx status. JSON bodies are parsed and an
    /// empty body becomes `{}`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bos_http_client::{BceSigner, BosRequest, ClientConfig, HttpClient};
    ///
    /// # async fn example() -> Result<(), bos_http_client::BosError> {
    /// let config = ClientConfig::new("https://bj.bcebos.com").with_credentials("ak", "sk");
    /// let client = HttpClient::new(config)?;
    ///
    /// let response = client
    ///     .send_request(BosRequest::get("/v1"), Some(&BceSigner::new()))
    ///     .await?;
    /// println!("owner: {:?}", response.body.get("owner"));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_request(
        &self,
        request: BosRequest,
        signer: Option<&dyn SignFunction>,
    ) -> Result<BosResponse, BosError> {
        self.dispatch(request, signer, None).await
    }

    /// Sends a request and writes the response body into `output`.
    ///
    /// On a 2xx status the body is copied to `output` as it arrives and the
    /// returned response carries the empty object `{}` as its body. Error
    /// responses are not written to `output`.
    pub async fn send_request_with_output<W>(
        &self,
        request: BosRequest,
        signer: Option<&dyn SignFunction>,
        output: &mut W,
    ) -> Result<BosResponse, BosError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.dispatch(request, signer, Some(output as &mut (dyn AsyncWrite + Unpin + Send)))
            .await
    }

    async fn dispatch(
        &self,
        request: BosRequest,
        signer: Option<&dyn SignFunction>,
        output: Option<&mut (dyn AsyncWrite + Unpin + Send)>,
    ) -> Result<BosResponse, BosError> {
        let mut headers = self.prepare_headers(&request)?;
        let BosRequest {
            method,
            path,
            body,
            params,
            ..
        } = request;

        if let Some(signer) = signer {
            let authorization = signer.sign(
                self.config.credentials.as_ref(),
                method,
                &path,
                &params,
                &headers,
            )?;
            set_header(&mut headers, "Authorization", authorization);
        }

        let url = self.request_url(&path, &params);
        log::debug!("sending {} {}", method, url);

        let mut builder = self
            .http
            .request(method.into(), url.as_str())
            .headers(to_header_map(&headers)?);
        if let Some(body) = body {
            builder = builder.body(body::into_transport_body(body));
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let err = BosError::from(err);
                log::warn!("{} {} failed: {}", method, url, err);
                return Err(err);
            }
        };
        log::debug!("{} {} -> {}", method, url, response.status());

        let result = receive::read_response(response, output).await;
        if let Err(err) = &result {
            log::warn!("{} {} failed: {}", method, url, err);
        }
        result
    }

    /// Builds the full header set, everything except `Authorization`.
    fn prepare_headers(&self, request: &BosRequest) -> Result<Headers, BosError> {
        let mut headers = Headers::new();
        headers.insert("x-bce-date".to_string(), format_timestamp(&Utc::now()));
        headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
        headers.insert("Host".to_string(), self.host.clone());
        headers.insert("User-Agent".to_string(), self.config.user_agent.clone());

        for (name, value) in &request.headers {
            set_header(&mut headers, name, value.clone());
        }

        if request.header_value("Content-Length").is_none() {
            let length = body::guess_content_length(
                request.body.as_ref(),
                request.method.omits_empty_content_length(),
            )?;
            if let Some(length) = length {
                headers.insert("Content-Length".to_string(), length.to_string());
            }
        }

        if let Some(token) = &self.config.session_token {
            set_header(&mut headers, "x-bce-security-token", token.clone());
        }

        Ok(headers)
    }

    /// Endpoint plus the path in its signed (segment-encoded) form, so the
    /// request line names the same resource the signature covers.
    fn request_url(&self, path: &str, params: &Params) -> String {
        let path = canonical_uri(path);
        let query = build_query_string(params);
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }
}

/// Inserts a header, dropping any existing header of the same name in a
/// different case.
fn set_header(headers: &mut Headers, name: &str, value: String) {
    headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value);
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap, BosError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| BosError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| BosError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
