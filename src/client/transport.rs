//! HTTP boundary of the client.
//!
//! Requests and responses are plain data. The executor builds an
//! `HttpRequest`, hands it to a `Transport`, and interprets the
//! `HttpResponse` it gets back. `ReqwestTransport` is the production
//! implementation; tests plug in their own.

use super::error::{
    ApiError, TRANSPORT_CONNECT_CODE, TRANSPORT_INVALID_REQUEST_CODE, TRANSPORT_OTHER_CODE,
    TRANSPORT_TIMEOUT_CODE,
};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method};
use std::fmt;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An outgoing request described as data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    /// Form-encoded body, only sent for POST.
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status code and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    InvalidRequest,
    Other,
}

/// Failure below the HTTP layer: nothing usable came back from the server.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_builder() {
            TransportErrorKind::InvalidRequest
        } else {
            TransportErrorKind::Other
        };
        TransportError::new(kind, err.to_string())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        let code = match err.kind {
            TransportErrorKind::Timeout => TRANSPORT_TIMEOUT_CODE,
            TransportErrorKind::Connect => TRANSPORT_CONNECT_CODE,
            TransportErrorKind::InvalidRequest => TRANSPORT_INVALID_REQUEST_CODE,
            TransportErrorKind::Other => TRANSPORT_OTHER_CODE,
        };
        ApiError::transport(code, err.message)
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Implementations must not interpret the status code; a 403 is an
/// `Ok(HttpResponse)` at this level.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        debug!("{} {}", method, request.url);

        let mut req_builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }
        if request.method == HttpMethod::Post {
            req_builder = req_builder.form(&request.form);
        }

        let response = req_builder.send().await?;
        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        let body = response.bytes().await?.to_vec();
        debug!("Response body length: {} bytes", body.len());

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_kinds_map_to_distinct_codes() {
        let codes: Vec<i32> = [
            TransportErrorKind::Timeout,
            TransportErrorKind::Connect,
            TransportErrorKind::InvalidRequest,
            TransportErrorKind::Other,
        ]
        .into_iter()
        .map(|kind| ApiError::from(TransportError::new(kind, "x")).code)
        .collect();

        assert_eq!(codes, vec![-2, -3, -4, -5]);
    }

    #[test]
    fn success_range_is_inclusive() {
        let ok = |status| HttpResponse { status, body: Vec::new() }.is_success();
        assert!(ok(200));
        assert!(ok(299));
        assert!(!ok(199));
        assert!(!ok(300));
        assert!(!ok(403));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: Url::parse("https://example.com/").unwrap(),
            headers: vec![("User-Agent".to_string(), "redsub-test".to_string())],
            form: Vec::new(),
        };
        assert_eq!(request.header("user-agent"), Some("redsub-test"));
        assert_eq!(request.header("authorization"), None);
    }
}
