//! HTTP transport seam for the host-does-IO pattern.
//!
//! # Design
//! The core describes every network call as a plain `HttpRequest` value and
//! hands it to a caller-supplied [`Transport`]. The core never opens a socket
//! itself, so it stays deterministic under test and works with whatever HTTP
//! client and async runtime the host already uses.
//!
//! Only `GET` with `Accept: application/json` is ever issued. Timeouts and
//! cancellation belong to the transport implementation.

use async_trait::async_trait;

use crate::error::TransportError;

/// HTTP method for a request. The content API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// A JSON `GET` for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }
}

/// Executes a request and returns the decoded JSON body.
///
/// Implementations map non-2xx statuses to [`TransportError::Http`] and
/// unparseable bodies to [`TransportError::InvalidJson`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_json(&self, request: HttpRequest) -> Result<serde_json::Value, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_request_accepts_json() {
        let req = HttpRequest::get("http://localhost:3000/api");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api");
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }
}
