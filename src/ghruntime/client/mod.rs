//! # Transport Layer
//!
//! Commands talk to the backend through the [`RemoteClient`] trait, so the same
//! command code runs against the real API or a scripted one.
//!
//! ## Implementations
//!
//! - [`http::HttpClient`]: production client over HTTPS (blocking `reqwest`).
//! - [`memory::MemoryClient`]: records requests and serves canned responses.
//!   No network, used by tests.
//!
//! Request and response bodies are JSON, except the deploy upload which is the
//! raw archive bytes.
//!
//! There are no retries and no token refresh: a failed call is
//! reported once as [`RuntimeError::Transport`] and the invocation ends.

use crate::error::{Result, RuntimeError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

pub mod http;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Json(Vec<u8>),
    Binary(Vec<u8>),
}

impl Body {
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Body::Json(serde_json::to_vec(value)?))
    }

    pub fn len(&self) -> usize {
        match self {
            Body::Empty => 0,
            Body::Json(bytes) | Body::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Minimal REST surface the commands need.
///
/// `path` is relative to the API base URL and may carry a query string.
/// Implementations return `Err(RuntimeError::Transport { .. })` for network
/// failures and non-2xx answers alike.
pub trait RemoteClient {
    fn get(&self, path: &str) -> Result<Response>;

    fn put(&self, path: &str, body: Body) -> Result<Response>;

    fn post(&self, path: &str, body: Body) -> Result<Response>;

    fn delete(&self, path: &str) -> Result<Response>;
}

/// Path of the deployment resource of `app`.
pub fn deployment_path(app: &str) -> String {
    format!("runtime/{}/deployment", app)
}

/// Append URL-encoded query parameters to `path`.
///
/// Parameters with empty values are dropped and the rest are sorted by key, so
/// the same options always produce the same URL.
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let mut params: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    if params.is_empty() {
        return path.to_string();
    }
    params.sort_by(|a, b| a.0.cmp(b.0));

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    format!("{}?{}", path, query.finish())
}

/// Build a transport error from a server answer.
///
/// Prefers the `message` field of a JSON error body, falling back to the raw
/// text.
pub(crate) fn status_error(method: Method, path: &str, status: u16, body: &[u8]) -> RuntimeError {
    let detail = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    let message = if detail.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, detail)
    };

    RuntimeError::Transport {
        method: method.as_str(),
        path: path.to_string(),
        status: Some(status),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_without_params() {
        assert_eq!(with_query("runtime/a/deployment", &[]), "runtime/a/deployment");
        assert_eq!(
            with_query("runtime/a/deployment", &[("revision_name", "")]),
            "runtime/a/deployment"
        );
    }

    #[test]
    fn test_with_query_sorts_and_encodes() {
        let path = with_query(
            "runtime/a/deployment/bundle",
            &[("revision_name", "v1 beta"), ("revision", "abc123")],
        );
        assert_eq!(
            path,
            "runtime/a/deployment/bundle?revision=abc123&revision_name=v1+beta"
        );
    }

    #[test]
    fn test_response_json_empty_body_is_null() {
        let resp = Response::new(204, Vec::new());
        let value: serde_json::Value = resp.json().unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_status_error_prefers_message_field() {
        let err = status_error(
            Method::Get,
            "runtime/x/deployment",
            404,
            br#"{"message": "Not Found", "documentation_url": "..."}"#,
        );
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "GET runtime/x/deployment failed: HTTP 404: Not Found"
        );
    }

    #[test]
    fn test_status_error_raw_body() {
        let err = status_error(Method::Post, "p", 502, b"bad gateway\n");
        assert_eq!(err.to_string(), "POST p failed: HTTP 502: bad gateway");

        let err = status_error(Method::Delete, "p", 500, b"");
        assert_eq!(err.to_string(), "DELETE p failed: HTTP 500");
    }
}
