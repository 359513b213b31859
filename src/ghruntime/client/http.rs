use super::{status_error, Body, Method, RemoteClient, Response};
use crate::config::ClientConfig;
use crate::error::{Result, RuntimeError};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, warn};

const ACCEPT_JSON: &str = "application/vnd.github+json";
const CONTENT_JSON: &str = "application/json";
const CONTENT_BUNDLE: &str = "application/zip";

/// Blocking HTTPS client for the runtime API.
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.token.is_none() {
            warn!("no GH_TOKEN or GITHUB_TOKEN set, sending unauthenticated requests");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RuntimeError::Transport {
                method: "INIT",
                path: config.base_url.clone(),
                status: None,
                message: format!("error creating REST client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, method: Method, path: &str, body: Body) -> Result<Response> {
        let url = self.url(path);
        debug!(%method, %url, bytes = body.len(), "sending request");

        let request = match method {
            Method::Get => self.client.get(&url),
            Method::Put => self.client.put(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        let request = self.decorate(request, body);

        let response = request.send().map_err(|e| RuntimeError::Transport {
            method: method.as_str(),
            path: path.to_string(),
            status: None,
            message: e.to_string(),
        })?;

        let status = response.status();
        let bytes = response.bytes().map_err(|e| RuntimeError::Transport {
            method: method.as_str(),
            path: path.to_string(),
            status: Some(status.as_u16()),
            message: format!("error reading response body: {}", e),
        })?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "response received");

        if !status.is_success() {
            return Err(status_error(method, path, status.as_u16(), &bytes));
        }
        Ok(Response::new(status.as_u16(), bytes.to_vec()))
    }

    fn decorate(&self, request: RequestBuilder, body: Body) -> RequestBuilder {
        let mut request = request
            .header(ACCEPT, ACCEPT_JSON)
            .header(USER_AGENT, concat!("gh-runtime/", env!("CARGO_PKG_VERSION")));

        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        match body {
            Body::Empty => request,
            Body::Json(bytes) => request.header(CONTENT_TYPE, CONTENT_JSON).body(bytes),
            Body::Binary(bytes) => request.header(CONTENT_TYPE, CONTENT_BUNDLE).body(bytes),
        }
    }
}

impl RemoteClient for HttpClient {
    fn get(&self, path: &str) -> Result<Response> {
        self.send(Method::Get, path, Body::Empty)
    }

    fn put(&self, path: &str, body: Body) -> Result<Response> {
        self.send(Method::Put, path, body)
    }

    fn post(&self, path: &str, body: Body) -> Result<Response> {
        self.send(Method::Post, path, body)
    }

    fn delete(&self, path: &str) -> Result<Response> {
        self.send(Method::Delete, path, Body::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(ClientConfig {
            base_url: base.to_string(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let c = client("https://api.github.com/");
        assert_eq!(
            c.url("runtime/app/deployment"),
            "https://api.github.com/runtime/app/deployment"
        );
        assert_eq!(
            c.url("/runtime/app/deployment?revision=1"),
            "https://api.github.com/runtime/app/deployment?revision=1"
        );
    }

    #[test]
    fn test_connection_failure_is_transport_error() {
        // Port 9 (discard) is closed on any sane test host.
        let c = client("http://127.0.0.1:9/");
        let err = c.get("runtime/app/deployment").unwrap_err();
        match err {
            RuntimeError::Transport {
                method,
                path,
                status,
                ..
            } => {
                assert_eq!(method, "GET");
                assert_eq!(path, "runtime/app/deployment");
                assert_eq!(status, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
