use super::{status_error, Body, Method, RemoteClient, Response};
use crate::error::{Result, RuntimeError};
use std::cell::RefCell;
use std::collections::HashMap;

/// A request as seen by [`MemoryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Body,
}

/// Scripted client for tests.
///
/// Uses `RefCell` for interior mutability since the CLI is single-threaded and
/// the [`RemoteClient`] trait takes `&self`.
///
/// Requests without a scripted answer get `200` with an empty JSON object.
#[derive(Default)]
pub struct MemoryClient {
    responses: RefCell<HashMap<(Method, String), (u16, Vec<u8>)>>,
    requests: RefCell<Vec<RecordedRequest>>,
    simulate_network_error: RefCell<bool>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `status` and `body`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.responses
            .borrow_mut()
            .insert((method, path.to_string()), (status, body.into()));
    }

    /// Make every request fail as if the network was down.
    pub fn set_simulate_network_error(&self, simulate: bool) {
        *self.simulate_network_error.borrow_mut() = simulate;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }

    fn handle(&self, method: Method, path: &str, body: Body) -> Result<Response> {
        self.requests.borrow_mut().push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });

        if *self.simulate_network_error.borrow() {
            return Err(RuntimeError::Transport {
                method: method.as_str(),
                path: path.to_string(),
                status: None,
                message: "simulated network error".to_string(),
            });
        }

        let (status, body) = self
            .responses
            .borrow()
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or_else(|| (200, b"{}".to_vec()));

        if !(200..300).contains(&status) {
            return Err(status_error(method, path, status, &body));
        }
        Ok(Response::new(status, body))
    }
}

impl RemoteClient for MemoryClient {
    fn get(&self, path: &str) -> Result<Response> {
        self.handle(Method::Get, path, Body::Empty)
    }

    fn put(&self, path: &str, body: Body) -> Result<Response> {
        self.handle(Method::Put, path, body)
    }

    fn post(&self, path: &str, body: Body) -> Result<Response> {
        self.handle(Method::Post, path, body)
    }

    fn delete(&self, path: &str) -> Result<Response> {
        self.handle(Method::Delete, path, Body::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_requests_in_order() {
        let client = MemoryClient::new();
        client.get("a").unwrap();
        client.post("b", Body::Binary(vec![1, 2, 3])).unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[1].path, "b");
        assert_eq!(requests[1].body, Body::Binary(vec![1, 2, 3]));
    }

    #[test]
    fn test_scripted_error_status() {
        let client = MemoryClient::new();
        client.respond(Method::Delete, "x", 403, r#"{"message":"Forbidden"}"#);

        let err = client.delete("x").unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("Forbidden"));
    }

    #[test]
    fn test_simulated_network_error_still_records() {
        let client = MemoryClient::new();
        client.set_simulate_network_error(true);

        assert!(client.get("y").is_err());
        assert_eq!(client.requests().len(), 1);
    }
}
