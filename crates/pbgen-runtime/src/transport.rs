//! The transport seam: one request in, one decoded JSON document out.
//!
//! The runtime never talks to the network itself. A [`Transport`] receives
//! a fully built [`Request`] and the caller's cancellation token and is
//! responsible for the HTTP round trip, authentication and timeouts.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body.
///
/// `Absent` sends no body at all. `Json(json!({}))` sends an empty object,
/// which is not the same thing for every transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Absent,
    Json(Value),
}

impl Body {
    /// An explicit empty JSON object.
    pub fn empty() -> Self {
        Body::Json(Value::Object(Map::new()))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Body::Absent)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Absent => None,
        }
    }
}

/// A request against the store's REST API.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path with every segment already percent-encoded.
    pub path: String,
    /// Query parameters, unencoded, in insertion order.
    pub query: Vec<(String, String)>,
    pub body: Body,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Absent,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Value of the first query parameter named `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Percent-encoded query string without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Path plus query string, ready to append to a base URL.
    pub fn url_path(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }
}

/// A failed round trip, with the remote status code preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed with status {status}: {message}")]
pub struct TransportError {
    pub status: u16,
    pub message: String,
}

impl TransportError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Sends requests to the store.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one request and returns the decoded JSON response.
    ///
    /// Implementations should abandon the request once `ctx` is cancelled.
    async fn send(&self, ctx: &CancellationToken, request: Request)
        -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        ctx: &CancellationToken,
        request: Request,
    ) -> Result<Value, TransportError> {
        (**self).send(ctx, request).await
    }
}

/// `/api/collections/{collection}/records`
pub fn records_path(collection: &str) -> String {
    format!("/api/collections/{}/records", urlencoding::encode(collection))
}

/// `/api/collections/{collection}/records/{id}`
pub fn record_path(collection: &str, id: &str) -> String {
    format!("{}/{}", records_path(collection), urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_escape_segments() {
        assert_eq!(records_path("posts"), "/api/collections/posts/records");
        assert_eq!(
            record_path("my posts", "a/b?c"),
            "/api/collections/my%20posts/records/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_query_string() {
        let request = Request::new(Method::Get, "/x").with_query(vec![
            ("filter".to_string(), "title = 'a&b'".to_string()),
            ("page".to_string(), "2".to_string()),
        ]);
        assert_eq!(request.query_param("page"), Some("2"));
        assert_eq!(request.query_string(), "filter=title%20%3D%20%27a%26b%27&page=2");
        assert!(request.url_path().starts_with("/x?filter="));
        assert_eq!(Request::new(Method::Get, "/x").url_path(), "/x");
    }

    #[test]
    fn test_empty_body_is_not_absent() {
        let body = Body::empty();
        assert!(!body.is_absent());
        assert_eq!(body.as_json(), Some(&serde_json::json!({})));
        assert!(Body::Absent.as_json().is_none());
    }
}
