//! Wire-level request description.

use http::Method;
use serde_json::Value;

/// Body of a request to the engine.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// A JSON document body.
    Json(Value),
    /// Newline-delimited JSON, used by the bulk endpoint.
    NdJson(String),
}

/// A request to the engine.
///
/// Operations build one of these and hand it to the client for dispatch.
/// Errors reported by the engine carry the request back to the caller so
/// retry/log/abort decisions can be made with full context.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl Request {
    /// Create a request for the given method and engine path.
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Attach a JSON body.
    pub(crate) fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attach a newline-delimited JSON body.
    pub(crate) fn ndjson(mut self, payload: String) -> Self {
        self.body = Some(RequestBody::NdJson(payload));
        self
    }

    /// Add a query-string parameter.
    pub(crate) fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The engine path, without the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query-string parameters.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}
