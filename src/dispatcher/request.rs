//! Transport-neutral SCIM requests.

use crate::error::{ScimError, ScimResult};
use http::Method;
use serde_json::Value;
use url::form_urlencoded;

/// A SCIM request as seen by the dispatcher.
///
/// Any HTTP framework can build one: the method, the path below the SCIM base (with
/// or without the `/v2` prefix), the raw query string and the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScimRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
    pub body: Vec<u8>,
    /// Correlation id for logging; generated when absent
    pub request_id: Option<String>,
}

impl ScimRequest {
    /// Create a request for `target`, a path optionally followed by `?query`.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            body: Vec::new(),
            request_id: None,
        }
    }

    pub fn get(target: &str) -> Self {
        Self::new(Method::GET, target)
    }

    pub fn delete(target: &str) -> Self {
        Self::new(Method::DELETE, target)
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Use a JSON document as the body.
    pub fn with_json(self, body: &Value) -> Self {
        self.with_body(body.to_string())
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// First value of a query parameter. Names compare case-insensitively.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.into_owned())
    }

    /// Decode the body as JSON. An empty or malformed body is `invalidSyntax`.
    pub fn json_body(&self) -> ScimResult<Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Err(ScimError::invalid_syntax("Request body is empty"));
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| ScimError::invalid_syntax(format!("Request body is not valid JSON: {e}")))
    }
}
