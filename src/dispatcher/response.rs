//! SCIM responses and message envelopes.

use crate::error::ScimError;
use crate::schema_discovery::to_value;
use http::header::{CONTENT_TYPE, ETAG, HeaderName, LOCATION};
use http::{HeaderMap, HeaderValue, StatusCode};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const SCIM_CONTENT_TYPE: &str = "application/scim+json";
pub const ERROR_URN: &str = "urn:ietf:params:scim:api:messages:2.0:Error";
pub const LIST_RESPONSE_URN: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

/// A response produced by the dispatcher. Every response carries the SCIM content
/// type; 204 responses have no body.
#[derive(Debug, Clone, PartialEq)]
pub struct ScimResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ScimResponse {
    pub fn json(status: StatusCode, body: Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SCIM_CONTENT_TYPE));
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SCIM_CONTENT_TYPE));
        Self {
            status: StatusCode::NO_CONTENT,
            headers,
            body: None,
        }
    }

    /// The RFC 7644 error envelope for `error`.
    pub fn error(error: &ScimError) -> Self {
        let status = error.status_code();
        let body = ErrorBody {
            schemas: vec![ERROR_URN.to_string()],
            status: status.as_u16().to_string(),
            scim_type: error.scim_type().map(|t| t.to_string()),
            detail: error.detail(),
        };
        let envelope = to_value(&body).unwrap_or_else(|e| {
            warn!("Rendering {status} error envelope by hand: {e}");
            json!({"schemas": [ERROR_URN], "status": body.status, "detail": body.detail})
        });
        Self::json(status, envelope)
    }

    /// Add a header. Values that are not valid header text are skipped.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(_) => warn!("Skipping {name} header with invalid value '{value}'"),
        }
        self
    }

    pub fn with_location(self, location: &str) -> Self {
        self.with_header(LOCATION, location)
    }

    pub fn with_etag(self, version: &str) -> Self {
        self.with_header(ETAG, version)
    }

    /// Header value as text, if present and printable.
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Serialized body; empty for 204.
    pub fn body_bytes(&self) -> Vec<u8> {
        self.body
            .as_ref()
            .map(|body| body.to_string().into_bytes())
            .unwrap_or_default()
    }
}

/// `urn:ietf:params:scim:api:messages:2.0:Error`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub schemas: Vec<String>,
    /// HTTP status code as a string, e.g. `"400"`
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scim_type: Option<String>,
    pub detail: String,
}

/// `urn:ietf:params:scim:api:messages:2.0:ListResponse`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub schemas: Vec<String>,
    pub total_results: usize,
    pub items_per_page: usize,
    pub start_index: usize,
    #[serde(rename = "Resources")]
    pub resources: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(total_results: usize, start_index: usize, resources: Vec<T>) -> Self {
        Self {
            schemas: vec![LIST_RESPONSE_URN.to_string()],
            total_results,
            items_per_page: resources.len(),
            start_index,
            resources,
        }
    }
}
