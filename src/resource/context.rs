//! Request context and query structures for SCIM operations.

use uuid::Uuid;

/// Request context for SCIM operations.
///
/// Carries the request id used to correlate log lines across the dispatcher, the
/// server and the resource provider.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request
    pub request_id: String,
}

impl RequestContext {
    /// Create a new request context with a specific request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Create a new request context with a generated request ID.
    pub fn with_generated_id() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}

/// Query parameters for listing resources.
///
/// Pagination values arrive already clamped: `start_index` is at least 1 and `count`
/// never exceeds the server's configured maximum. `filter` is the raw SCIM filter
/// expression; interpreting it is up to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based index of the first result
    pub start_index: usize,
    /// Maximum number of results to return
    pub count: usize,
    pub filter: Option<String>,
}

impl ListQuery {
    pub fn new(start_index: usize, count: usize) -> Self {
        Self {
            start_index: start_index.max(1),
            count,
            filter: None,
        }
    }

    /// Set a filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Zero-based offset of the first result.
    pub fn offset(&self) -> usize {
        self.start_index.saturating_sub(1)
    }
}
