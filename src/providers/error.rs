//! Error types for resource provider implementations.
//!
//! Providers report outcomes in these terms; the dispatcher maps them onto HTTP
//! status codes (`ResourceNotFound` → 404, `DuplicateAttribute` and `Conflict` → 409,
//! `PatchFailed`, `InvalidFilter` and `InvalidResult` → 400, `Internal` → 500).
//! `Internal` details are logged, never rendered on the wire.

use crate::error::ValidationError;
use thiserror::Error;

/// Errors that can occur during resource provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Resource not found: {resource_type} with id '{id}'")]
    ResourceNotFound {
        /// The type of resource that was not found
        resource_type: String,
        id: String,
    },

    #[error("Duplicate attribute '{attribute}' with value '{value}' for {resource_type}")]
    DuplicateAttribute {
        resource_type: String,
        /// The name of the attribute that must be unique
        attribute: String,
        value: String,
    },

    /// Concurrent modification detected by the provider
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Filter expression the provider cannot evaluate
    #[error("Invalid filter: {message}")]
    InvalidFilter { message: String },

    #[error("Patch operation failed: {message}")]
    PatchFailed { message: String },

    /// Applying a PATCH would leave the resource out of conformance with its schema
    #[error("Patched resource is invalid: {0}")]
    InvalidResult(ValidationError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ProviderError {
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn patch_failed(message: impl Into<String>) -> Self {
        Self::PatchFailed {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
