//! Error types for SCIM server operations.
//!
//! Three layers of failure are kept apart:
//!
//! - [`SchemaDefinitionError`] is raised while schemas and resource types are being
//!   built. It never occurs while handling a request; the server refuses to start.
//! - [`ValidationError`] is returned by the validation engine when a request payload
//!   does not conform to its schema.
//! - [`ScimError`] is the request-level error the dispatcher renders into the SCIM
//!   error envelope. Each variant knows its HTTP status and `scimType`.

use crate::providers::ProviderError;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Main error type for SCIM request handling.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// Request payload does not conform to the resource type's schema
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Errors reported by the storage collaborator
    #[error("Resource provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Request body is not well-formed JSON or not a well-formed SCIM message
    #[error("Invalid syntax: {message}")]
    InvalidSyntax { message: String },

    /// A PATCH path or query parameter does not resolve to a known attribute
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// A PATCH operation names no target where one is needed
    #[error("No target: {message}")]
    NoTarget { message: String },

    /// A value is well-formed but not acceptable
    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    /// Resource identifier or discovery entry does not exist
    #[error("Resource not found: {resource_type} with ID {id}")]
    ResourceNotFound { resource_type: String, id: String },

    /// No route matches the request path
    #[error("No SCIM endpoint at {path}")]
    EndpointNotFound { path: String },

    /// The route exists but not for this method
    #[error("Method {method} is not supported on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Operation the protocol defines but this server does not implement
    #[error("{feature} is not implemented")]
    NotImplemented { feature: String },

    /// Request is well-formed but not permitted on this endpoint
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Internal server errors
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Validation errors produced by the schema validation engine.
///
/// Every variant carries the dotted attribute path (e.g. `emails.value`) so the
/// dispatcher can render a precise error detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The top-level payload is not a JSON object
    #[error("Resource must be a JSON object, got {actual}")]
    InvalidResource { actual: String },

    /// A required attribute (or a required multi-valued attribute with no elements) is absent
    #[error("Required attribute '{path}' is missing")]
    AttributeMissing { path: String },

    /// Two keys of one object fold to the same case-insensitive name
    #[error("Attribute '{path}' is given more than once (names are case-insensitive)")]
    DuplicateAttributeName { path: String },

    /// The value's shape does not match the declared kind
    #[error("Attribute '{path}' has invalid type, expected {expected}, got {actual}")]
    InvalidType {
        path: String,
        expected: String,
        actual: String,
    },
}

/// Errors raised while constructing schemas or registering resource types.
///
/// These represent programming errors in the deployed configuration, never
/// untrusted input. Callers at startup treat any of them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaDefinitionError {
    /// Attribute name does not match `[A-Za-z][A-Za-z0-9_-]*`
    #[error("Invalid attribute name '{name}'")]
    InvalidAttributeName { name: String },

    /// Two attributes at the same level fold to the same case-insensitive name
    #[error("Attribute name '{name}' collides with '{existing}' in '{scope}'")]
    DuplicateAttributeName {
        scope: String,
        name: String,
        existing: String,
    },

    /// A schema id is registered twice
    #[error("Schema '{id}' is defined more than once")]
    DuplicateSchema { id: String },

    /// Schema document is structurally impossible
    #[error("Invalid schema definition in '{scope}': {message}")]
    InvalidDefinition { scope: String, message: String },
}

/// Errors that can occur during server building/configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A schema or attribute definition is malformed
    #[error("Invalid schema definition: {0}")]
    Schema(#[from] SchemaDefinitionError),

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Two resource types claim the same endpoint or id
    #[error("Resource type '{name}' conflicts with an existing registration")]
    DuplicateResourceType { name: String },
}

/// SCIM error types as defined in RFC 7644 Section 3.12.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScimErrorType {
    InvalidFilter,
    TooMany,
    Uniqueness,
    Mutability,
    InvalidSyntax,
    InvalidPath,
    NoTarget,
    InvalidValue,
    InvalidVers,
    Sensitive,
}

impl ScimErrorType {
    /// Wire representation used in the `scimType` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScimErrorType::InvalidFilter => "invalidFilter",
            ScimErrorType::TooMany => "tooMany",
            ScimErrorType::Uniqueness => "uniqueness",
            ScimErrorType::Mutability => "mutability",
            ScimErrorType::InvalidSyntax => "invalidSyntax",
            ScimErrorType::InvalidPath => "invalidPath",
            ScimErrorType::NoTarget => "noTarget",
            ScimErrorType::InvalidValue => "invalidValue",
            ScimErrorType::InvalidVers => "invalidVers",
            ScimErrorType::Sensitive => "sensitive",
        }
    }
}

impl std::fmt::Display for ScimErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScimError {
    /// Create a resource not found error
    pub fn resource_not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create an invalid syntax error
    pub fn invalid_syntax(message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScimError::Validation(_)
            | ScimError::InvalidSyntax { .. }
            | ScimError::InvalidPath { .. }
            | ScimError::NoTarget { .. }
            | ScimError::InvalidValue { .. } => StatusCode::BAD_REQUEST,
            ScimError::Provider(provider_error) => match provider_error {
                ProviderError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
                ProviderError::DuplicateAttribute { .. } | ProviderError::Conflict { .. } => {
                    StatusCode::CONFLICT
                }
                ProviderError::PatchFailed { .. }
                | ProviderError::InvalidFilter { .. }
                | ProviderError::InvalidResult(_) => StatusCode::BAD_REQUEST,
                ProviderError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ScimError::ResourceNotFound { .. } | ScimError::EndpointNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ScimError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ScimError::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            ScimError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ScimError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// SCIM error type for this error, when RFC 7644 defines one.
    pub fn scim_type(&self) -> Option<ScimErrorType> {
        match self {
            ScimError::Validation(ValidationError::InvalidResource { .. }) => {
                Some(ScimErrorType::InvalidSyntax)
            }
            ScimError::Validation(_)
            | ScimError::InvalidValue { .. }
            | ScimError::Provider(ProviderError::InvalidResult(_)) => {
                Some(ScimErrorType::InvalidValue)
            }
            ScimError::InvalidSyntax { .. } => Some(ScimErrorType::InvalidSyntax),
            ScimError::InvalidPath { .. } => Some(ScimErrorType::InvalidPath),
            ScimError::NoTarget { .. } => Some(ScimErrorType::NoTarget),
            ScimError::Provider(ProviderError::DuplicateAttribute { .. }) => {
                Some(ScimErrorType::Uniqueness)
            }
            ScimError::Provider(ProviderError::PatchFailed { .. }) => Some(ScimErrorType::NoTarget),
            ScimError::Provider(ProviderError::InvalidFilter { .. }) => {
                Some(ScimErrorType::InvalidFilter)
            }
            _ => None,
        }
    }

    /// Human-readable detail placed on the wire.
    ///
    /// Internal failures are reduced to a generic message; their cause is logged
    /// by the dispatcher instead.
    pub fn detail(&self) -> String {
        match self {
            ScimError::Internal { .. } | ScimError::Provider(ProviderError::Internal { .. }) => {
                "An internal error occurred while processing the request".to_string()
            }
            ScimError::Validation(validation_error) => validation_error.to_string(),
            ScimError::Provider(provider_error) => provider_error.to_string(),
            other => other.to_string(),
        }
    }
}

impl ValidationError {
    /// Create a missing required attribute error
    pub fn missing(path: impl Into<String>) -> Self {
        Self::AttributeMissing { path: path.into() }
    }

    /// Create a duplicate attribute name error
    pub fn duplicate(path: impl Into<String>) -> Self {
        Self::DuplicateAttributeName { path: path.into() }
    }

    /// Create an invalid type error
    pub fn invalid_type(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Attribute path the error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidResource { .. } => None,
            ValidationError::AttributeMissing { path }
            | ValidationError::DuplicateAttributeName { path }
            | ValidationError::InvalidType { path, .. } => Some(path),
        }
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type DefinitionResult<T> = Result<T, SchemaDefinitionError>;
pub type BuildResult<T> = Result<T, BuildError>;
