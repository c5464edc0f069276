//! Schema-driven SCIM 2.0 provisioning server for Rust.
//!
//! Validates resources against SCIM schemas before they reach storage, and maps
//! SCIM HTTP requests onto resource type operations, independent of any HTTP
//! framework.
//!
//! # Core Components
//!
//! - [`Schema`] / [`SchemaRegistry`] - attribute definitions and the validation engine
//! - [`ResourceType`] - an endpoint bound to a core schema plus extensions
//! - [`ScimServer`] - validates every write before the [`ResourceProvider`] sees it
//! - [`ScimDispatcher`] - HTTP method + path to operation, SCIM responses and errors
//!
//! # Quick Start
//!
//! ```rust
//! use scim_provisioning::providers::InMemoryProvider;
//! use scim_provisioning::{ResourceType, ScimDispatcher, ScimRequest, ScimServerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ScimServerBuilder::new(InMemoryProvider::new().with_unique_attribute("User", "userName"))
//!     .with_base_url("https://example.com/scim")
//!     .register_resource_type(ResourceType::core_user()?)
//!     .register_resource_type(ResourceType::core_group()?)
//!     .build()?;
//!
//! let dispatcher = ScimDispatcher::new(server);
//! let response = dispatcher.handle(ScimRequest::get("/v2/ServiceProviderConfig")).await;
//! assert!(response.status.is_success());
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;
pub mod error;
pub mod providers;
pub mod resource;
pub mod resource_type;
pub mod schema;
pub mod schema_discovery;
pub mod scim_server;

/// axum binding for the dispatcher.
///
/// This module is only available when the `axum` feature is enabled.
#[cfg(feature = "axum")]
pub mod axum_integration;

// Re-export commonly used types for convenience
pub use dispatcher::{ScimDispatcher, ScimRequest, ScimResponse};
pub use error::{
    BuildError, BuildResult, ScimError, ScimResult, SchemaDefinitionError, ValidationError,
    ValidationResult,
};
pub use resource::{Attributes, ListQuery, RequestContext, ResourceProvider, StoredResource};
pub use resource_type::{ResourceType, ResourceTypeRegistry};
pub use schema::{Schema, SchemaRegistry};
pub use schema_discovery::AuthenticationScheme;
pub use scim_server::{ScimServer, ScimServerBuilder, ScimServerConfig};
