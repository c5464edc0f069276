//! SCIM protocol dispatcher.
//!
//! Maps an HTTP method and path onto resource type operations and discovery
//! documents, independent of any HTTP framework. Callers build a [`ScimRequest`],
//! hand it to [`ScimDispatcher::handle`] and write the returned [`ScimResponse`].
//!
//! ```rust
//! use scim_provisioning::{ResourceType, ScimDispatcher, ScimRequest, ScimServerBuilder};
//! use scim_provisioning::providers::InMemoryProvider;
//! use http::{Method, StatusCode};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ScimServerBuilder::new(InMemoryProvider::new())
//!     .register_resource_type(ResourceType::core_user()?)
//!     .build()?;
//! let dispatcher = ScimDispatcher::new(server);
//!
//! let response = dispatcher
//!     .handle(ScimRequest::new(Method::POST, "/v2/Users").with_json(&json!({"userName": "bjensen"})))
//!     .await;
//! assert_eq!(response.status, StatusCode::CREATED);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod handlers;
pub mod request;
pub mod response;
pub mod route;

pub use core::ScimDispatcher;
pub use request::ScimRequest;
pub use response::{
    ERROR_URN, ErrorBody, LIST_RESPONSE_URN, ListResponse, SCIM_CONTENT_TYPE, ScimResponse,
};
pub use route::Route;
