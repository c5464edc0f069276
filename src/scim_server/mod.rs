//! SCIM server with resource types registered at build time.
//!
//! # Module Organization
//!
//! * [`builder`] - configuration and the [`ScimServerBuilder`]
//! * [`core`] - the [`ScimServer`] struct
//! * [`registration`] - resource type lookups and discovery documents
//! * [`operations`] - create, read, replace, patch, delete and list

pub mod builder;
pub mod core;
pub mod operations;
pub mod registration;


pub use builder::{DEFAULT_MAX_RESULTS, ScimServerBuilder, ScimServerConfig};
pub use core::ScimServer;
