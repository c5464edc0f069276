//! SCIM resource model.
//!
//! # Key Components
//!
//! * [`Attributes`] / [`AttributeValue`] - canonical, typed resource content produced by
//!   schema validation
//! * [`StoredResource`] - a resource as held by a provider, with id and [`Meta`]
//! * [`ResourceProvider`] - the storage collaborator trait
//! * [`RequestContext`] / [`ListQuery`] - per-request tracking and list parameters
//! * [`PatchOperation`] - parsed PATCH operations

pub mod context;
pub mod core;
pub mod patch;
pub mod provider;
pub mod value;

pub use context::{ListQuery, RequestContext};
pub use core::{Meta, Page, StoredResource};
pub use patch::{PATCH_OP_URN, PatchOp, PatchOperation, PatchPath, parse_patch_request};
pub use provider::ResourceProvider;
pub use value::{AttributeValue, Attributes};
