//! Resource provider trait for SCIM data access.
//!
//! Storage is a collaborator behind this trait. The server validates every write
//! before it reaches the provider, so implementations receive canonical
//! [`Attributes`] and only decide how to persist them. Every call is scoped by the
//! resource type name (`"User"`, `"Group"`, ...).
//!
//! The trait is async-first. Implementations write plain `async fn`s:
//!
//! ```rust,no_run
//! use scim_provisioning::providers::ProviderError;
//! use scim_provisioning::resource::{
//!     Attributes, ListQuery, Page, PatchOperation, RequestContext, ResourceProvider,
//!     StoredResource,
//! };
//! use scim_provisioning::ResourceType;
//!
//! struct ReadOnlyDirectory;
//!
//! impl ResourceProvider for ReadOnlyDirectory {
//!     async fn create_resource(
//!         &self,
//!         _resource_type: &str,
//!         _attributes: Attributes,
//!         _context: &RequestContext,
//!     ) -> Result<StoredResource, ProviderError> {
//!         Err(ProviderError::internal("directory is read-only"))
//!     }
//!
//!     async fn get_resource(
//!         &self,
//!         _resource_type: &str,
//!         _id: &str,
//!         _context: &RequestContext,
//!     ) -> Result<Option<StoredResource>, ProviderError> {
//!         Ok(None)
//!     }
//!
//!     async fn replace_resource(
//!         &self,
//!         resource_type: &str,
//!         id: &str,
//!         _attributes: Attributes,
//!         _context: &RequestContext,
//!     ) -> Result<StoredResource, ProviderError> {
//!         Err(ProviderError::not_found(resource_type, id))
//!     }
//!
//!     async fn patch_resource(
//!         &self,
//!         resource_type: &ResourceType,
//!         id: &str,
//!         _operations: &[PatchOperation],
//!         _context: &RequestContext,
//!     ) -> Result<StoredResource, ProviderError> {
//!         Err(ProviderError::not_found(resource_type.name(), id))
//!     }
//!
//!     async fn delete_resource(
//!         &self,
//!         resource_type: &str,
//!         id: &str,
//!         _context: &RequestContext,
//!     ) -> Result<(), ProviderError> {
//!         Err(ProviderError::not_found(resource_type, id))
//!     }
//!
//!     async fn list_resources(
//!         &self,
//!         _resource_type: &str,
//!         _query: &ListQuery,
//!         _context: &RequestContext,
//!     ) -> Result<Page, ProviderError> {
//!         Ok(Page::empty())
//!     }
//! }
//! ```

use super::context::{ListQuery, RequestContext};
use super::core::{Page, StoredResource};
use super::patch::PatchOperation;
use super::value::Attributes;
use crate::providers::ProviderError;
use crate::resource_type::ResourceType;
use std::future::Future;

/// Storage collaborator for SCIM resources.
///
/// Each call must be atomic with respect to other calls: a create, replace, patch or
/// delete either takes full effect or none.
pub trait ResourceProvider: Send + Sync {
    /// Store a new resource and assign its id and metadata.
    fn create_resource(
        &self,
        resource_type: &str,
        attributes: Attributes,
        context: &RequestContext,
    ) -> impl Future<Output = Result<StoredResource, ProviderError>> + Send;

    /// Fetch a resource, `None` if the id is unknown.
    fn get_resource(
        &self,
        resource_type: &str,
        id: &str,
        context: &RequestContext,
    ) -> impl Future<Output = Result<Option<StoredResource>, ProviderError>> + Send;

    /// Replace all attributes of an existing resource.
    fn replace_resource(
        &self,
        resource_type: &str,
        id: &str,
        attributes: Attributes,
        context: &RequestContext,
    ) -> impl Future<Output = Result<StoredResource, ProviderError>> + Send;

    /// Apply already validated PATCH operations to an existing resource.
    ///
    /// Paths and values have been checked against the resource type. Bracketed value
    /// filters inside paths are passed through as written. The merged document must
    /// pass [`ResourceType::validate`] before it is committed; a failure is reported
    /// as [`ProviderError::InvalidResult`] and leaves the stored resource unchanged.
    fn patch_resource(
        &self,
        resource_type: &ResourceType,
        id: &str,
        operations: &[PatchOperation],
        context: &RequestContext,
    ) -> impl Future<Output = Result<StoredResource, ProviderError>> + Send;

    fn delete_resource(
        &self,
        resource_type: &str,
        id: &str,
        context: &RequestContext,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// List one page of resources. `query.filter` is the raw filter expression.
    fn list_resources(
        &self,
        resource_type: &str,
        query: &ListQuery,
        context: &RequestContext,
    ) -> impl Future<Output = Result<Page, ProviderError>> + Send;
}
