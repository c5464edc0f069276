//! Resource CRUD operations for the SCIM server.
//!
//! Each operation resolves the resource type by name, validates the request data
//! against it and only then hands canonical attributes (or canonical PATCH
//! operations) to the resource provider. A write that fails validation never reaches
//! the provider. For PATCH the provider also re-validates the merged document
//! against the resource type before committing it.

use super::core::ScimServer;
use crate::error::{ScimError, ScimResult};
use crate::resource::{
    ListQuery, Page, RequestContext, ResourceProvider, StoredResource, parse_patch_request,
};
use log::debug;
use serde_json::Value;

impl<P: ResourceProvider> ScimServer<P> {
    /// Validate and store a new resource.
    pub async fn create_resource(
        &self,
        resource_type: &str,
        data: &Value,
        context: &RequestContext,
    ) -> ScimResult<StoredResource> {
        let resource_type = self.resource_type(resource_type)?;
        let attributes = resource_type.validate(data)?;

        let created = self
            .provider
            .create_resource(resource_type.name(), attributes, context)
            .await?;
        debug!(
            "Created {} '{}' (request: '{}')",
            resource_type.name(),
            created.id,
            context.request_id
        );
        Ok(created)
    }

    /// Fetch a resource; unknown ids are `ResourceNotFound`.
    pub async fn get_resource(
        &self,
        resource_type: &str,
        id: &str,
        context: &RequestContext,
    ) -> ScimResult<StoredResource> {
        let resource_type = self.resource_type(resource_type)?;
        self.provider
            .get_resource(resource_type.name(), id, context)
            .await?
            .ok_or_else(|| ScimError::resource_not_found(resource_type.name(), id))
    }

    /// Validate a full representation and replace the stored resource with it.
    pub async fn replace_resource(
        &self,
        resource_type: &str,
        id: &str,
        data: &Value,
        context: &RequestContext,
    ) -> ScimResult<StoredResource> {
        let resource_type = self.resource_type(resource_type)?;
        let attributes = resource_type.validate(data)?;

        let replaced = self
            .provider
            .replace_resource(resource_type.name(), id, attributes, context)
            .await?;
        debug!(
            "Replaced {} '{}' (request: '{}')",
            resource_type.name(),
            id,
            context.request_id
        );
        Ok(replaced)
    }

    /// Apply a PatchOp message.
    pub async fn patch_resource(
        &self,
        resource_type: &str,
        id: &str,
        body: &Value,
        context: &RequestContext,
    ) -> ScimResult<StoredResource> {
        let resource_type = self.resource_type(resource_type)?;
        let operations = resource_type.validate_patch(&parse_patch_request(body)?)?;

        // Operations that only carried server-owned keys change nothing.
        if operations.is_empty() {
            return self.get_resource(resource_type.name(), id, context).await;
        }

        let patched = self
            .provider
            .patch_resource(resource_type, id, &operations, context)
            .await?;
        debug!(
            "Patched {} '{}' with {} operation(s) (request: '{}')",
            resource_type.name(),
            id,
            operations.len(),
            context.request_id
        );
        Ok(patched)
    }

    pub async fn delete_resource(
        &self,
        resource_type: &str,
        id: &str,
        context: &RequestContext,
    ) -> ScimResult<()> {
        let resource_type = self.resource_type(resource_type)?;
        self.provider
            .delete_resource(resource_type.name(), id, context)
            .await?;
        debug!(
            "Deleted {} '{}' (request: '{}')",
            resource_type.name(),
            id,
            context.request_id
        );
        Ok(())
    }

    /// List one page of resources. `query.count` is capped at the configured
    /// `max_results`.
    pub async fn list_resources(
        &self,
        resource_type: &str,
        query: &ListQuery,
        context: &RequestContext,
    ) -> ScimResult<Page> {
        let resource_type = self.resource_type(resource_type)?;
        let query = ListQuery {
            count: query.count.min(self.config.max_results),
            ..query.clone()
        };
        Ok(self
            .provider
            .list_resources(resource_type.name(), &query, context)
            .await?)
    }
}
