//! Resource type lookups and discovery documents.

use super::core::ScimServer;
use crate::error::{ScimError, ScimResult};
use crate::resource_type::ResourceType;
use crate::schema_discovery::{ResourceTypeDocument, SchemaDocument, ServiceProviderConfig};
use std::sync::Arc;

impl<P> ScimServer<P> {
    /// Look up a registered resource type by id or name (`"User"`).
    pub fn resource_type(&self, name: &str) -> ScimResult<&Arc<ResourceType>> {
        self.resource_types
            .get(name)
            .or_else(|| {
                self.resource_types
                    .all()
                    .iter()
                    .find(|rt| rt.name().eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| ScimError::EndpointNotFound {
                path: name.to_string(),
            })
    }

    /// Look up the resource type served at `endpoint` (`"/Users"`).
    pub fn resource_type_for_endpoint(&self, endpoint: &str) -> Option<&Arc<ResourceType>> {
        self.resource_types.by_endpoint(endpoint)
    }

    /// Absolute location of a stored resource.
    pub fn location(&self, resource_type: &ResourceType, id: &str) -> String {
        self.config.location(resource_type.endpoint(), Some(id))
    }

    pub fn service_provider_config(&self) -> ServiceProviderConfig {
        ServiceProviderConfig::for_server(&self.config)
    }

    pub fn resource_type_documents(&self) -> Vec<ResourceTypeDocument> {
        self.resource_types
            .all()
            .iter()
            .map(|rt| ResourceTypeDocument::new(rt, &self.config))
            .collect()
    }

    /// The `/ResourceTypes/{id}` document.
    pub fn resource_type_document(&self, id: &str) -> Option<ResourceTypeDocument> {
        self.resource_types
            .get(id)
            .map(|rt| ResourceTypeDocument::new(rt, &self.config))
    }

    pub fn schema_documents(&self) -> Vec<SchemaDocument> {
        self.schema_registry
            .get_schemas()
            .iter()
            .map(|schema| SchemaDocument::new(schema, &self.config))
            .collect()
    }

    /// The `/Schemas/{id}` document.
    pub fn schema_document(&self, id: &str) -> Option<SchemaDocument> {
        self.schema_registry
            .get_schema(id)
            .map(|schema| SchemaDocument::new(schema, &self.config))
    }
}
