//! Core SCIM server structure.
//!
//! The server owns the resource provider together with the immutable resource type
//! and schema registries built by [`ScimServerBuilder`](super::ScimServerBuilder).
//! Operations live in [`operations`](super::operations); lookups and discovery
//! documents in [`registration`](super::registration).

use crate::resource_type::ResourceTypeRegistry;
use crate::schema::SchemaRegistry;
use crate::scim_server::builder::ScimServerConfig;

/// SCIM server for handling SCIM protocol operations.
///
/// The server coordinates between the resource provider and SCIM protocol
/// requirements: every write is validated against its resource type before the
/// provider sees it. The server holds no per-request state, so one instance is shared
/// (typically behind an `Arc`) by every request task.
///
/// # Type Parameters
///
/// * `P` - The resource provider type that implements
///   [`ResourceProvider`](crate::resource::ResourceProvider)
///
/// # Examples
///
/// ```rust
/// use scim_provisioning::{ResourceType, ScimServerBuilder};
/// use scim_provisioning::providers::InMemoryProvider;
/// use scim_provisioning::resource::RequestContext;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = ScimServerBuilder::new(InMemoryProvider::new())
///     .register_resource_type(ResourceType::core_user()?)
///     .build()?;
///
/// let context = RequestContext::with_generated_id();
/// let user = server
///     .create_resource("User", &json!({"userName": "bjensen"}), &context)
///     .await?;
/// assert!(!user.id.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct ScimServer<P> {
    pub(super) provider: P,
    pub(super) resource_types: ResourceTypeRegistry,
    pub(super) schema_registry: SchemaRegistry,
    pub(super) config: ScimServerConfig,
}

impl<P> ScimServer<P> {
    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ScimServerConfig {
        &self.config
    }

    pub fn resource_types(&self) -> &ResourceTypeRegistry {
        &self.resource_types
    }

    /// Every schema used by a registered resource type, core schemas first.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schema_registry
    }
}

impl<P> std::fmt::Debug for ScimServer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScimServer")
            .field("resource_types", &self.resource_types.len())
            .field("schemas", &self.schema_registry.len())
            .field("config", &self.config)
            .finish()
    }
}
