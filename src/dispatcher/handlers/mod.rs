//! Request handlers, organized by functionality:
//! - CRUD operations on a single resource
//! - Query operations (list with pagination and filter)
//! - Discovery endpoints (`/ServiceProviderConfig`, `/Schemas`, `/ResourceTypes`)

pub mod crud;
pub mod discovery;
pub mod query;

use crate::resource::StoredResource;
use crate::resource_type::ResourceType;
use crate::scim_server::ScimServer;
use serde_json::{Value, json};

/// Render a stored resource as a SCIM resource representation.
///
/// `schemas`, `id` and `meta` are server-owned and always written last.
pub(crate) fn render_resource<P>(
    server: &ScimServer<P>,
    resource_type: &ResourceType,
    resource: &StoredResource,
) -> Value {
    let location = server.location(resource_type, &resource.id);
    let mut meta = json!({
        "resourceType": resource_type.name(),
        "created": resource.meta.created_rfc3339(),
        "lastModified": resource.meta.last_modified_rfc3339(),
        "location": location,
    });
    if let Some(version) = &resource.meta.version {
        meta["version"] = Value::String(version.clone());
    }

    let mut body = resource_type.returnable(&resource.attributes).to_json_map();
    body.insert(
        "schemas".to_string(),
        json!(resource_type.schema_urns(&resource.attributes)),
    );
    body.insert("id".to_string(), Value::String(resource.id.clone()));
    body.insert("meta".to_string(), meta);
    Value::Object(body)
}
