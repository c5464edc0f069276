//! Service provider discovery documents (RFC 7644 Section 4).
//!
//! Clients learn what the server supports from three read-only endpoints:
//!
//! * `/ServiceProviderConfig` - the [`ServiceProviderConfig`] document
//! * `/ResourceTypes` - one [`ResourceTypeDocument`] per registered resource type
//! * `/Schemas` - the RFC 7643 schema document of every registered schema
//!
//! The documents are derived from the server configuration and registries, so they
//! always describe what the dispatcher actually serves.

use crate::error::{ScimError, ScimResult};
use crate::resource_type::ResourceType;
use crate::schema::{Schema, SchemaDefinition};
use crate::scim_server::ScimServerConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SERVICE_PROVIDER_CONFIG_URN: &str =
    "urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig";
pub const RESOURCE_TYPE_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:ResourceType";
pub use crate::schema::definition::SCHEMA_SCHEMA_URN;

/// Service provider configuration as defined in RFC 7643 Section 5.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderConfig {
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_uri: Option<String>,
    pub patch: Supported,
    pub bulk: BulkSupport,
    pub filter: FilterSupport,
    pub change_password: Supported,
    pub sort: Supported,
    pub etag: Supported,
    pub authentication_schemes: Vec<AuthenticationScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DiscoveryMeta>,
}

impl ServiceProviderConfig {
    /// Capabilities of a server built with `config`.
    ///
    /// PATCH and ETags are supported. Filters are passed to the resource provider,
    /// capped at `max_results` per page. Bulk, sorting and password change are not.
    pub fn for_server(config: &ScimServerConfig) -> Self {
        Self {
            schemas: vec![SERVICE_PROVIDER_CONFIG_URN.to_string()],
            documentation_uri: config.documentation_uri.clone(),
            patch: Supported::yes(),
            bulk: BulkSupport {
                supported: false,
                max_operations: 0,
                max_payload_size: 0,
            },
            filter: FilterSupport {
                supported: true,
                max_results: config.max_results,
            },
            change_password: Supported::no(),
            sort: Supported::no(),
            etag: Supported::yes(),
            authentication_schemes: config.authentication_schemes.clone(),
            meta: Some(DiscoveryMeta {
                resource_type: "ServiceProviderConfig".to_string(),
                location: config.location("/ServiceProviderConfig", None),
            }),
        }
    }
}

/// `{"supported": bool}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supported {
    pub supported: bool,
}

impl Supported {
    pub fn yes() -> Self {
        Self { supported: true }
    }

    pub fn no() -> Self {
        Self { supported: false }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkSupport {
    pub supported: bool,
    pub max_operations: u32,
    pub max_payload_size: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterSupport {
    pub supported: bool,
    pub max_results: usize,
}

/// Authentication scheme definition for service provider config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationScheme {
    /// Authentication type (e.g., "oauthbearertoken", "httpbasic")
    #[serde(rename = "type")]
    pub auth_type: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_uri: Option<String>,
    /// Whether this scheme is the primary authentication method
    #[serde(default)]
    pub primary: bool,
}

impl AuthenticationScheme {
    /// OAuth 2.0 bearer tokens (RFC 6750), marked primary.
    pub fn oauth_bearer_token() -> Self {
        Self {
            auth_type: "oauthbearertoken".to_string(),
            name: "OAuth Bearer Token".to_string(),
            description: "Authentication scheme using the OAuth Bearer Token Standard"
                .to_string(),
            spec_uri: Some("https://www.rfc-editor.org/info/rfc6750".to_string()),
            documentation_uri: None,
            primary: true,
        }
    }

    /// HTTP Basic authentication (RFC 7617).
    pub fn http_basic() -> Self {
        Self {
            auth_type: "httpbasic".to_string(),
            name: "HTTP Basic".to_string(),
            description: "Authentication scheme using the HTTP Basic Standard".to_string(),
            spec_uri: Some("https://www.rfc-editor.org/info/rfc7617".to_string()),
            documentation_uri: None,
            primary: false,
        }
    }
}

/// `meta` of a discovery document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryMeta {
    pub resource_type: String,
    pub location: String,
}

/// A resource type as rendered on `/ResourceTypes` (RFC 7643 Section 6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeDocument {
    pub schemas: Vec<String>,
    pub id: String,
    pub name: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_extensions: Vec<SchemaExtensionDocument>,
    pub meta: DiscoveryMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaExtensionDocument {
    pub schema: String,
    pub required: bool,
}

impl ResourceTypeDocument {
    pub fn new(resource_type: &ResourceType, config: &ScimServerConfig) -> Self {
        Self {
            schemas: vec![RESOURCE_TYPE_URN.to_string()],
            id: resource_type.id().to_string(),
            name: resource_type.name().to_string(),
            endpoint: resource_type.endpoint().to_string(),
            description: resource_type.description().map(str::to_string),
            schema: resource_type.schema().id().to_string(),
            schema_extensions: resource_type
                .extensions()
                .iter()
                .map(|extension| SchemaExtensionDocument {
                    schema: extension.schema.id().to_string(),
                    required: extension.required,
                })
                .collect(),
            meta: DiscoveryMeta {
                resource_type: "ResourceType".to_string(),
                location: config.location("/ResourceTypes", Some(resource_type.id())),
            },
        }
    }
}

/// A schema as rendered on `/Schemas`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaDocument {
    pub schemas: Vec<String>,
    #[serde(flatten)]
    pub definition: SchemaDefinition,
    pub meta: DiscoveryMeta,
}

impl SchemaDocument {
    pub fn new(schema: &Schema, config: &ScimServerConfig) -> Self {
        Self {
            schemas: vec![SCHEMA_SCHEMA_URN.to_string()],
            definition: schema.to_definition(),
            meta: DiscoveryMeta {
                resource_type: "Schema".to_string(),
                location: config.location("/Schemas", Some(schema.id())),
            },
        }
    }
}

/// Serialize a response document. A failure is an internal error.
pub(crate) fn to_value<T: Serialize>(document: &T) -> ScimResult<Value> {
    serde_json::to_value(document)
        .map_err(|e| ScimError::internal(format!("Failed to serialize response document: {e}")))
}
