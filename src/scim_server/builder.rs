//! Builder pattern for configuring SCIM server instances.
//!
//! The builder collects the server configuration and the resource types to serve,
//! then checks everything at once in [`ScimServerBuilder::build`]. A bad base URL, a
//! malformed resource type or two resource types claiming the same endpoint fail the
//! build; nothing is served from a half-registered configuration.

use super::core::ScimServer;
use crate::error::{BuildError, BuildResult, SchemaDefinitionError};
use crate::resource::ResourceProvider;
use crate::resource_type::{ResourceType, ResourceTypeRegistry};
use crate::schema::SchemaRegistry;
use crate::schema_discovery::AuthenticationScheme;
use log::info;
use std::sync::Arc;
use url::Url;

/// Default and maximum page size for list responses.
pub const DEFAULT_MAX_RESULTS: usize = 200;

/// Configuration for SCIM server endpoint URLs and advertised capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScimServerConfig {
    /// Base URL for the SCIM server, without the version segment.
    /// Examples: "https://scim.example.com", "http://localhost:8080/scim"
    pub base_url: String,

    /// SCIM protocol version segment used in locations. Defaults to "v2".
    pub scim_version: String,

    /// Page size used when a list request has no `count`, and the cap on `count`.
    pub max_results: usize,

    /// Human-readable documentation advertised by `/ServiceProviderConfig`.
    pub documentation_uri: Option<String>,

    pub authentication_schemes: Vec<AuthenticationScheme>,
}

impl Default for ScimServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            scim_version: "v2".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            documentation_uri: None,
            authentication_schemes: Vec::new(),
        }
    }
}

impl ScimServerConfig {
    /// Absolute URL of an endpoint, e.g. `https://scim.example.com/v2/Users/2819c223`.
    ///
    /// `endpoint` starts with `/`; `id` is appended as a further path segment.
    pub fn location(&self, endpoint: &str, id: Option<&str>) -> String {
        let base = self.base_url.trim_end_matches('/');
        match id {
            Some(id) => format!("{base}/{}{endpoint}/{id}", self.scim_version),
            None => format!("{base}/{}{endpoint}", self.scim_version),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> BuildResult<()> {
        let invalid = |message: String| BuildError::InvalidConfiguration { message };

        if self.base_url.is_empty() {
            return Err(invalid("Base URL cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(invalid("Base URL must start with http:// or https://".to_string()));
        }
        Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("Base URL '{}' is not a valid URL: {e}", self.base_url)))?;

        if self.scim_version.is_empty() || self.scim_version.contains('/') {
            return Err(invalid(format!(
                "SCIM version '{}' must be a single non-empty path segment",
                self.scim_version
            )));
        }

        if self.max_results == 0 {
            return Err(invalid("max_results must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Builder for configuring and creating SCIM server instances.
///
/// # Examples
///
/// ```rust
/// use scim_provisioning::{ResourceType, ScimServerBuilder};
/// use scim_provisioning::providers::InMemoryProvider;
/// use scim_provisioning::schema_discovery::AuthenticationScheme;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let server = ScimServerBuilder::new(InMemoryProvider::new())
///     .with_base_url("https://scim.company.com")
///     .with_max_results(100)
///     .with_authentication_scheme(AuthenticationScheme::oauth_bearer_token())
///     .register_resource_type(ResourceType::core_user()?)
///     .register_resource_type(ResourceType::core_group()?)
///     .build()?;
///
/// assert_eq!(server.resource_types().len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct ScimServerBuilder<P> {
    provider: P,
    config: ScimServerConfig,
    resource_types: Vec<ResourceType>,
}

impl<P: ResourceProvider> ScimServerBuilder<P> {
    /// Create a new SCIM server builder with a resource provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: ScimServerConfig::default(),
            resource_types: Vec::new(),
        }
    }

    /// Set the base URL for the SCIM server, without the version segment.
    ///
    /// # Examples
    ///
    /// - `"https://scim.company.com"`
    /// - `"http://localhost:8080"`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the SCIM protocol version segment. Defaults to "v2".
    pub fn with_scim_version(mut self, version: impl Into<String>) -> Self {
        self.config.scim_version = version.into();
        self
    }

    /// Set the default and maximum page size.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    pub fn with_documentation_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.documentation_uri = Some(uri.into());
        self
    }

    /// Advertise an authentication scheme. Authentication itself happens in front of
    /// the dispatcher.
    pub fn with_authentication_scheme(mut self, scheme: AuthenticationScheme) -> Self {
        self.config.authentication_schemes.push(scheme);
        self
    }

    /// Serve a resource type.
    pub fn register_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_types.push(resource_type);
        self
    }

    /// Build the configured SCIM server.
    ///
    /// # Errors
    ///
    /// Returns a `BuildError` if the configuration is invalid, if two resource types
    /// share an id or endpoint, or if two different schemas share an id.
    pub fn build(self) -> BuildResult<ScimServer<P>> {
        self.config.validate()?;

        let mut resource_types = ResourceTypeRegistry::new();
        let mut schemas = SchemaRegistry::new();
        for resource_type in self.resource_types {
            let resource_type = resource_types.register(resource_type)?;
            let attached = std::iter::once(resource_type.schema())
                .chain(resource_type.extensions().iter().map(|ext| &ext.schema));
            for schema in attached {
                match schemas.get_schema(schema.id()) {
                    Some(existing) if existing.as_ref() == schema.as_ref() => {}
                    Some(_) => {
                        return Err(SchemaDefinitionError::DuplicateSchema {
                            id: schema.id().to_string(),
                        }
                        .into());
                    }
                    None => {
                        schemas.add_schema(Arc::clone(schema))?;
                    }
                }
            }
        }

        info!(
            "SCIM server configured at {} with {} resource type(s) and {} schema(s)",
            self.config.location("", None),
            resource_types.len(),
            schemas.len()
        );

        Ok(ScimServer {
            provider: self.provider,
            resource_types,
            schema_registry: schemas,
            config: self.config,
        })
    }
}
