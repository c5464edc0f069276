//! Request path routing.

use http::Method;

/// Path prefix accepted in front of every endpoint.
pub const VERSION_PREFIX: &str = "/v2";

/// Where a request path points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/{Type}`, e.g. `/Users`
    Collection { endpoint: String },
    /// `/{Type}/{id}`
    Item { endpoint: String, id: String },
    ServiceProviderConfig,
    Schemas,
    Schema { id: String },
    ResourceTypes,
    ResourceType { id: String },
    /// `/Me`, `/Bulk` and `/{Type}/.search`, which are not offered
    Unsupported { feature: &'static str },
}

impl Route {
    /// Route a path. An optional `/v2` prefix and trailing slashes are ignored.
    ///
    /// Returns `None` for paths that cannot name an endpoint at all. Whether a
    /// collection endpoint is actually served is decided against the registry.
    pub fn parse(path: &str) -> Option<Self> {
        let path = match path.strip_prefix(VERSION_PREFIX) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        };
        let path = path.trim_end_matches('/');
        let segments: Vec<&str> = path.strip_prefix('/')?.split('/').collect();

        let route = match segments.as_slice() {
            [""] => return None,
            [name] if name.eq_ignore_ascii_case("ServiceProviderConfig") => {
                Route::ServiceProviderConfig
            }
            [name] if name.eq_ignore_ascii_case("Schemas") => Route::Schemas,
            [name, id] if name.eq_ignore_ascii_case("Schemas") => Route::Schema {
                id: (*id).to_string(),
            },
            [name] if name.eq_ignore_ascii_case("ResourceTypes") => Route::ResourceTypes,
            [name, id] if name.eq_ignore_ascii_case("ResourceTypes") => Route::ResourceType {
                id: (*id).to_string(),
            },
            [name, ..] if name.eq_ignore_ascii_case("Me") => Route::Unsupported { feature: "/Me" },
            [name] if name.eq_ignore_ascii_case("Bulk") => Route::Unsupported { feature: "Bulk" },
            [_, id] if *id == ".search" => Route::Unsupported {
                feature: "POST search",
            },
            [name] if !name.is_empty() => Route::Collection {
                endpoint: format!("/{name}"),
            },
            [name, id] if !name.is_empty() && !id.is_empty() => Route::Item {
                endpoint: format!("/{name}"),
                id: (*id).to_string(),
            },
            _ => return None,
        };
        Some(route)
    }

    /// Methods served on this route.
    pub fn allowed_methods(&self) -> &'static [Method] {
        const COLLECTION: &[Method] = &[Method::GET, Method::POST];
        const ITEM: &[Method] = &[Method::GET, Method::PUT, Method::PATCH, Method::DELETE];
        const READ_ONLY: &[Method] = &[Method::GET];
        match self {
            Route::Collection { .. } => COLLECTION,
            Route::Item { .. } => ITEM,
            Route::Unsupported { .. } => &[],
            _ => READ_ONLY,
        }
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.allowed_methods().contains(method)
    }
}
