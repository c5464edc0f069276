//! Core dispatcher.
//!
//! [`ScimDispatcher::handle`] is the single entry point for HTTP-facing code: it
//! routes the request, runs the matching handler and turns every failure into an
//! RFC 7644 error response.

use super::handlers::{crud, discovery, query};
use super::request::ScimRequest;
use super::response::ScimResponse;
use super::route::Route;
use crate::error::{ScimError, ScimResult};
use crate::resource::{RequestContext, ResourceProvider};
use crate::resource_type::ResourceType;
use crate::scim_server::ScimServer;
use http::Method;
use log::{debug, error, info, warn};
use std::sync::Arc;

/// Framework-agnostic SCIM protocol dispatcher.
///
/// Cloning is cheap; clones share one [`ScimServer`].
pub struct ScimDispatcher<P> {
    server: Arc<ScimServer<P>>,
}

impl<P> Clone for ScimDispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            server: Arc::clone(&self.server),
        }
    }
}

impl<P> std::fmt::Debug for ScimDispatcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScimDispatcher")
            .field("server", &self.server)
            .finish()
    }
}

impl<P: ResourceProvider> ScimDispatcher<P> {
    pub fn new(server: ScimServer<P>) -> Self {
        Self::from_shared(Arc::new(server))
    }

    pub fn from_shared(server: Arc<ScimServer<P>>) -> Self {
        Self { server }
    }

    pub fn server(&self) -> &Arc<ScimServer<P>> {
        &self.server
    }

    /// Handle one request. Never fails: errors become SCIM error responses.
    pub async fn handle(&self, request: ScimRequest) -> ScimResponse {
        let context = match &request.request_id {
            Some(request_id) => RequestContext::new(request_id.clone()),
            None => RequestContext::with_generated_id(),
        };

        info!(
            "SCIM dispatcher processing {} {} (request: '{}')",
            request.method, request.path, context.request_id
        );

        match self.dispatch(&request, &context).await {
            Ok(response) => {
                debug!(
                    "SCIM dispatcher completed with {} (request: '{}')",
                    response.status, context.request_id
                );
                response
            }
            Err(e) => {
                if e.status_code().is_server_error() {
                    error!(
                        "SCIM dispatcher failed: {} (request: '{}')",
                        e, context.request_id
                    );
                } else {
                    warn!(
                        "SCIM dispatcher rejected request: {} (request: '{}')",
                        e, context.request_id
                    );
                }
                ScimResponse::error(&e)
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ScimRequest,
        context: &RequestContext,
    ) -> ScimResult<ScimResponse> {
        let route = Route::parse(&request.path).ok_or_else(|| ScimError::EndpointNotFound {
            path: request.path.clone(),
        })?;

        let resource_type = match &route {
            Route::Unsupported { feature } => {
                return Err(ScimError::NotImplemented {
                    feature: (*feature).to_string(),
                });
            }
            Route::Collection { endpoint } | Route::Item { endpoint, .. } => {
                Some(self.served(endpoint, &request.path)?)
            }
            _ => None,
        };

        if !route.allows(&request.method) {
            return Err(ScimError::MethodNotAllowed {
                method: request.method.to_string(),
                path: request.path.clone(),
            });
        }

        let server = self.server.as_ref();
        match (route, resource_type) {
            (Route::Collection { .. }, Some(resource_type)) => {
                if request.method == Method::POST {
                    crud::handle_create(server, resource_type, request, context).await
                } else {
                    query::handle_list(server, resource_type, request, context).await
                }
            }
            (Route::Item { id, .. }, Some(resource_type)) => {
                if request.method == Method::GET {
                    crud::handle_get(server, resource_type, &id, context).await
                } else if request.method == Method::PUT {
                    crud::handle_replace(server, resource_type, &id, request, context).await
                } else if request.method == Method::PATCH {
                    crud::handle_patch(server, resource_type, &id, request, context).await
                } else {
                    crud::handle_delete(server, resource_type, &id, context).await
                }
            }
            (Route::ServiceProviderConfig, _) => {
                discovery::handle_service_provider_config(server, request)
            }
            (Route::Schemas, _) => discovery::handle_schemas(server, request),
            (Route::Schema { id }, _) => discovery::handle_schema(server, &id, request),
            (Route::ResourceTypes, _) => discovery::handle_resource_types(server, request),
            (Route::ResourceType { id }, _) => {
                discovery::handle_resource_type(server, &id, request)
            }
            (route, _) => Err(ScimError::internal(format!("unhandled route {route:?}"))),
        }
    }

    /// The resource type served at `endpoint`, or 404.
    fn served(&self, endpoint: &str, path: &str) -> ScimResult<&ResourceType> {
        self.server
            .resource_type_for_endpoint(endpoint)
            .map(|resource_type| resource_type.as_ref())
            .ok_or_else(|| ScimError::EndpointNotFound {
                path: path.to_string(),
            })
    }
}
