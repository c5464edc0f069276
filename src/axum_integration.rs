//! Serve the dispatcher through an axum [`Router`].
//!
//! Every request below the mount point is converted into a [`ScimRequest`] and
//! answered by [`ScimDispatcher::handle`]:
//!
//! ```rust,no_run
//! use scim_provisioning::axum_integration::scim_router;
//! use scim_provisioning::providers::InMemoryProvider;
//! use scim_provisioning::{ResourceType, ScimDispatcher, ScimServerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ScimServerBuilder::new(InMemoryProvider::new())
//!     .with_base_url("https://example.com/scim")
//!     .register_resource_type(ResourceType::core_user()?)
//!     .register_resource_type(ResourceType::core_group()?)
//!     .build()?;
//!
//! let app = axum::Router::new().nest("/scim", scim_router(ScimDispatcher::new(server)));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::dispatcher::{ScimDispatcher, ScimRequest, ScimResponse};
use crate::error::ScimError;
use crate::resource::ResourceProvider;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};

/// Header carrying a caller supplied correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A router that sends every path to the dispatcher.
pub fn scim_router<P>(dispatcher: ScimDispatcher<P>) -> Router
where
    P: ResourceProvider + 'static,
{
    Router::new()
        .fallback(handle_request::<P>)
        .with_state(dispatcher)
}

async fn handle_request<P>(State(dispatcher): State<ScimDispatcher<P>>, request: Request) -> Response
where
    P: ResourceProvider + 'static,
{
    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            return ScimResponse::error(&ScimError::invalid_syntax(format!(
                "Request body could not be read: {e}"
            )))
            .into_response();
        }
    };

    let request = ScimRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        body: body.to_vec(),
        request_id: parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    };
    dispatcher.handle(request).await.into_response()
}

impl IntoResponse for ScimResponse {
    fn into_response(self) -> Response {
        let body = self.body_bytes();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
