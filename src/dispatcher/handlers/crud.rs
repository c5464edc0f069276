//! CRUD operation handlers
//!
//! Create, read, replace, patch and delete on `/{Type}` and `/{Type}/{id}`. Request
//! bodies are decoded here; validation happens in the server before anything reaches
//! the provider.

use super::render_resource;
use crate::dispatcher::request::ScimRequest;
use crate::dispatcher::response::ScimResponse;
use crate::error::ScimResult;
use crate::resource::{RequestContext, ResourceProvider, StoredResource};
use crate::resource_type::ResourceType;
use crate::scim_server::ScimServer;
use http::StatusCode;

/// Handle `POST /{Type}`.
pub async fn handle_create<P: ResourceProvider>(
    server: &ScimServer<P>,
    resource_type: &ResourceType,
    request: &ScimRequest,
    context: &RequestContext,
) -> ScimResult<ScimResponse> {
    let data = request.json_body()?;
    let created = server
        .create_resource(resource_type.id(), &data, context)
        .await?;
    Ok(resource_response(
        server,
        resource_type,
        &created,
        StatusCode::CREATED,
    ))
}

/// Handle `GET /{Type}/{id}`.
pub async fn handle_get<P: ResourceProvider>(
    server: &ScimServer<P>,
    resource_type: &ResourceType,
    id: &str,
    context: &RequestContext,
) -> ScimResult<ScimResponse> {
    let resource = server.get_resource(resource_type.id(), id, context).await?;
    Ok(resource_response(
        server,
        resource_type,
        &resource,
        StatusCode::OK,
    ))
}

/// Handle `PUT /{Type}/{id}`.
pub async fn handle_replace<P: ResourceProvider>(
    server: &ScimServer<P>,
    resource_type: &ResourceType,
    id: &str,
    request: &ScimRequest,
    context: &RequestContext,
) -> ScimResult<ScimResponse> {
    let data = request.json_body()?;
    let replaced = server
        .replace_resource(resource_type.id(), id, &data, context)
        .await?;
    Ok(resource_response(
        server,
        resource_type,
        &replaced,
        StatusCode::OK,
    ))
}

/// Handle `PATCH /{Type}/{id}`.
pub async fn handle_patch<P: ResourceProvider>(
    server: &ScimServer<P>,
    resource_type: &ResourceType,
    id: &str,
    request: &ScimRequest,
    context: &RequestContext,
) -> ScimResult<ScimResponse> {
    let body = request.json_body()?;
    let patched = server
        .patch_resource(resource_type.id(), id, &body, context)
        .await?;
    Ok(resource_response(
        server,
        resource_type,
        &patched,
        StatusCode::OK,
    ))
}

/// Handle `DELETE /{Type}/{id}`.
pub async fn handle_delete<P: ResourceProvider>(
    server: &ScimServer<P>,
    resource_type: &ResourceType,
    id: &str,
    context: &RequestContext,
) -> ScimResult<ScimResponse> {
    server
        .delete_resource(resource_type.id(), id, context)
        .await?;
    Ok(ScimResponse::no_content())
}

fn resource_response<P>(
    server: &ScimServer<P>,
    resource_type: &ResourceType,
    resource: &StoredResource,
    status: StatusCode,
) -> ScimResponse {
    let response = ScimResponse::json(status, render_resource(server, resource_type, resource))
        .with_location(&server.location(resource_type, &resource.id));
    match &resource.meta.version {
        Some(version) => response.with_etag(version),
        None => response,
    }
}
