//! Discovery endpoint handlers
//!
//! `/ServiceProviderConfig`, `/Schemas[/{id}]` and `/ResourceTypes[/{id}]`. These
//! endpoints are read-only and do not support filtering.

use crate::dispatcher::request::ScimRequest;
use crate::dispatcher::response::{ListResponse, ScimResponse};
use crate::error::{ScimError, ScimResult};
use crate::schema_discovery::to_value;
use crate::scim_server::ScimServer;
use http::StatusCode;

pub fn handle_service_provider_config<P>(
    server: &ScimServer<P>,
    request: &ScimRequest,
) -> ScimResult<ScimResponse> {
    reject_filter(request)?;
    Ok(ScimResponse::json(
        StatusCode::OK,
        to_value(&server.service_provider_config())?,
    ))
}

pub fn handle_schemas<P>(
    server: &ScimServer<P>,
    request: &ScimRequest,
) -> ScimResult<ScimResponse> {
    reject_filter(request)?;
    let documents = server.schema_documents();
    list_response(documents.iter().map(to_value).collect::<ScimResult<_>>()?)
}

pub fn handle_schema<P>(
    server: &ScimServer<P>,
    id: &str,
    request: &ScimRequest,
) -> ScimResult<ScimResponse> {
    reject_filter(request)?;
    let document = server
        .schema_document(id)
        .ok_or_else(|| ScimError::resource_not_found("Schema", id))?;
    Ok(ScimResponse::json(StatusCode::OK, to_value(&document)?))
}

pub fn handle_resource_types<P>(
    server: &ScimServer<P>,
    request: &ScimRequest,
) -> ScimResult<ScimResponse> {
    reject_filter(request)?;
    let documents = server.resource_type_documents();
    list_response(documents.iter().map(to_value).collect::<ScimResult<_>>()?)
}

pub fn handle_resource_type<P>(
    server: &ScimServer<P>,
    id: &str,
    request: &ScimRequest,
) -> ScimResult<ScimResponse> {
    reject_filter(request)?;
    let document = server
        .resource_type_document(id)
        .ok_or_else(|| ScimError::resource_not_found("ResourceType", id))?;
    Ok(ScimResponse::json(StatusCode::OK, to_value(&document)?))
}

fn reject_filter(request: &ScimRequest) -> ScimResult<()> {
    match request.query_param("filter") {
        Some(_) => Err(ScimError::Forbidden {
            message: "filtering is not supported on discovery endpoints".to_string(),
        }),
        None => Ok(()),
    }
}

fn list_response(resources: Vec<serde_json::Value>) -> ScimResult<ScimResponse> {
    let total = resources.len();
    Ok(ScimResponse::json(
        StatusCode::OK,
        to_value(&ListResponse::new(total, 1, resources))?,
    ))
}
