//! Query operation handlers
//!
//! `GET /{Type}` with `startIndex`, `count` and `filter` query parameters.

use super::render_resource;
use crate::dispatcher::request::ScimRequest;
use crate::dispatcher::response::{ListResponse, ScimResponse};
use crate::error::{ScimError, ScimResult};
use crate::resource::{ListQuery, RequestContext, ResourceProvider};
use crate::resource_type::ResourceType;
use crate::schema_discovery::to_value;
use crate::scim_server::ScimServer;
use http::StatusCode;
use log::debug;

/// Handle `GET /{Type}`.
pub async fn handle_list<P: ResourceProvider>(
    server: &ScimServer<P>,
    resource_type: &ResourceType,
    request: &ScimRequest,
    context: &RequestContext,
) -> ScimResult<ScimResponse> {
    let query = list_query(request, server.config().max_results)?;
    debug!(
        "Listing {} from {} (count {}, filter {:?})",
        resource_type.name(),
        query.start_index,
        query.count,
        query.filter
    );

    let page = server
        .list_resources(resource_type.id(), &query, context)
        .await?;
    let resources = page
        .resources
        .iter()
        .map(|resource| render_resource(server, resource_type, resource))
        .collect();

    Ok(ScimResponse::json(
        StatusCode::OK,
        to_value(&ListResponse::new(
            page.total_results,
            query.start_index,
            resources,
        ))?,
    ))
}

/// Pagination and filter parameters of a list request.
///
/// `startIndex` below 1 is treated as 1; `count` defaults to `max_results`, is capped
/// by it and a negative count means zero.
pub(crate) fn list_query(request: &ScimRequest, max_results: usize) -> ScimResult<ListQuery> {
    let start_index = integer_param(request, "startIndex")?
        .map(|start| usize::try_from(start).unwrap_or(1))
        .unwrap_or(1);
    let count = integer_param(request, "count")?
        .map(|count| usize::try_from(count).unwrap_or(0).min(max_results))
        .unwrap_or(max_results);

    let query = ListQuery::new(start_index, count);
    Ok(match request.query_param("filter") {
        Some(filter) if !filter.trim().is_empty() => query.with_filter(filter),
        _ => query,
    })
}

fn integer_param(request: &ScimRequest, name: &str) -> ScimResult<Option<i64>> {
    request
        .query_param(name)
        .map(|value| {
            value.trim().parse::<i64>().map_err(|_| {
                ScimError::invalid_value(format!("'{name}' must be an integer, got '{value}'"))
            })
        })
        .transpose()
}
