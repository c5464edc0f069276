//! CRUD, PATCH and list over `/Users` and `/Groups`.

use crate::common::fixtures::{patch_requests, rfc_examples};
use crate::common::{BASE_URL, body_of, create, dispatcher, init_logging, send};
use http::header::ETAG;
use http::{Method, StatusCode};
use scim_provisioning::providers::InMemoryProvider;
use scim_provisioning::schema::embedded::{ENTERPRISE_USER_SCHEMA_URN, enterprise_user_schema};
use scim_provisioning::{ResourceType, Schema, ScimDispatcher, ScimServerBuilder};
use serde_json::json;

#[tokio::test]
async fn test_user_lifecycle() {
    let dispatcher = dispatcher();
    let id = create(&dispatcher, "/Users", rfc_examples::user_full()).await;

    let fetched = send(&dispatcher, Method::GET, &format!("/Users/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    let body = body_of(&fetched);
    assert_eq!(body["id"], json!(id));
    assert_ne!(body["id"], json!("2819c223-7f76-453a-919d-413861904646"));
    assert_eq!(body["externalId"], json!("701984"));
    assert_eq!(body["name"]["familyName"], json!("Jensen"));

    let replaced = send(
        &dispatcher,
        Method::PUT,
        &format!("/Users/{id}"),
        Some(json!({"userName": "bjensen@example.com", "title": "Manager"})),
    )
    .await;
    assert_eq!(replaced.status, StatusCode::OK);
    let body = body_of(&replaced);
    assert_eq!(body["title"], json!("Manager"));
    assert!(body.get("name").is_none());
    assert_ne!(replaced.header(&ETAG), fetched.header(&ETAG));
    assert_eq!(body["meta"]["created"], body_of(&fetched)["meta"]["created"]);

    let deleted = send(&dispatcher, Method::DELETE, &format!("/Users/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_none());

    let gone = send(&dispatcher, Method::GET, &format!("/Users/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    let again = send(&dispatcher, Method::DELETE, &format!("/Users/{id}"), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_unknown_id_is_404() {
    let dispatcher = dispatcher();
    let response = send(
        &dispatcher,
        Method::PUT,
        "/Users/missing",
        Some(json!({"userName": "bjensen"})),
    )
    .await;
    assert_scim_error!(response, StatusCode::NOT_FOUND, None);
}

#[tokio::test]
async fn test_duplicate_user_name_is_409() {
    let dispatcher = dispatcher();
    create(&dispatcher, "/Users", json!({"userName": "bjensen"})).await;
    let response = send(
        &dispatcher,
        Method::POST,
        "/Users",
        Some(json!({"userName": "BJensen"})),
    )
    .await;
    assert_scim_error!(response, StatusCode::CONFLICT, Some("uniqueness"));
}

#[tokio::test]
async fn test_enterprise_user_round_trip() {
    let dispatcher = dispatcher();
    let id = create(&dispatcher, "/Users", rfc_examples::enterprise_user()).await;

    let response = send(&dispatcher, Method::GET, &format!("/Users/{id}"), None).await;
    let body = body_of(&response);
    assert_eq!(
        body["schemas"],
        json!([
            "urn:ietf:params:scim:schemas:core:2.0:User",
            ENTERPRISE_USER_SCHEMA_URN
        ])
    );
    assert_eq!(
        body[ENTERPRISE_USER_SCHEMA_URN]["department"],
        json!("Tour Operations")
    );
}

#[tokio::test]
async fn test_patch_user() {
    let dispatcher = dispatcher();
    let id = create(&dispatcher, "/Users", rfc_examples::user_full()).await;

    let response = send(
        &dispatcher,
        Method::PATCH,
        &format!("/Users/{id}"),
        Some(patch_requests::patch(json!([
            {"op": "replace", "path": "active", "value": false},
            {"op": "replace", "path": "emails[type eq \"work\"].value", "value": "barbara@example.com"},
            {"op": "remove", "path": "phoneNumbers"},
            {"op": "add", "value": {"nickName": "B", "title": "Senior Tour Guide"}}
        ]))),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let body = body_of(&response);
    assert_eq!(body["active"], json!(false));
    assert_eq!(body["emails"][0]["value"], json!("barbara@example.com"));
    assert_eq!(body["emails"][1]["value"], json!("babs@jensen.org"));
    assert!(body.get("phoneNumbers").is_none());
    assert_eq!(body["nickName"], json!("B"));
    assert_eq!(body["title"], json!("Senior Tour Guide"));
}

#[tokio::test]
async fn test_patch_extension_attribute() {
    let dispatcher = dispatcher();
    let id = create(&dispatcher, "/Users", json!({"userName": "bjensen"})).await;

    let path = format!("{ENTERPRISE_USER_SCHEMA_URN}:department");
    let response = send(
        &dispatcher,
        Method::PATCH,
        &format!("/Users/{id}"),
        Some(patch_requests::patch(json!([
            {"op": "add", "path": path, "value": "Tour Operations"}
        ]))),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let body = body_of(&response);
    assert_eq!(
        body[ENTERPRISE_USER_SCHEMA_URN]["department"],
        json!("Tour Operations")
    );
    assert_eq!(body["schemas"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_patch_rejections() {
    let dispatcher = dispatcher();
    let id = create(&dispatcher, "/Users", json!({"userName": "bjensen"})).await;
    let target = format!("/Users/{id}");

    let undeclared = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(patch_requests::patch(json!([
            {"op": "replace", "path": "shoeSize", "value": 44}
        ]))),
    )
    .await;
    assert_scim_error!(undeclared, StatusCode::BAD_REQUEST, Some("invalidPath"));

    let wrong_type = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(patch_requests::patch(json!([
            {"op": "replace", "path": "active", "value": "False"}
        ]))),
    )
    .await;
    assert_scim_error!(wrong_type, StatusCode::BAD_REQUEST, Some("invalidValue"));

    let not_a_patch = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(json!({"userName": "bjensen"})),
    )
    .await;
    assert_eq!(not_a_patch.status, StatusCode::BAD_REQUEST);

    let remove_required = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(patch_requests::patch(json!([{"op": "remove", "path": "userName"}]))),
    )
    .await;
    assert_scim_error!(remove_required, StatusCode::BAD_REQUEST, Some("invalidValue"));

    let no_target = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(patch_requests::patch(json!([
            {"op": "replace", "path": "emails[type eq \"home\"].value", "value": "x@example.com"}
        ]))),
    )
    .await;
    assert_scim_error!(no_target, StatusCode::BAD_REQUEST, Some("noTarget"));

    // nothing above changed the stored resource
    let stored = send(&dispatcher, Method::GET, &target, None).await;
    let body = body_of(&stored);
    assert_eq!(body["userName"], json!("bjensen"));
    assert!(body.get("active").is_none());
}

#[tokio::test]
async fn test_patch_unknown_id_is_404() {
    let dispatcher = dispatcher();
    let response = send(
        &dispatcher,
        Method::PATCH,
        "/Users/missing",
        Some(patch_requests::deactivate()),
    )
    .await;
    assert_scim_error!(response, StatusCode::NOT_FOUND, None);
}

#[tokio::test]
async fn test_group_membership() {
    let dispatcher = dispatcher();
    let babs = create(&dispatcher, "/Users", json!({"userName": "bjensen"})).await;
    let mandy = create(&dispatcher, "/Users", json!({"userName": "mpepperidge"})).await;
    let group = create(&dispatcher, "/Groups", rfc_examples::group(&babs)).await;
    let target = format!("/Groups/{group}");

    let added = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(patch_requests::add_member(&mandy)),
    )
    .await;
    assert_eq!(added.status, StatusCode::OK, "{:?}", added.body);
    assert_eq!(body_of(&added)["members"].as_array().map(Vec::len), Some(2));

    let removed = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(patch_requests::remove_member(&babs)),
    )
    .await;
    assert_eq!(removed.status, StatusCode::OK, "{:?}", removed.body);
    assert_eq!(
        body_of(&removed)["members"],
        json!([{"value": mandy, "type": "User"}])
    );
    assert_eq!(body_of(&removed)["meta"]["resourceType"], json!("Group"));
}

#[tokio::test]
async fn test_list_pagination() {
    let dispatcher = dispatcher();
    for name in ["alice", "bob", "carol", "dave", "erin"] {
        create(&dispatcher, "/Users", json!({ "userName": name })).await;
    }

    let page = send(&dispatcher, Method::GET, "/Users?startIndex=2&count=2", None).await;
    assert_eq!(page.status, StatusCode::OK);
    let body = body_of(&page);
    assert_eq!(
        body["schemas"],
        json!(["urn:ietf:params:scim:api:messages:2.0:ListResponse"])
    );
    assert_eq!(body["totalResults"], json!(5));
    assert_eq!(body["itemsPerPage"], json!(2));
    assert_eq!(body["startIndex"], json!(2));
    assert_eq!(body["Resources"].as_array().map(Vec::len), Some(2));
    assert!(body["Resources"][0]["meta"]["location"].is_string());

    let clamped = send(&dispatcher, Method::GET, "/Users?startIndex=-3&count=-1", None).await;
    let body = body_of(&clamped);
    assert_eq!(body["startIndex"], json!(1));
    assert_eq!(body["itemsPerPage"], json!(0));
    assert_eq!(body["totalResults"], json!(5));

    let past_the_end = send(&dispatcher, Method::GET, "/Users?startIndex=10", None).await;
    assert_eq!(body_of(&past_the_end)["Resources"], json!([]));

    let invalid = send(&dispatcher, Method::GET, "/Users?count=many", None).await;
    assert_scim_error!(invalid, StatusCode::BAD_REQUEST, Some("invalidValue"));
}

#[tokio::test]
async fn test_list_filter() {
    let dispatcher = dispatcher();
    create(&dispatcher, "/Users", json!({"userName": "bjensen", "emails": [{"value": "b@example.com"}]})).await;
    create(&dispatcher, "/Users", json!({"userName": "mpepperidge"})).await;

    let by_name = send(
        &dispatcher,
        Method::GET,
        "/Users?filter=userName%20eq%20%22BJENSEN%22",
        None,
    )
    .await;
    let body = body_of(&by_name);
    assert_eq!(body["totalResults"], json!(1));
    assert_eq!(body["Resources"][0]["userName"], json!("bjensen"));

    let by_email = send(
        &dispatcher,
        Method::GET,
        "/Users?filter=emails.value+eq+%22b%40example.com%22",
        None,
    )
    .await;
    assert_eq!(body_of(&by_email)["totalResults"], json!(1));

    let unsupported = send(
        &dispatcher,
        Method::GET,
        "/Users?filter=userName%20sw%20%22b%22",
        None,
    )
    .await;
    assert_scim_error!(unsupported, StatusCode::BAD_REQUEST, Some("invalidFilter"));
}

/// `/Devices` with a required multi-valued `tags`, and `/Employees` whose enterprise
/// extension is required.
fn strict_dispatcher() -> ScimDispatcher<InMemoryProvider> {
    init_logging();
    let device = Schema::from_json(
        r#"{
            "id": "urn:example:Device",
            "name": "Device",
            "attributes": [{
                "name": "tags", "type": "complex", "multiValued": true, "required": true,
                "subAttributes": [
                    {"name": "type", "type": "string"},
                    {"name": "value", "type": "string", "required": true}
                ]
            }]
        }"#,
    )
    .unwrap();
    let employee = ResourceType::core_user()
        .unwrap()
        .schema()
        .clone();
    let enterprise = Schema::from_json(enterprise_user_schema()).unwrap();

    let server = ScimServerBuilder::new(InMemoryProvider::new())
        .with_base_url(BASE_URL)
        .register_resource_type(ResourceType::new("Device", "/Devices", device))
        .register_resource_type(
            ResourceType::new("Employee", "/Employees", employee).with_extension(enterprise, true),
        )
        .build()
        .unwrap();
    ScimDispatcher::new(server)
}

#[tokio::test]
async fn test_patch_cannot_leave_resource_invalid() {
    let dispatcher = strict_dispatcher();
    let id = create(
        &dispatcher,
        "/Devices",
        json!({"tags": [{"type": "a", "value": "x"}]}),
    )
    .await;
    let target = format!("/Devices/{id}");
    let before = send(&dispatcher, Method::GET, &target, None).await;

    let emptied = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(patch_requests::patch(json!([
            {"op": "remove", "path": "tags[type eq \"a\"]"}
        ]))),
    )
    .await;
    assert_scim_error!(emptied, StatusCode::BAD_REQUEST, Some("invalidValue"));
    assert!(body_of(&emptied)["detail"].as_str().unwrap().contains("tags"));

    let incomplete = send(
        &dispatcher,
        Method::PATCH,
        &target,
        Some(patch_requests::patch(json!([
            {"op": "add", "path": "tags", "value": [{"type": "b"}]}
        ]))),
    )
    .await;
    assert_scim_error!(incomplete, StatusCode::BAD_REQUEST, Some("invalidValue"));

    let after = send(&dispatcher, Method::GET, &target, None).await;
    assert_eq!(body_of(&after), body_of(&before));
    assert_eq!(after.header(&ETAG), before.header(&ETAG));
}

#[tokio::test]
async fn test_patch_cannot_remove_required_extension() {
    let dispatcher = strict_dispatcher();
    let id = create(
        &dispatcher,
        "/Employees",
        json!({
            "userName": "bjensen",
            ENTERPRISE_USER_SCHEMA_URN: {"employeeNumber": "701984"}
        }),
    )
    .await;

    let response = send(
        &dispatcher,
        Method::PATCH,
        &format!("/Employees/{id}"),
        Some(patch_requests::patch(json!([
            {"op": "remove", "path": ENTERPRISE_USER_SCHEMA_URN}
        ]))),
    )
    .await;
    assert_scim_error!(response, StatusCode::BAD_REQUEST, Some("invalidValue"));
}
