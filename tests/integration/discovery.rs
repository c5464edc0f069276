//! `/ServiceProviderConfig`, `/Schemas` and `/ResourceTypes`.

use crate::common::{body_of, dispatcher, send};
use http::{Method, StatusCode};
use serde_json::json;

const USER_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
const GROUP_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
const ENTERPRISE_URN: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

#[tokio::test]
async fn test_service_provider_config() {
    let dispatcher = dispatcher();
    let response = send(&dispatcher, Method::GET, "/v2/ServiceProviderConfig", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = body_of(&response);
    assert_eq!(
        body["schemas"],
        json!(["urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig"])
    );
    assert_eq!(body["patch"], json!({"supported": true}));
    assert_eq!(body["bulk"]["supported"], json!(false));
    assert_eq!(body["filter"], json!({"supported": true, "maxResults": 50}));
    assert_eq!(body["etag"], json!({"supported": true}));
    assert_eq!(body["sort"], json!({"supported": false}));
    assert_eq!(body["changePassword"], json!({"supported": false}));
    assert_eq!(
        body["meta"]["location"],
        json!("https://example.com/scim/v2/ServiceProviderConfig")
    );
}

#[tokio::test]
async fn test_resource_types() {
    let dispatcher = dispatcher();
    let response = send(&dispatcher, Method::GET, "/ResourceTypes", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = body_of(&response);
    assert_eq!(body["totalResults"], json!(2));
    let user = &body["Resources"][0];
    assert_eq!(user["id"], json!("User"));
    assert_eq!(user["endpoint"], json!("/Users"));
    assert_eq!(user["schema"], json!(USER_URN));
    assert_eq!(
        user["schemaExtensions"],
        json!([{"schema": ENTERPRISE_URN, "required": false}])
    );
    assert_eq!(body["Resources"][1]["endpoint"], json!("/Groups"));

    let single = send(&dispatcher, Method::GET, "/ResourceTypes/Group", None).await;
    assert_eq!(single.status, StatusCode::OK);
    assert_eq!(body_of(&single)["schema"], json!(GROUP_URN));
    assert_eq!(
        body_of(&single)["meta"]["location"],
        json!("https://example.com/scim/v2/ResourceTypes/Group")
    );

    let unknown = send(&dispatcher, Method::GET, "/ResourceTypes/Device", None).await;
    assert_scim_error!(unknown, StatusCode::NOT_FOUND, None);
}

#[tokio::test]
async fn test_schemas() {
    let dispatcher = dispatcher();
    let response = send(&dispatcher, Method::GET, "/Schemas", None).await;
    let body = body_of(&response);
    assert_eq!(body["totalResults"], json!(3));

    let mut ids: Vec<&str> = body["Resources"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|schema| schema["id"].as_str())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![GROUP_URN, USER_URN, ENTERPRISE_URN]);

    let user = send(&dispatcher, Method::GET, &format!("/Schemas/{USER_URN}"), None).await;
    assert_eq!(user.status, StatusCode::OK);
    let user = body_of(&user);
    assert_eq!(user["name"], json!("User"));
    let user_name = user["attributes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|attribute| attribute["name"] == json!("userName"))
        .expect("userName is declared");
    assert_eq!(user_name["type"], json!("string"));
    assert_eq!(user_name["required"], json!(true));

    let unknown = send(&dispatcher, Method::GET, "/Schemas/urn:example:Nope", None).await;
    assert_scim_error!(unknown, StatusCode::NOT_FOUND, None);
}

#[tokio::test]
async fn test_discovery_endpoints_reject_filters() {
    let dispatcher = dispatcher();
    for target in [
        "/Schemas?filter=id%20eq%20%22x%22",
        "/ResourceTypes?filter=name%20eq%20%22User%22",
        "/ServiceProviderConfig?filter=patch.supported%20eq%20true",
    ] {
        let response = send(&dispatcher, Method::GET, target, None).await;
        assert_scim_error!(response, StatusCode::FORBIDDEN, None);
    }
}
