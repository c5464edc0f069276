//! Request sequences as sent by identity providers during provisioning.

use crate::common::fixtures::patch_requests;
use crate::common::{body_of, create, dispatcher, send};
use futures::future::join_all;
use http::{Method, StatusCode};
use serde_json::json;

/// Look-up-then-create, then deactivate with a path-less replace.
#[tokio::test]
async fn test_okta_style_provisioning() {
    let dispatcher = dispatcher();
    let lookup = "/scim/v2/Users?filter=userName%20eq%20%22dev%40example.com%22&startIndex=1&count=100";

    // the dispatcher only sees paths below the SCIM base
    let lookup = lookup.trim_start_matches("/scim");
    let before = send(&dispatcher, Method::GET, lookup, None).await;
    assert_eq!(body_of(&before)["totalResults"], json!(0));
    assert_eq!(body_of(&before)["Resources"], json!([]));

    let id = create(
        &dispatcher,
        "/v2/Users",
        json!({
            "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
            "userName": "dev@example.com",
            "name": {"givenName": "Dev", "familyName": "Eloper"},
            "emails": [{"primary": true, "value": "dev@example.com", "type": "work"}],
            "displayName": "Dev Eloper",
            "locale": "en-US",
            "externalId": "00u1abcd",
            "groups": [],
            "password": "Sup3r$ecret",
            "active": true
        }),
    )
    .await;

    let after = send(&dispatcher, Method::GET, lookup, None).await;
    assert_eq!(body_of(&after)["totalResults"], json!(1));
    assert_eq!(body_of(&after)["Resources"][0]["id"], json!(id));

    let deactivated = send(
        &dispatcher,
        Method::PATCH,
        &format!("/v2/Users/{id}"),
        Some(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
            "Operations": [{"op": "replace", "value": {"active": false}}]
        })),
    )
    .await;
    assert_eq!(deactivated.status, StatusCode::OK, "{:?}", deactivated.body);
    assert_eq!(body_of(&deactivated)["active"], json!(false));
    assert!(body_of(&deactivated).get("password").is_none());
}

/// Capitalized ops, extension paths and group membership.
#[tokio::test]
async fn test_entra_style_provisioning() {
    let dispatcher = dispatcher();
    let user = create(
        &dispatcher,
        "/Users",
        json!({
            "schemas": [
                "urn:ietf:params:scim:schemas:core:2.0:User",
                "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"
            ],
            "externalId": "0a21f0f2-8d2a-4f8e-bf98-7363c4aed4ef",
            "userName": "Test_User_ab6490ee-1e48-479e-a20b-2d77186b5dd1",
            "active": true,
            "emails": [{"primary": true, "type": "work", "value": "Test_User_fd0ea19b@testuser.com"}],
            "meta": {"resourceType": "User"},
            "name": {"formatted": "givenName familyName", "familyName": "familyName", "givenName": "givenName"},
            "roles": []
        }),
    )
    .await;

    let updated = send(
        &dispatcher,
        Method::PATCH,
        &format!("/Users/{user}"),
        Some(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
            "Operations": [
                {"op": "Replace", "path": "displayName", "value": "Test User"},
                {"op": "Add", "path": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department", "value": "Engineering"},
                {"op": "Replace", "path": "emails[type eq \"work\"].value", "value": "updated@testuser.com"}
            ]
        })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK, "{:?}", updated.body);
    let body = body_of(&updated);
    assert_eq!(body["displayName"], json!("Test User"));
    assert_eq!(body["emails"][0]["value"], json!("updated@testuser.com"));
    assert_eq!(
        body["urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"]["department"],
        json!("Engineering")
    );

    let group = create(
        &dispatcher,
        "/Groups",
        json!({
            "schemas": ["urn:ietf:params:scim:schemas:core:2.0:Group"],
            "externalId": "8aa1a0c0-c4c3-4bc0-b4a5-2ef676900159",
            "displayName": "Group1DisplayName",
            "meta": {"resourceType": "Group"}
        }),
    )
    .await;

    let membership = send(
        &dispatcher,
        Method::PATCH,
        &format!("/Groups/{group}"),
        Some(patch_requests::add_member(&user)),
    )
    .await;
    assert_eq!(membership.status, StatusCode::OK, "{:?}", membership.body);
    assert_eq!(body_of(&membership)["members"][0]["value"], json!(user));

    let deleted = send(&dispatcher, Method::DELETE, &format!("/Users/{user}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

/// Concurrent requests against one dispatcher: distinct users all succeed, racing
/// creates of the same userName produce exactly one resource.
#[tokio::test]
async fn test_concurrent_provisioning() {
    let dispatcher = dispatcher();

    let distinct = join_all((0..20).map(|i| {
        send(
            &dispatcher,
            Method::POST,
            "/Users",
            Some(json!({ "userName": format!("user{i}") })),
        )
    }))
    .await;
    assert!(distinct.iter().all(|r| r.status == StatusCode::CREATED));

    let racing = join_all((0..10).map(|_| {
        send(
            &dispatcher,
            Method::POST,
            "/Users",
            Some(json!({"userName": "same"})),
        )
    }))
    .await;
    let created = racing
        .iter()
        .filter(|r| r.status == StatusCode::CREATED)
        .count();
    let conflicts = racing
        .iter()
        .filter(|r| r.status == StatusCode::CONFLICT)
        .count();
    assert_eq!((created, conflicts), (1, 9));

    let list = send(&dispatcher, Method::GET, "/Users?count=100", None).await;
    assert_eq!(body_of(&list)["totalResults"], json!(21));
}

#[tokio::test]
async fn test_tasks_share_one_dispatcher() {
    let dispatcher = dispatcher();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                send(
                    &dispatcher,
                    Method::POST,
                    "/Groups",
                    Some(json!({ "displayName": format!("group-{i}") })),
                )
                .await
                .status
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }
    let list = send(&dispatcher, Method::GET, "/Groups", None).await;
    assert_eq!(body_of(&list)["totalResults"], json!(8));
}
