//! Complex attribute validation tests.
//!
//! Complex and multi-valued attributes of the embedded User and Group schemas, the
//! enterprise extension and case-insensitive attribute names.

use crate::common::fixtures::rfc_examples;
use scim_provisioning::error::ValidationError;
use scim_provisioning::schema::embedded::ENTERPRISE_USER_SCHEMA_URN;
use scim_provisioning::{ResourceType, Schema};
use serde_json::json;

fn user_type() -> ResourceType {
    ResourceType::core_user().expect("embedded user schema")
}

fn user_schema() -> std::sync::Arc<Schema> {
    user_type().schema().clone()
}

#[test]
fn test_rfc_full_user_is_canonicalized() {
    let canonical = user_type().validate(&rfc_examples::user_full()).unwrap();
    let json = canonical.to_json();

    assert_eq!(json["userName"], json!("bjensen@example.com"));
    assert_eq!(json["externalId"], json!("701984"));
    assert_eq!(json["name"]["givenName"], json!("Barbara"));
    assert_eq!(json["emails"].as_array().map(Vec::len), Some(2));
    // server-owned attributes are not part of the canonical form
    assert!(json.get("id").is_none());
    assert!(json.get("meta").is_none());
    assert!(json.get("schemas").is_none());
}

#[test]
fn test_names_match_case_insensitively() {
    let canonical = user_schema()
        .validate(&json!({
            "USERNAME": "bjensen",
            "Name": {"GIVENNAME": "Barbara"},
            "emails": [{"VALUE": "bjensen@example.com", "Type": "work"}]
        }))
        .unwrap();
    assert_eq!(
        canonical.to_json(),
        json!({
            "userName": "bjensen",
            "name": {"givenName": "Barbara"},
            "emails": [{"value": "bjensen@example.com", "type": "work"}]
        })
    );
}

#[test]
fn test_colliding_names_are_rejected() {
    let result = user_schema().validate(&json!({"userName": "a", "USERNAME": "b"}));
    assert!(matches!(
        result,
        Err(ValidationError::DuplicateAttributeName { .. })
    ));

    let nested = user_schema().validate(&json!({
        "userName": "a",
        "name": {"givenName": "B", "givenname": "C"}
    }));
    assert!(matches!(
        nested,
        Err(ValidationError::DuplicateAttributeName { ref path }) if path.starts_with("name.")
    ));
}

#[test]
fn test_complex_attribute_requires_object() {
    let result = user_schema().validate(&json!({"userName": "a", "name": "Barbara Jensen"}));
    assert!(matches!(
        result,
        Err(ValidationError::InvalidType { ref path, .. }) if path == "name"
    ));
}

#[test]
fn test_multi_valued_requires_array() {
    let result = user_schema().validate(&json!({
        "userName": "a",
        "emails": {"value": "bjensen@example.com"}
    }));
    assert!(matches!(
        result,
        Err(ValidationError::InvalidType { ref path, .. }) if path == "emails"
    ));
}

#[test]
fn test_sub_attribute_types_are_checked() {
    let result = user_schema().validate(&json!({
        "userName": "a",
        "emails": [{"value": "bjensen@example.com", "primary": "yes"}]
    }));
    assert!(matches!(
        result,
        Err(ValidationError::InvalidType { ref path, .. }) if path == "emails.primary"
    ));
}

#[test]
fn test_empty_optional_multi_valued_is_omitted() {
    let canonical = user_schema()
        .validate(&json!({"userName": "a", "emails": []}))
        .unwrap();
    assert!(!canonical.contains("emails"));
}

#[test]
fn test_enterprise_extension() {
    let canonical = user_type()
        .validate(&rfc_examples::enterprise_user())
        .unwrap();
    let json = canonical.to_json();
    assert_eq!(
        json[ENTERPRISE_USER_SCHEMA_URN]["manager"]["value"],
        json!("26118915-6090-4610-87e4-49d8ca9f808d")
    );
    assert_eq!(
        user_type().schema_urns(&canonical),
        vec![
            "urn:ietf:params:scim:schemas:core:2.0:User".to_string(),
            ENTERPRISE_USER_SCHEMA_URN.to_string()
        ]
    );
}

#[test]
fn test_enterprise_extension_errors_name_the_extension() {
    let mut user = rfc_examples::enterprise_user();
    user[ENTERPRISE_USER_SCHEMA_URN]["costCenter"] = json!(4130);
    assert!(matches!(
        user_type().validate(&user),
        Err(ValidationError::InvalidType { ref path, .. })
            if path == &format!("{ENTERPRISE_USER_SCHEMA_URN}:costCenter")
    ));
}

#[test]
fn test_group_members() {
    let group_type = ResourceType::core_group().unwrap();
    let canonical = group_type.validate(&rfc_examples::group("2819c223")).unwrap();
    assert_eq!(
        canonical.to_json()["members"],
        json!([{"value": "2819c223", "display": "Babs Jensen", "type": "User"}])
    );

    let missing = group_type.validate(&json!({"members": []}));
    assert_eq!(missing, Err(ValidationError::missing("displayName")));
}

#[test]
fn test_password_is_accepted_but_never_returned() {
    let user_type = user_type();
    let canonical = user_type.validate(&rfc_examples::user_full()).unwrap();
    assert!(canonical.contains("password"));
    assert!(!user_type.returnable(&canonical).contains("password"));
}
