//! Data type validation tests.
//!
//! Simple attribute kinds are checked strictly: a value is never coerced from one
//! JSON kind into another.

use super::{required_and_booleans, single};
use scim_provisioning::error::{SchemaDefinitionError, ValidationError};
use scim_provisioning::schema::{AttributeParams, Schema, SimpleParams};
use serde_json::json;

fn value_param() -> AttributeParams {
    AttributeParams::new("value")
}

#[test]
fn test_required_attributes_present() {
    let canonical = required_and_booleans()
        .validate(&json!({"required": "present", "booleans": [true]}))
        .unwrap();
    assert!(canonical.contains("required"));
    assert!(canonical.contains("booleans"));
    assert_eq!(
        canonical.to_json(),
        json!({"required": "present", "booleans": [true]})
    );
}

#[test]
fn test_required_attribute_missing() {
    let result = required_and_booleans().validate(&json!({"booleans": [true]}));
    assert_eq!(result, Err(ValidationError::missing("required")));
}

#[test]
fn test_invalid_attribute_name_refuses_schema_document() {
    let document = r#"{
        "id": "urn:example:params:scim:schemas:Broken",
        "name": "Broken",
        "attributes": [{"name": "_Invalid", "type": "string"}]
    }"#;
    assert!(matches!(
        Schema::from_json(document),
        Err(SchemaDefinitionError::InvalidAttributeName { ref name }) if name == "_Invalid"
    ));
}

#[test]
fn test_invalid_attribute_name_refuses_attribute() {
    let result = scim_provisioning::schema::CoreAttribute::simple(SimpleParams::string(
        AttributeParams::new("_Invalid"),
    ));
    assert!(matches!(
        result,
        Err(SchemaDefinitionError::InvalidAttributeName { .. })
    ));
}

#[test]
fn test_string_rejects_other_kinds() {
    let schema = single(SimpleParams::string(value_param()));
    for value in [json!(42), json!(true), json!({"a": "b"}), json!(["a"])] {
        assert!(
            matches!(
                schema.validate(&json!({ "value": value })),
                Err(ValidationError::InvalidType { ref path, .. }) if path == "value"
            ),
            "{value}"
        );
    }
}

#[test]
fn test_boolean_is_strict() {
    let schema = single(SimpleParams::boolean(value_param()));
    assert!(schema.validate(&json!({"value": false})).is_ok());
    for value in [json!("true"), json!(1), json!("False")] {
        assert!(schema.validate(&json!({ "value": value })).is_err(), "{value}");
    }
}

#[test]
fn test_integer_accepts_whole_numbers_only() {
    let schema = single(SimpleParams::integer(value_param()));
    assert_eq!(
        schema.validate(&json!({"value": 11})).unwrap().to_json(),
        json!({"value": 11})
    );
    assert_eq!(
        schema.validate(&json!({"value": 11.0})).unwrap().to_json(),
        json!({"value": 11})
    );
    assert_eq!(
        schema.validate(&json!({"value": 11.5})),
        Err(ValidationError::invalid_type("value", "integer", "fractional number"))
    );
    assert!(schema.validate(&json!({"value": "11"})).is_err());
}

#[test]
fn test_decimal_accepts_any_number() {
    let schema = single(SimpleParams::decimal(value_param()));
    assert!(schema.validate(&json!({"value": 11.5})).is_ok());
    assert!(schema.validate(&json!({"value": -3})).is_ok());
    assert!(schema.validate(&json!({"value": "11.5"})).is_err());
}

#[test]
fn test_binary_requires_base64() {
    let schema = single(SimpleParams::binary(value_param()));
    assert_eq!(
        schema.validate(&json!({"value": "aGVsbG8="})).unwrap().to_json(),
        json!({"value": "aGVsbG8="})
    );
    assert!(matches!(
        schema.validate(&json!({"value": "not base64!"})),
        Err(ValidationError::InvalidType { ref expected, .. }) if expected == "binary"
    ));
}

#[test]
fn test_date_time_requires_rfc3339() {
    let schema = single(SimpleParams::date_time(value_param()));
    assert!(schema.validate(&json!({"value": "2010-01-23T04:56:22Z"})).is_ok());
    assert!(schema.validate(&json!({"value": "2011-05-13T04:42:34.123+02:00"})).is_ok());
    for value in ["2010-01-23", "yesterday", "2010-01-23 04:56:22"] {
        assert!(
            matches!(
                schema.validate(&json!({ "value": value })),
                Err(ValidationError::InvalidType { ref expected, .. }) if expected == "dateTime"
            ),
            "{value}"
        );
    }
}

#[test]
fn test_reference_is_a_string() {
    let schema = single(SimpleParams::reference(value_param(), ["external"]));
    assert!(schema.validate(&json!({"value": "https://example.com/photo.jpg"})).is_ok());
    assert!(schema.validate(&json!({"value": 7})).is_err());
}

#[test]
fn test_null_is_treated_as_absent() {
    let schema = single(SimpleParams::string(value_param()));
    assert!(schema.validate(&json!({"value": null})).unwrap().is_empty());

    let result = required_and_booleans().validate(&json!({"required": null, "booleans": [true]}));
    assert_eq!(result, Err(ValidationError::missing("required")));
}

#[test]
fn test_non_object_resources() {
    for resource in [json!([]), json!("user"), json!(null), json!(1)] {
        assert!(
            matches!(
                required_and_booleans().validate(&resource),
                Err(ValidationError::InvalidResource { .. })
            ),
            "{resource}"
        );
    }
}
