//! Validation tests module.
//!
//! Exercises the schema validation engine through the public API: schemas built in
//! code, schemas loaded from JSON documents and the embedded RFC 7643 schemas.

pub mod complex_attributes;
pub mod data_types;
pub mod properties;

use scim_provisioning::schema::{AttributeParams, CoreAttribute, Schema, SimpleParams};

/// One required string attribute `required` and one required multi-valued boolean
/// attribute `booleans`.
pub fn required_and_booleans() -> Schema {
    Schema::new(
        "urn:example:params:scim:schemas:Test",
        "Test",
        None,
        vec![
            CoreAttribute::simple(SimpleParams::string(
                AttributeParams::new("required").required(true),
            ))
            .expect("valid attribute"),
            CoreAttribute::simple(SimpleParams::boolean(
                AttributeParams::new("booleans")
                    .required(true)
                    .multi_valued(true),
            ))
            .expect("valid attribute"),
        ],
    )
    .expect("valid schema")
}

/// A schema with a single optional attribute of the given kind, named `value`.
pub fn single(params: SimpleParams) -> Schema {
    Schema::new(
        "urn:example:params:scim:schemas:Single",
        "Single",
        None,
        vec![CoreAttribute::simple(params).expect("valid attribute")],
    )
    .expect("valid schema")
}
