//! Schema definitions and validation for SCIM resources.
//!
//! This module provides the attribute model, the schema registry and the validation
//! engine for RFC 7643 schemas.
//!
//! # Key Types
//!
//! - [`CoreAttribute`] / [`SimpleParams`] / [`ComplexParams`] - attribute descriptions
//! - [`Schema`] - checked, immutable schema with a [`Schema::validate`] entry point
//! - [`SchemaDefinition`] - serde form of an RFC 7643 schema document
//! - [`SchemaRegistry`] - schemas by id
//!
//! # Examples
//!
//! ```rust
//! use scim_provisioning::schema::{
//!     AttributeParams, CoreAttribute, Schema, SimpleParams,
//! };
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::new(
//!     "urn:example:Device",
//!     "Device",
//!     None,
//!     vec![CoreAttribute::simple(SimpleParams::string(
//!         AttributeParams::new("serial").required(true),
//!     ))?],
//! )?;
//!
//! let canonical = schema.validate(&json!({"SERIAL": "A-1", "ignored": true}))?;
//! assert_eq!(canonical.to_json(), json!({"serial": "A-1"}));
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod definition;
pub mod embedded;
pub mod registry;
pub mod types;
pub mod validation;


// Re-export the main types for convenience
pub use attribute::{
    AttributeParams, BinaryParams, BooleanParams, ComplexParams, CoreAttribute, DateTimeParams,
    NumberParams, ReferenceParams, SimpleParams, StringParams,
};
pub use definition::{AttributeDefinition, AttributeType, SchemaDefinition};
pub use registry::SchemaRegistry;
pub use types::{Mutability, NumberType, Returned, Schema, Uniqueness};
pub use validation::AttributePath;
