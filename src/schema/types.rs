//! Core schema type definitions for SCIM resources.
//!
//! [`Schema`] is the validated, immutable form of a schema: an id, a name and an
//! ordered list of [`CoreAttribute`]s whose names have been checked against the
//! attribute name grammar and for case-insensitive collisions. The characteristic
//! enums below are the RFC 7643 attribute characteristics carried alongside.

use super::attribute::{CoreAttribute, fold};
use crate::error::{DefinitionResult, SchemaDefinitionError};
use serde::{Deserialize, Serialize};

/// A SCIM schema.
///
/// Built once at startup through [`Schema::new`] (or from a JSON schema document via
/// `TryFrom<SchemaDefinition>`) and then shared read-only between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    id: String,
    name: String,
    description: Option<String>,
    attributes: Vec<CoreAttribute>,
}

impl Schema {
    /// Create a schema, checking every attribute name (recursively) against the
    /// attribute name grammar and rejecting direct attributes that collide once
    /// case-folded.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        attributes: Vec<CoreAttribute>,
    ) -> DefinitionResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SchemaDefinitionError::InvalidDefinition {
                scope: name.into(),
                message: "schema id must not be empty".to_string(),
            });
        }

        let mut seen: Vec<(String, &str)> = Vec::with_capacity(attributes.len());
        for attribute in &attributes {
            attribute.check()?;
            let key = fold(attribute.name());
            if let Some((_, existing)) = seen.iter().find(|(k, _)| *k == key) {
                return Err(SchemaDefinitionError::DuplicateAttributeName {
                    scope: id,
                    name: attribute.name().to_string(),
                    existing: existing.to_string(),
                });
            }
            seen.push((key, attribute.name()));
        }

        Ok(Self {
            id,
            name: name.into(),
            description,
            attributes,
        })
    }

    /// Schema URN, e.g. `urn:ietf:params:scim:schemas:core:2.0:User`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn attributes(&self) -> &[CoreAttribute] {
        &self.attributes
    }

    /// Case-insensitive attribute lookup.
    pub fn attribute(&self, name: &str) -> Option<&CoreAttribute> {
        let key = fold(name);
        self.attributes.iter().find(|a| fold(a.name()) == key)
    }
}

/// Numeric kind of a number attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberType {
    Integer,
    Decimal,
}

/// Attribute mutability characteristics.
///
/// Defines whether and how an attribute can be modified.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Managed by the service provider
    ReadOnly,
    ReadWrite,
    /// Set once, never modified
    Immutable,
    /// Passwords and similar
    WriteOnly,
}

impl Default for Mutability {
    fn default() -> Self {
        Self::ReadWrite
    }
}

/// When an attribute is returned in a response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    Always,
    /// Never rendered, whatever the request asks for
    Never,
    Default,
    Request,
}

impl Default for Returned {
    fn default() -> Self {
        Self::Default
    }
}

/// Attribute uniqueness constraints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    None,
    /// Unique within the service provider
    Server,
    Global,
}

impl Default for Uniqueness {
    fn default() -> Self {
        Self::None
    }
}
