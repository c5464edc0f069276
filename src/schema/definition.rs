//! RFC 7643 schema documents.
//!
//! [`SchemaDefinition`] is the serde form of a schema as it appears in JSON files and
//! on the `/Schemas` endpoint. Converting it into a [`Schema`] runs the same checks as
//! [`Schema::new`], so a schema loaded from disk is held to the same rules as one
//! assembled in code.

use super::attribute::{
    AttributeParams, ComplexParams, CoreAttribute, SimpleParams,
};
use super::types::{Mutability, NumberType, Returned, Schema, Uniqueness};
use crate::error::{DefinitionResult, SchemaDefinitionError};
use serde::{Deserialize, Serialize};

/// URN of the schema describing schema documents themselves.
pub const SCHEMA_SCHEMA_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:Schema";

/// A SCIM schema document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaDefinition {
    /// Unique schema identifier (URI)
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

/// Definition of a SCIM attribute inside a schema document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: AttributeType,
    #[serde(default)]
    pub multi_valued: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub case_exact: bool,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub returned: Returned,
    #[serde(default)]
    pub uniqueness: Uniqueness,
    /// Allowed values for string attributes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub canonical_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_types: Vec<String>,
    /// Sub-attributes for complex types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_attributes: Vec<AttributeDefinition>,
}

/// SCIM attribute data types as spelled in schema documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    String,
    Boolean,
    Decimal,
    Integer,
    /// RFC 3339 timestamp
    DateTime,
    /// Base64 encoded bytes
    Binary,
    Reference,
    Complex,
}

impl SchemaDefinition {
    /// Parse a schema document from JSON text.
    pub fn from_json(content: &str) -> DefinitionResult<Self> {
        serde_json::from_str(content).map_err(|e| SchemaDefinitionError::InvalidDefinition {
            scope: "schema document".to_string(),
            message: e.to_string(),
        })
    }
}

impl TryFrom<SchemaDefinition> for Schema {
    type Error = SchemaDefinitionError;

    fn try_from(definition: SchemaDefinition) -> Result<Self, Self::Error> {
        let attributes = definition
            .attributes
            .into_iter()
            .map(|attribute| core_attribute(&definition.id, attribute))
            .collect::<DefinitionResult<Vec<_>>>()?;
        Schema::new(
            definition.id,
            definition.name,
            definition.description,
            attributes,
        )
    }
}

impl Schema {
    /// Parse and check a schema document in one step.
    pub fn from_json(content: &str) -> DefinitionResult<Self> {
        Schema::try_from(SchemaDefinition::from_json(content)?)
    }

    /// Render the schema as an RFC 7643 schema document.
    pub fn to_definition(&self) -> SchemaDefinition {
        SchemaDefinition {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().map(str::to_string),
            attributes: self
                .attributes()
                .iter()
                .map(|attribute| match attribute {
                    CoreAttribute::Simple(params) => simple_definition(params),
                    CoreAttribute::Complex(params) => {
                        let mut definition =
                            base_definition(&params.attribute, AttributeType::Complex);
                        definition.sub_attributes =
                            params.sub_attributes.iter().map(simple_definition).collect();
                        definition
                    }
                })
                .collect(),
        }
    }
}

fn core_attribute(
    schema_id: &str,
    definition: AttributeDefinition,
) -> DefinitionResult<CoreAttribute> {
    if definition.data_type != AttributeType::Complex {
        return CoreAttribute::simple(simple_params(schema_id, definition)?);
    }

    if definition.sub_attributes.is_empty() {
        return Err(SchemaDefinitionError::InvalidDefinition {
            scope: schema_id.to_string(),
            message: format!("complex attribute '{}' has no sub-attributes", definition.name),
        });
    }

    let attribute = attribute_params(&definition);
    let sub_attributes = definition
        .sub_attributes
        .into_iter()
        .map(|sub| {
            if sub.data_type == AttributeType::Complex {
                Err(SchemaDefinitionError::InvalidDefinition {
                    scope: schema_id.to_string(),
                    message: format!(
                        "complex attribute '{}' cannot contain complex sub-attribute '{}'",
                        attribute.name, sub.name
                    ),
                })
            } else {
                simple_params(schema_id, sub)
            }
        })
        .collect::<DefinitionResult<Vec<_>>>()?;

    CoreAttribute::complex(ComplexParams::new(attribute, sub_attributes))
}

fn simple_params(schema_id: &str, definition: AttributeDefinition) -> DefinitionResult<SimpleParams> {
    if !definition.sub_attributes.is_empty() {
        return Err(SchemaDefinitionError::InvalidDefinition {
            scope: schema_id.to_string(),
            message: format!(
                "attribute '{}' of type {:?} cannot declare sub-attributes",
                definition.name, definition.data_type
            ),
        });
    }

    let attribute = attribute_params(&definition);
    Ok(match definition.data_type {
        AttributeType::String => {
            SimpleParams::string_with_canonical_values(attribute, definition.canonical_values)
        }
        AttributeType::Boolean => SimpleParams::boolean(attribute),
        AttributeType::Integer => SimpleParams::integer(attribute),
        AttributeType::Decimal => SimpleParams::decimal(attribute),
        AttributeType::DateTime => SimpleParams::date_time(attribute),
        AttributeType::Binary => SimpleParams::binary(attribute),
        AttributeType::Reference => {
            SimpleParams::reference(attribute, definition.reference_types)
        }
        AttributeType::Complex => {
            return Err(SchemaDefinitionError::InvalidDefinition {
                scope: schema_id.to_string(),
                message: format!("attribute '{}' must be simple here", definition.name),
            });
        }
    })
}

fn attribute_params(definition: &AttributeDefinition) -> AttributeParams {
    AttributeParams {
        name: definition.name.clone(),
        description: definition.description.clone(),
        required: definition.required,
        multi_valued: definition.multi_valued,
        case_exact: definition.case_exact,
        mutability: definition.mutability,
        returned: definition.returned,
        uniqueness: definition.uniqueness,
    }
}

fn base_definition(attribute: &AttributeParams, data_type: AttributeType) -> AttributeDefinition {
    AttributeDefinition {
        name: attribute.name.clone(),
        data_type,
        multi_valued: attribute.multi_valued,
        description: attribute.description.clone(),
        required: attribute.required,
        case_exact: attribute.case_exact,
        mutability: attribute.mutability,
        returned: attribute.returned,
        uniqueness: attribute.uniqueness,
        canonical_values: Vec::new(),
        reference_types: Vec::new(),
        sub_attributes: Vec::new(),
    }
}

fn simple_definition(params: &SimpleParams) -> AttributeDefinition {
    let data_type = match params {
        SimpleParams::String(_) => AttributeType::String,
        SimpleParams::Boolean(_) => AttributeType::Boolean,
        SimpleParams::Number(p) => match p.number_type {
            NumberType::Integer => AttributeType::Integer,
            NumberType::Decimal => AttributeType::Decimal,
        },
        SimpleParams::DateTime(_) => AttributeType::DateTime,
        SimpleParams::Binary(_) => AttributeType::Binary,
        SimpleParams::Reference(_) => AttributeType::Reference,
    };
    let mut definition = base_definition(params.attribute(), data_type);
    match params {
        SimpleParams::String(p) => definition.canonical_values = p.canonical_values.clone(),
        SimpleParams::Reference(p) => definition.reference_types = p.reference_types.clone(),
        _ => {}
    }
    definition
}
