//! Attribute parameter types.
//!
//! Every attribute of a schema is described by an immutable parameter value. The set of
//! attribute kinds is fixed by RFC 7643, so kinds are closed enums:
//!
//! - [`SimpleParams`] covers the primitive kinds (string, boolean, number, dateTime,
//!   binary, reference).
//! - [`ComplexParams`] holds an ordered list of *simple* sub-attributes. A complex
//!   attribute nested inside another complex attribute cannot be expressed.
//! - [`CoreAttribute`] is a top-level attribute of a schema, either simple or complex.
//!
//! Names must match `[A-Za-z][A-Za-z0-9_-]*`. Lookups are case-insensitive, so two
//! names that lowercase to the same key collide.

use super::types::{Mutability, NumberType, Returned, Uniqueness};
use crate::error::{DefinitionResult, SchemaDefinitionError};

/// Characteristics shared by every attribute kind.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeParams {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub multi_valued: bool,
    pub case_exact: bool,
    pub mutability: Mutability,
    pub returned: Returned,
    pub uniqueness: Uniqueness,
}

impl AttributeParams {
    /// Optional, singular, read-write attribute with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: false,
            multi_valued: false,
            case_exact: false,
            mutability: Mutability::default(),
            returned: Returned::default(),
            uniqueness: Uniqueness::default(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.multi_valued = multi_valued;
        self
    }

    pub fn case_exact(mut self, case_exact: bool) -> Self {
        self.case_exact = case_exact;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn returned(mut self, returned: Returned) -> Self {
        self.returned = returned;
        self
    }

    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// Case-insensitive identity key of this attribute.
    pub fn key(&self) -> String {
        fold(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringParams {
    pub attribute: AttributeParams,
    pub canonical_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanParams {
    pub attribute: AttributeParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberParams {
    pub attribute: AttributeParams,
    pub number_type: NumberType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeParams {
    pub attribute: AttributeParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryParams {
    pub attribute: AttributeParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceParams {
    pub attribute: AttributeParams,
    /// Resource types the reference may point at (`User`, `Group`, `external`, `uri`)
    pub reference_types: Vec<String>,
}

/// Parameters of a simple (non-complex) attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleParams {
    String(StringParams),
    Boolean(BooleanParams),
    Number(NumberParams),
    DateTime(DateTimeParams),
    Binary(BinaryParams),
    Reference(ReferenceParams),
}

impl SimpleParams {
    pub fn string(attribute: AttributeParams) -> Self {
        Self::String(StringParams {
            attribute,
            canonical_values: Vec::new(),
        })
    }

    pub fn string_with_canonical_values(
        attribute: AttributeParams,
        canonical_values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::String(StringParams {
            attribute,
            canonical_values: canonical_values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn boolean(attribute: AttributeParams) -> Self {
        Self::Boolean(BooleanParams { attribute })
    }

    pub fn integer(attribute: AttributeParams) -> Self {
        Self::Number(NumberParams {
            attribute,
            number_type: NumberType::Integer,
        })
    }

    pub fn decimal(attribute: AttributeParams) -> Self {
        Self::Number(NumberParams {
            attribute,
            number_type: NumberType::Decimal,
        })
    }

    pub fn date_time(attribute: AttributeParams) -> Self {
        Self::DateTime(DateTimeParams { attribute })
    }

    pub fn binary(attribute: AttributeParams) -> Self {
        Self::Binary(BinaryParams { attribute })
    }

    pub fn reference(
        attribute: AttributeParams,
        reference_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Reference(ReferenceParams {
            attribute,
            reference_types: reference_types.into_iter().map(Into::into).collect(),
        })
    }

    pub fn attribute(&self) -> &AttributeParams {
        match self {
            SimpleParams::String(p) => &p.attribute,
            SimpleParams::Boolean(p) => &p.attribute,
            SimpleParams::Number(p) => &p.attribute,
            SimpleParams::DateTime(p) => &p.attribute,
            SimpleParams::Binary(p) => &p.attribute,
            SimpleParams::Reference(p) => &p.attribute,
        }
    }

    pub fn name(&self) -> &str {
        &self.attribute().name
    }

    /// RFC 7643 type name (`string`, `integer`, `dateTime`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            SimpleParams::String(_) => "string",
            SimpleParams::Boolean(_) => "boolean",
            SimpleParams::Number(p) => match p.number_type {
                NumberType::Integer => "integer",
                NumberType::Decimal => "decimal",
            },
            SimpleParams::DateTime(_) => "dateTime",
            SimpleParams::Binary(_) => "binary",
            SimpleParams::Reference(_) => "reference",
        }
    }
}

/// Parameters of a complex attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexParams {
    pub attribute: AttributeParams,
    pub sub_attributes: Vec<SimpleParams>,
}

impl ComplexParams {
    pub fn new(attribute: AttributeParams, sub_attributes: Vec<SimpleParams>) -> Self {
        Self {
            attribute,
            sub_attributes,
        }
    }

    /// Case-insensitive sub-attribute lookup.
    pub fn sub_attribute(&self, name: &str) -> Option<&SimpleParams> {
        let key = fold(name);
        self.sub_attributes
            .iter()
            .find(|sub| sub.attribute().key() == key)
    }
}

/// A top-level attribute of a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreAttribute {
    Simple(SimpleParams),
    Complex(ComplexParams),
}

impl CoreAttribute {
    /// Build a simple attribute, checking the name grammar.
    pub fn simple(params: SimpleParams) -> DefinitionResult<Self> {
        check_attribute_name(params.name())?;
        Ok(Self::Simple(params))
    }

    /// Build a complex attribute, checking its own name and every sub-attribute name,
    /// and rejecting sub-attributes whose names collide case-insensitively.
    pub fn complex(params: ComplexParams) -> DefinitionResult<Self> {
        let attribute = Self::Complex(params);
        attribute.check()?;
        Ok(attribute)
    }

    pub fn attribute(&self) -> &AttributeParams {
        match self {
            CoreAttribute::Simple(params) => params.attribute(),
            CoreAttribute::Complex(params) => &params.attribute,
        }
    }

    pub fn name(&self) -> &str {
        &self.attribute().name
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CoreAttribute::Simple(params) => params.type_name(),
            CoreAttribute::Complex(_) => "complex",
        }
    }

    /// Re-run the construction checks. `Schema::new` calls this for every attribute, so
    /// values assembled directly from the enum variants are held to the same rules.
    pub(crate) fn check(&self) -> DefinitionResult<()> {
        check_attribute_name(self.name())?;
        if let CoreAttribute::Complex(params) = self {
            let mut seen: Vec<(String, &str)> = Vec::with_capacity(params.sub_attributes.len());
            for sub in &params.sub_attributes {
                check_attribute_name(sub.name())?;
                let key = sub.attribute().key();
                if let Some((_, existing)) = seen.iter().find(|(k, _)| *k == key) {
                    return Err(SchemaDefinitionError::DuplicateAttributeName {
                        scope: params.attribute.name.clone(),
                        name: sub.name().to_string(),
                        existing: existing.to_string(),
                    });
                }
                seen.push((key, sub.name()));
            }
        }
        Ok(())
    }
}

/// Case-insensitive identity key for an attribute name or an input key.
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Whether `name` matches `[A-Za-z][A-Za-z0-9_-]*`.
pub fn is_valid_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

fn check_attribute_name(name: &str) -> DefinitionResult<()> {
    if is_valid_attribute_name(name) {
        Ok(())
    } else {
        Err(SchemaDefinitionError::InvalidAttributeName {
            name: name.to_string(),
        })
    }
}
