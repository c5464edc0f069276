//! Schema validation engine.
//!
//! Validation turns untyped JSON into canonical [`Attributes`]. For the top-level object
//! and for every complex value below it:
//!
//! 1. the object's keys are folded to lowercase and a collision between two keys fails
//!    with [`ValidationError::DuplicateAttributeName`] before anything else is looked at;
//! 2. every declared attribute is resolved through that folded index. A missing
//!    required attribute fails with [`ValidationError::AttributeMissing`], a missing
//!    optional one is omitted. `null` counts as missing;
//! 3. multi-valued attributes must be arrays, singular ones must not be. An empty array
//!    supplies no value;
//! 4. each value is checked against its kind with no coercion between kinds;
//! 5. the result is keyed by the declared attribute name. Input keys the schema does
//!    not declare are dropped.
//!
//! The engine holds no state and performs no I/O.

use super::attribute::{AttributeParams, ComplexParams, CoreAttribute, SimpleParams, fold};
use super::types::{NumberType, Schema};
use crate::error::{ValidationError, ValidationResult};
use crate::resource::value::{AttributeValue, Attributes};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::DateTime;
use log::trace;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Whether absent required attributes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Enforce,
    Relaxed,
}

impl Schema {
    /// Validate a resource against this schema and return its canonical form.
    pub fn validate(&self, raw: &Value) -> ValidationResult<Attributes> {
        trace!("Validating resource against schema {}", self.id());
        let object = resource_object(raw)?;
        validate_object(self.attributes(), object, "", Presence::Enforce)
    }

    /// Validate a fragment of a resource: the same checks as [`Schema::validate`]
    /// except that absent required attributes are not reported.
    pub fn validate_partial(&self, raw: &Value) -> ValidationResult<Attributes> {
        trace!("Validating partial resource against schema {}", self.id());
        let object = resource_object(raw)?;
        validate_object(self.attributes(), object, "", Presence::Relaxed)
    }

    /// Resolve an attribute path of the form `attr` or `attr.sub`, case-insensitively.
    pub fn resolve_path(&self, path: &str) -> Option<AttributePath<'_>> {
        let (head, tail) = match path.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (path, None),
        };
        let attribute = self.attribute(head)?;
        match (attribute, tail) {
            (attribute, None) => Some(AttributePath::Attribute(attribute)),
            (CoreAttribute::Complex(parent), Some(sub)) => parent
                .sub_attribute(sub)
                .map(|sub| AttributePath::SubAttribute(parent, sub)),
            (CoreAttribute::Simple(_), Some(_)) => None,
        }
    }

    /// Type-check `value` for the attribute at `path`.
    ///
    /// Returns `None` when the path does not name a declared attribute. See
    /// [`AttributePath::validate_value`] for the value rules.
    pub fn validate_attribute_value(
        &self,
        path: &str,
        value: &Value,
    ) -> Option<ValidationResult<Option<AttributeValue>>> {
        self.resolve_path(path).map(|target| target.validate_value(value))
    }
}

/// A resolved attribute path inside one schema.
#[derive(Debug, Clone, Copy)]
pub enum AttributePath<'a> {
    Attribute(&'a CoreAttribute),
    SubAttribute(&'a ComplexParams, &'a SimpleParams),
}

impl AttributePath<'_> {
    /// Dotted path using declared names.
    pub fn display(&self) -> String {
        match self {
            AttributePath::Attribute(attribute) => attribute.name().to_string(),
            AttributePath::SubAttribute(parent, sub) => {
                format!("{}.{}", parent.attribute.name, sub.name())
            }
        }
    }

    pub fn params(&self) -> &AttributeParams {
        match self {
            AttributePath::Attribute(attribute) => attribute.attribute(),
            AttributePath::SubAttribute(_, sub) => sub.attribute(),
        }
    }

    /// Type-check a value for this attribute with required-ness relaxed.
    ///
    /// A multi-valued target accepts a single element as well as an array. `null` and
    /// empty arrays yield `Ok(None)`.
    pub fn validate_value(&self, value: &Value) -> ValidationResult<Option<AttributeValue>> {
        let path = self.display();
        let multi_valued = self.params().multi_valued;
        match self {
            AttributePath::Attribute(attribute) => {
                lenient_value(*attribute, value, &path, multi_valued)
            }
            AttributePath::SubAttribute(_, sub) => lenient_value(*sub, value, &path, multi_valued),
        }
    }
}

fn lenient_value<A: Declared>(
    attribute: &A,
    value: &Value,
    path: &str,
    multi_valued: bool,
) -> ValidationResult<Option<AttributeValue>> {
    if multi_valued && !value.is_array() && !value.is_null() {
        return attribute
            .check_element(value, path, Presence::Relaxed)
            .map(|element| Some(AttributeValue::Multi(vec![element])));
    }
    check_present(attribute, value, path, Presence::Relaxed)
}

/// A declared attribute the engine can validate values for.
trait Declared {
    fn params(&self) -> &AttributeParams;

    /// Validate one element (the whole value for singular attributes).
    fn check_element(
        &self,
        value: &Value,
        path: &str,
        presence: Presence,
    ) -> ValidationResult<AttributeValue>;

    fn kind(&self) -> &'static str;
}

impl Declared for SimpleParams {
    fn params(&self) -> &AttributeParams {
        self.attribute()
    }

    fn check_element(
        &self,
        value: &Value,
        path: &str,
        _presence: Presence,
    ) -> ValidationResult<AttributeValue> {
        check_simple(self, value, path)
    }

    fn kind(&self) -> &'static str {
        self.type_name()
    }
}

impl Declared for CoreAttribute {
    fn params(&self) -> &AttributeParams {
        self.attribute()
    }

    fn check_element(
        &self,
        value: &Value,
        path: &str,
        presence: Presence,
    ) -> ValidationResult<AttributeValue> {
        match self {
            CoreAttribute::Simple(params) => check_simple(params, value, path),
            CoreAttribute::Complex(params) => {
                let object = value.as_object().ok_or_else(|| {
                    ValidationError::invalid_type(path, "complex", json_kind(value))
                })?;
                validate_object(&params.sub_attributes, object, path, presence)
                    .map(AttributeValue::Complex)
            }
        }
    }

    fn kind(&self) -> &'static str {
        self.type_name()
    }
}

fn resource_object(raw: &Value) -> ValidationResult<&Map<String, Value>> {
    raw.as_object().ok_or_else(|| ValidationError::InvalidResource {
        actual: json_kind(raw).to_string(),
    })
}

/// Validate one object level against its declared attributes.
fn validate_object<A: Declared>(
    declared: &[A],
    object: &Map<String, Value>,
    parent: &str,
    presence: Presence,
) -> ValidationResult<Attributes> {
    let index = folded_index(object, parent)?;

    let mut canonical = Attributes::new();
    for attribute in declared {
        let params = attribute.params();
        let path = join_path(parent, &params.name);
        let value = index.get(&params.key()).copied().unwrap_or(&Value::Null);
        if let Some(checked) = check_present(attribute, value, &path, presence)? {
            canonical.insert(params.name.clone(), checked);
        }
    }
    Ok(canonical)
}

/// Build the case-insensitive key index of one object, failing on collisions.
fn folded_index<'v>(
    object: &'v Map<String, Value>,
    parent: &str,
) -> ValidationResult<HashMap<String, &'v Value>> {
    let mut index = HashMap::with_capacity(object.len());
    for (key, value) in object {
        if index.insert(fold(key), value).is_some() {
            trace!("Duplicate key '{}' under '{}'", key, parent);
            return Err(ValidationError::duplicate(join_path(parent, key)));
        }
    }
    Ok(index)
}

/// Resolve presence and cardinality, then type-check. `Ok(None)` means "omit".
fn check_present<A: Declared>(
    attribute: &A,
    value: &Value,
    path: &str,
    presence: Presence,
) -> ValidationResult<Option<AttributeValue>> {
    let params = attribute.params();
    let absent = || {
        if params.required && presence == Presence::Enforce {
            Err(ValidationError::missing(path))
        } else {
            Ok(None)
        }
    };

    if value.is_null() {
        return absent();
    }

    if params.multi_valued {
        let elements = value.as_array().ok_or_else(|| {
            ValidationError::invalid_type(
                path,
                format!("array of {}", attribute.kind()),
                json_kind(value),
            )
        })?;
        if elements.is_empty() {
            return absent();
        }
        let checked = elements
            .iter()
            .map(|element| attribute.check_element(element, path, presence))
            .collect::<ValidationResult<Vec<_>>>()?;
        return Ok(Some(AttributeValue::Multi(checked)));
    }

    if value.is_array() {
        return Err(ValidationError::invalid_type(
            path,
            attribute.kind(),
            "array",
        ));
    }
    attribute.check_element(value, path, presence).map(Some)
}

fn check_simple(params: &SimpleParams, value: &Value, path: &str) -> ValidationResult<AttributeValue> {
    let mismatch = || ValidationError::invalid_type(path, params.type_name(), json_kind(value));

    match params {
        SimpleParams::String(_) => value
            .as_str()
            .map(|s| AttributeValue::String(s.to_string()))
            .ok_or_else(mismatch),
        SimpleParams::Boolean(_) => value
            .as_bool()
            .map(AttributeValue::Boolean)
            .ok_or_else(mismatch),
        SimpleParams::Reference(_) => value
            .as_str()
            .map(|s| AttributeValue::Reference(s.to_string()))
            .ok_or_else(mismatch),
        SimpleParams::Binary(_) => {
            let text = value.as_str().ok_or_else(mismatch)?;
            STANDARD.decode(text).map(AttributeValue::Binary).map_err(|_| {
                ValidationError::invalid_type(path, "binary", "text that is not base64")
            })
        }
        SimpleParams::DateTime(_) => {
            let text = value.as_str().ok_or_else(mismatch)?;
            DateTime::parse_from_rfc3339(text)
                .map(AttributeValue::DateTime)
                .map_err(|_| {
                    ValidationError::invalid_type(path, "dateTime", "text that is not RFC 3339")
                })
        }
        SimpleParams::Number(number) => {
            let n = match value {
                Value::Number(n) => n,
                _ => return Err(mismatch()),
            };
            match number.number_type {
                NumberType::Decimal => n.as_f64().map(AttributeValue::Decimal).ok_or_else(mismatch),
                NumberType::Integer => integral(n)
                    .map(AttributeValue::Integer)
                    .map_err(|actual| ValidationError::invalid_type(path, "integer", actual)),
            }
        }
    }
}

const OUT_OF_RANGE: &str = "number out of 64-bit range";

/// A number with no fractional part that fits in `i64`. The error names what the
/// number is instead.
fn integral(n: &serde_json::Number) -> Result<i64, &'static str> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(OUT_OF_RANGE);
    }
    let f = n.as_f64().ok_or(OUT_OF_RANGE)?;
    if f.fract() != 0.0 {
        return Err("fractional number");
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(OUT_OF_RANGE)
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// JSON kind name used in error details.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
