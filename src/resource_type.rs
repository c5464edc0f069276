//! Resource types and their registry.
//!
//! A [`ResourceType`] binds a core schema and any number of schema extensions to an
//! endpoint such as `/Users`. It is the unit the server validates writes against:
//! the core schema at the top level of a resource, each extension under the key equal
//! (case-insensitively) to its schema URN, plus the common `externalId` attribute.
//!
//! The [`ResourceTypeRegistry`] maps endpoints to resource types. It is filled by
//! [`ScimServerBuilder`](crate::ScimServerBuilder) and read-only afterwards.

use crate::error::{
    BuildError, BuildResult, ScimError, ScimResult, ValidationError, ValidationResult,
};
use crate::resource::{AttributeValue, Attributes, PatchOp, PatchOperation, PatchPath};
use crate::schema::embedded;
use crate::schema::validation::json_kind;
use crate::schema::{AttributePath, CoreAttribute, Returned, Schema};
use log::trace;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Common attribute carried by every resource type.
pub const EXTERNAL_ID: &str = "externalId";

/// Server-owned keys ignored in path-less PATCH values.
const SERVER_OWNED: [&str; 3] = ["id", "meta", "schemas"];

/// An extension schema attached to a resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaExtension {
    pub schema: Arc<Schema>,
    /// Whether resources must carry the extension
    pub required: bool,
}

/// A SCIM resource type (RFC 7643 Section 6).
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceType {
    id: String,
    name: String,
    endpoint: String,
    description: Option<String>,
    schema: Arc<Schema>,
    extensions: Vec<SchemaExtension>,
}

impl ResourceType {
    /// Create a resource type. The id defaults to the name.
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        schema: impl Into<Arc<Schema>>,
    ) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            endpoint: endpoint.into(),
            description: None,
            schema: schema.into(),
            extensions: Vec::new(),
        }
    }

    /// The RFC 7643 `User` resource type at `/Users`, with the optional enterprise
    /// extension.
    pub fn core_user() -> BuildResult<Self> {
        let schema = Schema::from_json(embedded::core_user_schema())?;
        let enterprise = Schema::from_json(embedded::enterprise_user_schema())?;
        Ok(Self::new("User", "/Users", schema)
            .with_description("User Account")
            .with_extension(enterprise, false))
    }

    /// The RFC 7643 `Group` resource type at `/Groups`.
    pub fn core_group() -> BuildResult<Self> {
        let schema = Schema::from_json(embedded::core_group_schema())?;
        Ok(Self::new("Group", "/Groups", schema).with_description("Group"))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an extension schema.
    pub fn with_extension(mut self, schema: impl Into<Arc<Schema>>, required: bool) -> Self {
        self.extensions.push(SchemaExtension {
            schema: schema.into(),
            required,
        });
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Endpoint relative to the SCIM base, e.g. `/Users`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn extensions(&self) -> &[SchemaExtension] {
        &self.extensions
    }

    /// Find an attached extension by schema URN.
    pub fn extension(&self, urn: &str) -> Option<&SchemaExtension> {
        self.extensions
            .iter()
            .find(|extension| extension.schema.id().eq_ignore_ascii_case(urn))
    }

    /// Validate a full resource (POST and PUT bodies).
    pub fn validate(&self, raw: &Value) -> ValidationResult<Attributes> {
        trace!("Validating {} resource", self.name);
        let object = raw.as_object().ok_or_else(|| ValidationError::InvalidResource {
            actual: json_kind(raw).to_string(),
        })?;
        let mut attributes = self.schema.validate(raw)?;

        if let Some(external_id) = present(object, EXTERNAL_ID) {
            let value = external_id.as_str().ok_or_else(|| {
                ValidationError::invalid_type(EXTERNAL_ID, "string", json_kind(external_id))
            })?;
            attributes.insert(EXTERNAL_ID, AttributeValue::String(value.to_string()));
        }

        for extension in &self.extensions {
            let urn = extension.schema.id();
            match present(object, urn) {
                Some(value) => {
                    let values = extension
                        .schema
                        .validate(value)
                        .map_err(|e| qualify(urn, e))?;
                    if !values.is_empty() {
                        attributes.insert(urn, AttributeValue::Complex(values));
                    }
                }
                None if extension.required => return Err(ValidationError::missing(urn)),
                None => {}
            }
        }

        Ok(attributes)
    }

    /// Check PATCH operations against this resource type and rewrite them into
    /// canonical form.
    ///
    /// Every returned operation has a path naming a declared attribute by its
    /// declared name, prefixed with the schema URN only for extension attributes, and
    /// a value in canonical JSON. Path-less operations are expanded into one operation
    /// per member of their value. Bracketed filters are kept as written.
    pub fn validate_patch(&self, operations: &[PatchOperation]) -> ScimResult<Vec<PatchOperation>> {
        let mut validated = Vec::with_capacity(operations.len());
        for operation in operations {
            match operation.parsed_path()? {
                Some(path) => self.patch_target(
                    operation.op,
                    &path,
                    operation.value.as_ref(),
                    &mut validated,
                )?,
                None => {
                    let members = operation
                        .value
                        .as_ref()
                        .and_then(Value::as_object)
                        .ok_or_else(|| {
                            ScimError::invalid_value(format!(
                                "{} operations without a path need an object value",
                                operation.op
                            ))
                        })?;
                    for (key, value) in members {
                        if SERVER_OWNED.iter().any(|owned| owned.eq_ignore_ascii_case(key)) {
                            continue;
                        }
                        match self.extension(key) {
                            Some(extension) => self.patch_extension(
                                operation.op,
                                extension,
                                Some(value),
                                &mut validated,
                            )?,
                            None => self.patch_target(
                                operation.op,
                                &PatchPath::parse(key)?,
                                Some(value),
                                &mut validated,
                            )?,
                        }
                    }
                }
            }
        }
        Ok(validated)
    }

    fn patch_target(
        &self,
        op: PatchOp,
        path: &PatchPath,
        value: Option<&Value>,
        out: &mut Vec<PatchOperation>,
    ) -> ScimResult<()> {
        let invalid_path = || ScimError::invalid_path(path.to_string());

        let (schema, prefix) = match &path.schema {
            None => (&self.schema, None),
            Some(urn) if urn.eq_ignore_ascii_case(self.schema.id()) => (&self.schema, None),
            Some(urn) => match self.extension(urn) {
                Some(extension) => (&extension.schema, Some(extension.schema.id())),
                None => {
                    // `urn:...:enterprise:2.0:User` addresses the whole extension
                    let whole = format!("{urn}:{}", path.attribute);
                    return match self.extension(&whole) {
                        Some(extension)
                            if path.filter.is_none() && path.sub_attribute.is_none() =>
                        {
                            self.patch_extension(op, extension, value, out)
                        }
                        _ => Err(invalid_path()),
                    };
                }
            },
        };

        if prefix.is_none()
            && path.attribute.eq_ignore_ascii_case(EXTERNAL_ID)
            && path.filter.is_none()
            && path.sub_attribute.is_none()
        {
            let value = match (op, value) {
                (PatchOp::Remove, _) | (_, None | Some(Value::Null)) => None,
                (_, Some(Value::String(external_id))) => Some(Value::String(external_id.clone())),
                (_, Some(other)) => {
                    return Err(ValidationError::invalid_type(EXTERNAL_ID, "string", json_kind(other)).into());
                }
            };
            let op = if value.is_none() { PatchOp::Remove } else { op };
            out.push(PatchOperation::new(op, Some(EXTERNAL_ID.to_string()), value));
            return Ok(());
        }

        let target = schema
            .resolve_path(&path.attribute_path())
            .ok_or_else(invalid_path)?;
        let (attribute, sub_attribute) = match target {
            AttributePath::Attribute(attribute) => (attribute.name(), None),
            AttributePath::SubAttribute(parent, sub) => (parent.attribute.name.as_str(), Some(sub.name())),
        };
        if path.filter.is_some() {
            let filterable = schema.attribute(attribute).is_some_and(|declared| {
                matches!(declared, CoreAttribute::Complex(_)) && declared.attribute().multi_valued
            });
            if !filterable {
                return Err(invalid_path());
            }
        }

        let canonical_path = PatchPath {
            schema: prefix.map(str::to_string),
            attribute: attribute.to_string(),
            filter: path.filter.clone(),
            sub_attribute: sub_attribute.map(str::to_string),
        }
        .to_string();

        let whole_elements = path.filter.is_some() && path.sub_attribute.is_none();
        let clears_required = !whole_elements && target.params().required;
        let cannot_clear = || {
            ScimError::invalid_value(format!("required attribute '{canonical_path}' cannot be removed"))
        };

        if op == PatchOp::Remove {
            if clears_required {
                return Err(cannot_clear());
            }
            out.push(PatchOperation::new(op, Some(canonical_path), None));
            return Ok(());
        }

        let value = value.ok_or_else(|| {
            ScimError::invalid_value(format!("{op} of '{canonical_path}' requires a value"))
        })?;
        let canonical = target.validate_value(value).map_err(|e| match prefix {
            Some(urn) => qualify(urn, e),
            None => e,
        })?;

        let Some(canonical) = canonical else {
            // null or [] clears the attribute on replace and adds nothing
            if op == PatchOp::Replace {
                if clears_required {
                    return Err(cannot_clear());
                }
                out.push(PatchOperation::new(PatchOp::Remove, Some(canonical_path), None));
            }
            return Ok(());
        };

        let mut value = canonical.to_json();
        if whole_elements {
            // the value is merged into every matching element
            value = match value {
                Value::Array(mut elements) if elements.len() == 1 => elements.remove(0),
                _ => {
                    return Err(ScimError::invalid_value(format!(
                        "'{canonical_path}' takes a single object value"
                    )));
                }
            };
        }

        out.push(PatchOperation::new(op, Some(canonical_path), Some(value)));
        Ok(())
    }

    fn patch_extension(
        &self,
        op: PatchOp,
        extension: &SchemaExtension,
        value: Option<&Value>,
        out: &mut Vec<PatchOperation>,
    ) -> ScimResult<()> {
        let urn = extension.schema.id();
        if op == PatchOp::Remove {
            for attribute in extension.schema.attributes() {
                out.push(PatchOperation::new(
                    PatchOp::Remove,
                    Some(format!("{urn}:{}", attribute.name())),
                    None,
                ));
            }
            return Ok(());
        }

        let members = value.and_then(Value::as_object).ok_or_else(|| {
            ScimError::invalid_value(format!("'{urn}' takes an object value"))
        })?;
        for (key, member) in members {
            let path = PatchPath::parse(&format!("{urn}:{key}"))?;
            self.patch_target(op, &path, Some(member), out)?;
        }
        Ok(())
    }

    /// URNs for the `schemas` member of a rendered resource: the core schema and every
    /// extension the resource carries.
    pub fn schema_urns(&self, attributes: &Attributes) -> Vec<String> {
        std::iter::once(self.schema.id())
            .chain(
                self.extensions
                    .iter()
                    .map(|extension| extension.schema.id())
                    .filter(|urn| attributes.contains(urn)),
            )
            .map(str::to_string)
            .collect()
    }

    /// Attributes that may be rendered in responses: everything except attributes
    /// declared `returned: never`.
    pub fn returnable(&self, attributes: &Attributes) -> Attributes {
        let mut visible = without_never(&self.schema, attributes);
        for extension in &self.extensions {
            let urn = extension.schema.id();
            if let Some(values) = attributes.get(urn).and_then(AttributeValue::as_complex) {
                visible.insert(urn, AttributeValue::Complex(without_never(&extension.schema, values)));
            }
        }
        visible
    }

    fn check(&self) -> BuildResult<()> {
        let invalid = |message: String| BuildError::InvalidConfiguration { message };

        if self.id.is_empty() || self.name.is_empty() {
            return Err(invalid("resource type id and name must not be empty".to_string()));
        }
        let segment = self.endpoint.strip_prefix('/').unwrap_or_default();
        if segment.is_empty() || segment.contains('/') {
            return Err(invalid(format!(
                "endpoint '{}' of resource type '{}' must be a single path segment starting with '/'",
                self.endpoint, self.name
            )));
        }
        for (index, extension) in self.extensions.iter().enumerate() {
            let urn = extension.schema.id();
            let repeated = urn.eq_ignore_ascii_case(self.schema.id())
                || self.extensions[..index]
                    .iter()
                    .any(|earlier| earlier.schema.id().eq_ignore_ascii_case(urn));
            if repeated {
                return Err(invalid(format!(
                    "schema '{urn}' is attached to resource type '{}' more than once",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Case-insensitive member lookup, treating `null` as absent.
fn present<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
        .filter(|value| !value.is_null())
}

/// Report an extension's validation error against its URN-qualified path.
fn qualify(urn: &str, error: ValidationError) -> ValidationError {
    match error {
        ValidationError::InvalidResource { actual } => ValidationError::InvalidType {
            path: urn.to_string(),
            expected: "complex".to_string(),
            actual,
        },
        ValidationError::AttributeMissing { path } => {
            ValidationError::AttributeMissing { path: format!("{urn}:{path}") }
        }
        ValidationError::DuplicateAttributeName { path } => {
            ValidationError::DuplicateAttributeName { path: format!("{urn}:{path}") }
        }
        ValidationError::InvalidType {
            path,
            expected,
            actual,
        } => ValidationError::InvalidType {
            path: format!("{urn}:{path}"),
            expected,
            actual,
        },
    }
}

fn without_never(schema: &Schema, attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .filter(|(name, _)| {
            !schema
                .attribute(name)
                .is_some_and(|declared| declared.attribute().returned == Returned::Never)
        })
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// Resource types by endpoint, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ResourceTypeRegistry {
    resource_types: Vec<Arc<ResourceType>>,
}

impl ResourceTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource type. Ids and endpoints must be unique.
    pub fn register(&mut self, resource_type: ResourceType) -> BuildResult<Arc<ResourceType>> {
        resource_type.check()?;
        let taken = self.resource_types.iter().any(|existing| {
            existing.id.eq_ignore_ascii_case(&resource_type.id)
                || existing.endpoint.eq_ignore_ascii_case(&resource_type.endpoint)
        });
        if taken {
            return Err(BuildError::DuplicateResourceType {
                name: resource_type.name,
            });
        }
        let resource_type = Arc::new(resource_type);
        self.resource_types.push(Arc::clone(&resource_type));
        Ok(resource_type)
    }

    /// Find the resource type served at `endpoint` (e.g. `/Users`).
    pub fn by_endpoint(&self, endpoint: &str) -> Option<&Arc<ResourceType>> {
        self.resource_types
            .iter()
            .find(|rt| rt.endpoint.eq_ignore_ascii_case(endpoint))
    }

    pub fn get(&self, id: &str) -> Option<&Arc<ResourceType>> {
        self.resource_types
            .iter()
            .find(|rt| rt.id.eq_ignore_ascii_case(id))
    }

    pub fn all(&self) -> &[Arc<ResourceType>] {
        &self.resource_types
    }

    pub fn len(&self) -> usize {
        self.resource_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resource_types.is_empty()
    }
}
