//! In-memory resource provider.
//!
//! A reference [`ResourceProvider`] for tests, demos and IdP replay suites. Resources
//! live in a map guarded by a tokio `RwLock`, so every call is atomic with respect to
//! every other call. It assigns UUID ids, tracks `created`/`lastModified`, derives a
//! weak ETag from the resource content and can enforce case-insensitive uniqueness
//! of chosen attributes.
//!
//! Filters (for list operations and inside PATCH paths) are limited to a single
//! equality comparison, `attr[.sub] eq <json literal>`, which covers the lookups
//! identity providers issue before provisioning. Anything else is reported as
//! [`ProviderError::InvalidFilter`].
//!
//! ```rust
//! use scim_provisioning::providers::InMemoryProvider;
//!
//! let provider = InMemoryProvider::new()
//!     .with_unique_attribute("User", "userName")
//!     .with_unique_attribute("Group", "displayName");
//! ```

use crate::providers::ProviderError;
use crate::resource::{
    Attributes, ListQuery, Meta, Page, PatchOp, PatchOperation, PatchPath, RequestContext,
    ResourceProvider, StoredResource,
};
use crate::resource_type::ResourceType;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use log::{debug, trace};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Resources per resource type, in creation order.
type Store = HashMap<String, Vec<StoredResource>>;

/// Thread-safe in-memory storage for SCIM resources.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    data: Arc<RwLock<Store>>,
    /// `(resource type, attribute)` pairs whose values must be unique
    unique_attributes: Vec<(String, String)>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject creates and updates that would give two resources of `resource_type`
    /// the same value (compared case-insensitively) for the top-level `attribute`.
    pub fn with_unique_attribute(
        mut self,
        resource_type: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        self.unique_attributes
            .push((resource_type.into(), attribute.into()));
        self
    }

    /// Number of stored resources of one type.
    pub async fn resource_count(&self, resource_type: &str) -> usize {
        self.data
            .read()
            .await
            .get(resource_type)
            .map_or(0, Vec::len)
    }

    /// Remove every stored resource.
    pub async fn clear(&self) {
        self.data.write().await.clear();
    }

    fn check_unique(
        &self,
        existing: &[StoredResource],
        resource_type: &str,
        attributes: &Attributes,
        exclude_id: Option<&str>,
    ) -> Result<(), ProviderError> {
        for (_, attribute) in self
            .unique_attributes
            .iter()
            .filter(|(rt, _)| rt == resource_type)
        {
            let Some(value) = attributes.get(attribute).and_then(|v| v.as_str()) else {
                continue;
            };
            let taken = existing.iter().any(|other| {
                Some(other.id.as_str()) != exclude_id
                    && other
                        .attributes
                        .get(attribute)
                        .and_then(|v| v.as_str())
                        .is_some_and(|v| v.eq_ignore_ascii_case(value))
            });
            if taken {
                return Err(ProviderError::DuplicateAttribute {
                    resource_type: resource_type.to_string(),
                    attribute: attribute.clone(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl ResourceProvider for InMemoryProvider {
    async fn create_resource(
        &self,
        resource_type: &str,
        attributes: Attributes,
        context: &RequestContext,
    ) -> Result<StoredResource, ProviderError> {
        let mut data = self.data.write().await;
        let resources = data.entry(resource_type.to_string()).or_default();
        self.check_unique(resources, resource_type, &attributes, None)?;

        let id = Uuid::new_v4().to_string();
        let version = content_version(&id, &attributes)?;
        let resource = StoredResource::new(
            id,
            attributes,
            Meta::created_at(Utc::now()).with_version(version),
        );
        resources.push(resource.clone());

        debug!(
            "Created {} '{}' (request: '{}')",
            resource_type, resource.id, context.request_id
        );
        Ok(resource)
    }

    async fn get_resource(
        &self,
        resource_type: &str,
        id: &str,
        context: &RequestContext,
    ) -> Result<Option<StoredResource>, ProviderError> {
        trace!(
            "Getting {} '{}' (request: '{}')",
            resource_type, id, context.request_id
        );
        let data = self.data.read().await;
        Ok(data
            .get(resource_type)
            .and_then(|resources| resources.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn replace_resource(
        &self,
        resource_type: &str,
        id: &str,
        attributes: Attributes,
        context: &RequestContext,
    ) -> Result<StoredResource, ProviderError> {
        let mut data = self.data.write().await;
        let resources = data
            .get_mut(resource_type)
            .ok_or_else(|| ProviderError::not_found(resource_type, id))?;
        let index = resources
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ProviderError::not_found(resource_type, id))?;
        self.check_unique(resources, resource_type, &attributes, Some(id))?;

        let meta = resources[index]
            .meta
            .touched(Utc::now())
            .with_version(content_version(id, &attributes)?);
        let updated = StoredResource::new(id, attributes, meta);
        resources[index] = updated.clone();

        debug!(
            "Replaced {} '{}' (request: '{}')",
            resource_type, id, context.request_id
        );
        Ok(updated)
    }

    async fn patch_resource(
        &self,
        resource_type: &ResourceType,
        id: &str,
        operations: &[PatchOperation],
        context: &RequestContext,
    ) -> Result<StoredResource, ProviderError> {
        let name = resource_type.name();
        let mut data = self.data.write().await;
        let resources = data
            .get_mut(name)
            .ok_or_else(|| ProviderError::not_found(name, id))?;
        let index = resources
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ProviderError::not_found(name, id))?;

        let mut document = resources[index].attributes.to_json_map();
        for operation in operations {
            trace!("Applying {} {:?} to '{}'", operation.op, operation.path, id);
            apply_operation(&mut document, operation)?;
        }
        prune(&mut document);
        // Re-canonicalize with the schema so typed values survive and the merged
        // document still conforms.
        let attributes = resource_type
            .validate(&Value::Object(document))
            .map_err(ProviderError::InvalidResult)?;
        self.check_unique(resources, name, &attributes, Some(id))?;

        let meta = resources[index]
            .meta
            .touched(Utc::now())
            .with_version(content_version(id, &attributes)?);
        let updated = StoredResource::new(id, attributes, meta);
        resources[index] = updated.clone();

        debug!(
            "Patched {} '{}' with {} operation(s) (request: '{}')",
            name,
            id,
            operations.len(),
            context.request_id
        );
        Ok(updated)
    }

    async fn delete_resource(
        &self,
        resource_type: &str,
        id: &str,
        context: &RequestContext,
    ) -> Result<(), ProviderError> {
        let mut data = self.data.write().await;
        let resources = data
            .get_mut(resource_type)
            .ok_or_else(|| ProviderError::not_found(resource_type, id))?;
        let index = resources
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ProviderError::not_found(resource_type, id))?;
        resources.remove(index);

        debug!(
            "Deleted {} '{}' (request: '{}')",
            resource_type, id, context.request_id
        );
        Ok(())
    }

    async fn list_resources(
        &self,
        resource_type: &str,
        query: &ListQuery,
        context: &RequestContext,
    ) -> Result<Page, ProviderError> {
        let filter = query
            .filter
            .as_deref()
            .map(EqualityFilter::parse)
            .transpose()?;

        let data = self.data.read().await;
        let resources = data.get(resource_type).map(Vec::as_slice).unwrap_or(&[]);
        let matching: Vec<&StoredResource> = resources
            .iter()
            .filter(|resource| {
                filter.as_ref().is_none_or(|filter| {
                    let mut document = resource.attributes.to_json_map();
                    document.insert("id".to_string(), Value::String(resource.id.clone()));
                    filter.matches(&Value::Object(document))
                })
            })
            .collect();

        let total_results = matching.len();
        let page: Vec<StoredResource> = matching
            .into_iter()
            .skip(query.offset())
            .take(query.count)
            .cloned()
            .collect();

        trace!(
            "Listed {} of {} {} resource(s) (request: '{}')",
            page.len(),
            total_results,
            resource_type,
            context.request_id
        );
        Ok(Page::new(total_results, page))
    }
}

/// Weak entity tag derived from the resource id and content.
fn content_version(id: &str, attributes: &Attributes) -> Result<String, ProviderError> {
    let content = serde_json::to_vec(attributes)
        .map_err(|e| ProviderError::internal(format!("Failed to serialize resource: {e}")))?;
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(&content);
    let hash = hasher.finalize();
    Ok(format!("W/\"{}\"", STANDARD.encode(&hash[..8])))
}

fn apply_operation(
    document: &mut Map<String, Value>,
    operation: &PatchOperation,
) -> Result<(), ProviderError> {
    let path = operation
        .parsed_path()
        .map_err(|e| ProviderError::patch_failed(e.to_string()))?;

    let Some(path) = path else {
        let members = operation
            .value
            .as_ref()
            .and_then(Value::as_object)
            .ok_or_else(|| ProviderError::patch_failed("operations without a path need an object value"))?;
        for (name, value) in members {
            set_member(document, name, value.clone(), operation.op == PatchOp::Add);
        }
        return Ok(());
    };

    let container = match &path.schema {
        None => document,
        Some(urn) => {
            let key = find_key(document, urn).unwrap_or_else(|| urn.clone());
            if operation.op == PatchOp::Remove && !document.contains_key(&key) {
                return Ok(());
            }
            match document
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()))
            {
                Value::Object(extension) => extension,
                _ => return Err(ProviderError::patch_failed(format!("'{urn}' is not an object"))),
            }
        }
    };

    apply_at(container, &path, operation.op, operation.value.as_ref())
}

fn apply_at(
    container: &mut Map<String, Value>,
    path: &PatchPath,
    op: PatchOp,
    value: Option<&Value>,
) -> Result<(), ProviderError> {
    let key = find_key(container, &path.attribute);

    let Some(filter_text) = &path.filter else {
        return match &path.sub_attribute {
            None => {
                apply_member(container, &path.attribute, op, value);
                Ok(())
            }
            Some(sub) => {
                let Some(key) = key else {
                    if op == PatchOp::Remove {
                        return Ok(());
                    }
                    let mut parent = Map::new();
                    apply_member(&mut parent, sub, op, value);
                    container.insert(path.attribute.clone(), Value::Object(parent));
                    return Ok(());
                };
                match container.get_mut(&key) {
                    Some(Value::Object(parent)) => apply_member(parent, sub, op, value),
                    Some(Value::Array(items)) => {
                        for item in items.iter_mut().filter_map(Value::as_object_mut) {
                            apply_member(item, sub, op, value);
                        }
                    }
                    _ => {
                        return Err(ProviderError::patch_failed(format!(
                            "'{}' has no sub-attributes",
                            path.attribute
                        )));
                    }
                }
                Ok(())
            }
        };
    };

    let filter = EqualityFilter::parse(filter_text)?;
    let no_match = || {
        ProviderError::patch_failed(format!(
            "no value of '{}' matches [{}]",
            path.attribute, filter_text
        ))
    };
    let items = match key {
        Some(key) => container.get_mut(&key).and_then(Value::as_array_mut),
        None => None,
    }
    .ok_or_else(no_match)?;

    let matched = match (op, &path.sub_attribute) {
        (PatchOp::Remove, None) => {
            let before = items.len();
            items.retain(|item| !filter.matches(item));
            before - items.len()
        }
        (_, sub) => {
            let mut matched = 0;
            for item in items.iter_mut().filter(|item| filter.matches(item)) {
                matched += 1;
                let Some(element) = item.as_object_mut() else {
                    continue;
                };
                match sub {
                    Some(sub) => apply_member(element, sub, op, value),
                    None => {
                        if let Some(Value::Object(members)) = value {
                            for (name, member) in members {
                                set_member(element, name, member.clone(), false);
                            }
                        }
                    }
                }
            }
            matched
        }
    };

    if matched == 0 {
        return Err(no_match());
    }
    Ok(())
}

/// Apply an operation to one named member of an object.
fn apply_member(object: &mut Map<String, Value>, name: &str, op: PatchOp, value: Option<&Value>) {
    match (op, value) {
        (PatchOp::Remove, _) => {
            if let Some(key) = find_key(object, name) {
                object.remove(&key);
            }
        }
        (_, Some(value)) => set_member(object, name, value.clone(), op == PatchOp::Add),
        (_, None) => {}
    }
}

/// Set a member. With `merge`, arrays are extended (skipping values already present)
/// and objects are merged instead of replaced.
fn set_member(object: &mut Map<String, Value>, name: &str, value: Value, merge: bool) {
    let key = find_key(object, name).unwrap_or_else(|| name.to_string());
    let slot = object.entry(key).or_insert(Value::Null);
    match (slot, value) {
        (Value::Array(existing), Value::Array(added)) if merge => {
            for item in added {
                if !existing.contains(&item) {
                    existing.push(item);
                }
            }
        }
        (Value::Object(existing), Value::Object(added)) if merge => {
            for (member, member_value) in added {
                set_member(existing, &member, member_value, false);
            }
        }
        (slot, value) => *slot = value,
    }
}

fn find_key(object: &Map<String, Value>, name: &str) -> Option<String> {
    object.keys().find(|k| k.eq_ignore_ascii_case(name)).cloned()
}

/// Drop members left empty by removals.
fn prune(object: &mut Map<String, Value>) {
    for value in object.values_mut() {
        match value {
            Value::Object(inner) => prune(inner),
            Value::Array(items) => {
                for item in items.iter_mut() {
                    if let Value::Object(inner) = item {
                        prune(inner);
                    }
                }
                items.retain(|item| !is_empty(item));
            }
            _ => {}
        }
    }
    object.retain(|_, value| !is_empty(value));
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(members) => members.is_empty(),
        _ => false,
    }
}

/// `attr[.sub] eq <json literal>`.
#[derive(Debug)]
struct EqualityFilter {
    path: Vec<String>,
    value: Value,
}

impl EqualityFilter {
    fn parse(expression: &str) -> Result<Self, ProviderError> {
        let invalid = || ProviderError::InvalidFilter {
            message: format!("unsupported filter '{expression}'"),
        };
        let (attribute, rest) = expression
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(invalid)?;
        let (operator, literal) = rest
            .trim_start()
            .split_once(char::is_whitespace)
            .ok_or_else(invalid)?;
        if !operator.eq_ignore_ascii_case("eq") {
            return Err(invalid());
        }
        let value = serde_json::from_str(literal.trim()).map_err(|_| invalid())?;
        Ok(Self {
            path: attribute.split('.').map(str::to_string).collect(),
            value,
        })
    }

    fn matches(&self, item: &Value) -> bool {
        self.matches_at(item, &self.path)
    }

    fn matches_at(&self, item: &Value, path: &[String]) -> bool {
        match (item, path.split_first()) {
            (Value::Array(items), _) => items.iter().any(|i| self.matches_at(i, path)),
            (Value::Object(members), Some((head, tail))) => members
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(head))
                .is_some_and(|(_, v)| self.matches_at(v, tail)),
            (Value::String(actual), None) => self
                .value
                .as_str()
                .is_some_and(|expected| expected.eq_ignore_ascii_case(actual)),
            (actual, None) => *actual == self.value,
            _ => false,
        }
    }
}
