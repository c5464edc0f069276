//! PATCH request messages (RFC 7644 Section 3.5.2).
//!
//! A PATCH body is a PatchOp message:
//!
//! ```json
//! {
//!   "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
//!   "Operations": [
//!     {"op": "replace", "path": "active", "value": false},
//!     {"op": "remove", "path": "emails[type eq \"work\"]"}
//!   ]
//! }
//! ```
//!
//! Identity providers differ in the casing of keys and operation names (`Operations`
//! vs `operations`, `Replace` vs `replace`), so both are matched case-insensitively.

use crate::error::{ScimError, ScimResult};
use crate::schema::attribute::fold;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const PATCH_OP_URN: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// PATCH operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl FromStr for PatchOp {
    type Err = ScimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "add" => Ok(PatchOp::Add),
            "remove" => Ok(PatchOp::Remove),
            "replace" => Ok(PatchOp::Replace),
            _ => Err(ScimError::invalid_syntax(format!(
                "unknown PATCH operation '{s}'"
            ))),
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
        })
    }
}

/// One operation of a PatchOp message.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: Option<String>,
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn new(op: PatchOp, path: Option<String>, value: Option<Value>) -> Self {
        Self { op, path, value }
    }

    /// Parsed form of `path`, if there is one.
    pub fn parsed_path(&self) -> ScimResult<Option<PatchPath>> {
        self.path.as_deref().map(PatchPath::parse).transpose()
    }
}

/// Parse a PatchOp message into its operations.
///
/// Only the message shape is checked here: the PatchOp schema URN, a non-empty
/// `Operations` array, a known `op` in every operation, a path for `remove` and a
/// value for `add` and `replace`. Paths and values are checked against the resource
/// type separately.
pub fn parse_patch_request(body: &Value) -> ScimResult<Vec<PatchOperation>> {
    let message = body
        .as_object()
        .ok_or_else(|| ScimError::invalid_syntax("PATCH body must be a JSON object"))?;

    let declares_patch_op = member(message, "schemas")
        .and_then(Value::as_array)
        .is_some_and(|schemas| {
            schemas
                .iter()
                .filter_map(Value::as_str)
                .any(|urn| urn.eq_ignore_ascii_case(PATCH_OP_URN))
        });
    if !declares_patch_op {
        return Err(ScimError::invalid_syntax(format!(
            "PATCH body must list '{PATCH_OP_URN}' in schemas"
        )));
    }

    let operations = member(message, "Operations")
        .and_then(Value::as_array)
        .ok_or_else(|| ScimError::invalid_syntax("PATCH body must carry an Operations array"))?;
    if operations.is_empty() {
        return Err(ScimError::invalid_value("PATCH Operations must not be empty"));
    }

    operations.iter().map(parse_operation).collect()
}

fn parse_operation(operation: &Value) -> ScimResult<PatchOperation> {
    let operation = operation
        .as_object()
        .ok_or_else(|| ScimError::invalid_syntax("each PATCH operation must be an object"))?;

    let op: PatchOp = member(operation, "op")
        .and_then(Value::as_str)
        .ok_or_else(|| ScimError::invalid_syntax("PATCH operation is missing 'op'"))?
        .parse()?;

    let path = match member(operation, "path") {
        None | Some(Value::Null) => None,
        Some(Value::String(path)) if path.trim().is_empty() => None,
        Some(Value::String(path)) => Some(path.trim().to_string()),
        Some(_) => return Err(ScimError::invalid_path("PATCH path must be a string")),
    };

    let value = member(operation, "value").filter(|v| !v.is_null()).cloned();

    match op {
        PatchOp::Remove if path.is_none() => Err(ScimError::NoTarget {
            message: "remove operations require a path".to_string(),
        }),
        PatchOp::Add | PatchOp::Replace if value.is_none() => Err(ScimError::invalid_value(
            format!("{op} operations require a value"),
        )),
        _ => Ok(PatchOperation { op, path, value }),
    }
}

/// Case-insensitive member lookup on a JSON object.
fn member<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// A parsed PATCH path: `[urn:...:]attr[filter][.sub]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPath {
    /// Schema URN prefix, if the path is fully qualified
    pub schema: Option<String>,
    pub attribute: String,
    /// Raw value filter between the brackets, passed through uninterpreted
    pub filter: Option<String>,
    pub sub_attribute: Option<String>,
}

impl PatchPath {
    pub fn parse(path: &str) -> ScimResult<Self> {
        let invalid = || ScimError::invalid_path(path);

        // Only the part before any filter can hold the URN; filters may contain ':'.
        let bracket = path.find('[');
        let head = &path[..bracket.unwrap_or(path.len())];
        let (schema, head_start) = if head.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("urn:")) {
            let (urn, _) = head.rsplit_once(':').ok_or_else(invalid)?;
            (Some(urn.to_string()), urn.len() + 1)
        } else {
            (None, 0)
        };
        let rest = &path[head_start..];

        let (attribute, filter, sub_attribute) = match rest.find('[') {
            Some(open) => {
                let close = rest.rfind(']').filter(|close| *close > open).ok_or_else(invalid)?;
                let filter = rest[open + 1..close].trim();
                let after = &rest[close + 1..];
                let sub = match after.strip_prefix('.') {
                    Some(sub) => Some(sub.to_string()),
                    None if after.is_empty() => None,
                    None => return Err(invalid()),
                };
                if filter.is_empty() {
                    return Err(invalid());
                }
                (&rest[..open], Some(filter.to_string()), sub)
            }
            None => match rest.split_once('.') {
                Some((attribute, sub)) => (attribute, None, Some(sub.to_string())),
                None => (rest, None, None),
            },
        };

        let bad_sub = sub_attribute
            .as_deref()
            .is_some_and(|sub| sub.is_empty() || sub.contains('.'));
        if attribute.is_empty() || bad_sub {
            return Err(invalid());
        }

        Ok(Self {
            schema,
            attribute: attribute.to_string(),
            filter,
            sub_attribute,
        })
    }

    /// `attr` or `attr.sub`, without URN prefix or filter.
    pub fn attribute_path(&self) -> String {
        match &self.sub_attribute {
            Some(sub) => format!("{}.{}", self.attribute, sub),
            None => self.attribute.clone(),
        }
    }
}

impl fmt::Display for PatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}:")?;
        }
        f.write_str(&self.attribute)?;
        if let Some(filter) = &self.filter {
            write!(f, "[{filter}]")?;
        }
        if let Some(sub) = &self.sub_attribute {
            write!(f, ".{sub}")?;
        }
        Ok(())
    }
}
