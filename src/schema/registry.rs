//! Schema registry for loading, managing, and accessing SCIM schemas.
//!
//! The registry owns every schema the server knows about, in registration order. It
//! is filled at startup (from the embedded documents, from files, or from schemas
//! built in code) and then shared read-only.

use super::embedded;
use super::types::Schema;
use crate::error::{DefinitionResult, SchemaDefinitionError};

use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Registry of schemas keyed by schema id.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Arc<Schema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the embedded User, Group and Enterprise User schemas.
    pub fn with_embedded_schemas() -> DefinitionResult<Self> {
        let mut registry = Self::new();
        for content in [
            embedded::core_user_schema(),
            embedded::core_group_schema(),
            embedded::enterprise_user_schema(),
        ] {
            registry.add_schema(Schema::from_json(content)?)?;
        }
        Ok(registry)
    }

    /// Load every `*.json` file of a directory, in file name order.
    pub fn from_schema_dir<P: AsRef<Path>>(schema_dir: P) -> DefinitionResult<Self> {
        let dir = schema_dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| io_error(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new();
        for path in paths {
            registry.add_schema(Self::load_schema_from_file(&path)?)?;
        }
        Ok(registry)
    }

    /// Load a schema from a JSON file.
    pub fn load_schema_from_file<P: AsRef<Path>>(path: P) -> DefinitionResult<Schema> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        Schema::from_json(&content).map_err(|e| match e {
            SchemaDefinitionError::InvalidDefinition { message, .. } => {
                SchemaDefinitionError::InvalidDefinition {
                    scope: path.display().to_string(),
                    message,
                }
            }
            other => other,
        })
    }

    /// Add a schema. Fails if a schema with the same id is already registered.
    pub fn add_schema(&mut self, schema: impl Into<Arc<Schema>>) -> DefinitionResult<Arc<Schema>> {
        let schema = schema.into();
        if self.get_schema(schema.id()).is_some() {
            return Err(SchemaDefinitionError::DuplicateSchema {
                id: schema.id().to_string(),
            });
        }
        self.schemas.push(Arc::clone(&schema));
        Ok(schema)
    }

    /// All schemas in registration order.
    pub fn get_schemas(&self) -> &[Arc<Schema>] {
        &self.schemas
    }

    /// Get a specific schema by id. Schema ids are URNs and compare case-insensitively.
    pub fn get_schema(&self, id: &str) -> Option<&Arc<Schema>> {
        self.schemas.iter().find(|s| s.id().eq_ignore_ascii_case(id))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn io_error(path: &Path, error: std::io::Error) -> SchemaDefinitionError {
    SchemaDefinitionError::InvalidDefinition {
        scope: path.display().to_string(),
        message: error.to_string(),
    }
}
