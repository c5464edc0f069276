//! Core types exchanged with resource providers.

use super::value::Attributes;
use chrono::{DateTime, SecondsFormat, Utc};

/// A resource as held by a provider: its identifier, canonical attributes and
/// bookkeeping metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResource {
    /// Server-assigned identifier, unique within the resource type
    pub id: String,
    /// Canonical attributes, including `externalId` and extension attributes keyed by
    /// extension schema URN
    pub attributes: Attributes,
    pub meta: Meta,
}

impl StoredResource {
    pub fn new(id: impl Into<String>, attributes: Attributes, meta: Meta) -> Self {
        Self {
            id: id.into(),
            attributes,
            meta,
        }
    }
}

/// Resource metadata maintained by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    /// Entity tag, e.g. `W/"3694e05e9dff590"`
    pub version: Option<String>,
}

impl Meta {
    /// Metadata for a resource created at `now`.
    pub fn created_at(now: DateTime<Utc>) -> Self {
        Self {
            created: now,
            last_modified: now,
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Bump `last_modified`, keeping `created`.
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        Self {
            created: self.created,
            last_modified: now,
            version: None,
        }
    }

    pub fn created_rfc3339(&self) -> String {
        self.created.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn last_modified_rfc3339(&self) -> String {
        self.last_modified.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// One page of a list operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Number of matching resources across all pages
    pub total_results: usize,
    pub resources: Vec<StoredResource>,
}

impl Page {
    pub fn new(total_results: usize, resources: Vec<StoredResource>) -> Self {
        Self {
            total_results,
            resources,
        }
    }

    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }
}
