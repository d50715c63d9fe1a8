//! Forge data as it appears on the wire and in the cache file.

use serde::{Deserialize, Serialize};

/// One repository as listed by the forge's org-repos endpoint.
///
/// Fields the reconciler does not read are carried in `extra`, so the cache
/// file round-trips whatever else the forge returned for the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags_url: Option<String>,
    /// Name of the most recent tag, filled in by the client after the
    /// per-repository tags call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_tag: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Repository {
    /// A repository with only a name, everything else unset.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ssh_url: None,
            tags_url: None,
            latest_tag: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One entry of a repository's tag listing, most recent first.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
}
