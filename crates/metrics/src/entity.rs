//! Identifiers for the things being measured

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cache, or a single entry inside a cache
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntityId {
    /// Whole-cache metrics
    Cache { cache: String },
    /// Metrics for one key of a cache
    Entry { cache: String, key: String },
}

impl EntityId {
    pub fn cache(name: impl Into<String>) -> Self {
        EntityId::Cache { cache: name.into() }
    }

    pub fn entry(cache: impl Into<String>, key: impl Into<String>) -> Self {
        EntityId::Entry {
            cache: cache.into(),
            key: key.into(),
        }
    }

    /// Name of the cache this entity belongs to (or is)
    pub fn cache_name(&self) -> &str {
        match self {
            EntityId::Cache { cache } | EntityId::Entry { cache, .. } => cache,
        }
    }

    /// Entry key, `None` for cache-level entities
    pub fn key(&self) -> Option<&str> {
        match self {
            EntityId::Cache { .. } => None,
            EntityId::Entry { key, .. } => Some(key),
        }
    }

    /// `"cache"` or `"entry"`, matching the serialized `kind` tag
    pub fn kind(&self) -> &'static str {
        match self {
            EntityId::Cache { .. } => "cache",
            EntityId::Entry { .. } => "entry",
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, EntityId::Entry { .. })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Cache { cache } => write!(f, "{cache}"),
            EntityId::Entry { cache, key } => write!(f, "{cache}[{key}]"),
        }
    }
}

impl From<&str> for EntityId {
    fn from(cache: &str) -> Self {
        EntityId::cache(cache)
    }
}

impl From<String> for EntityId {
    fn from(cache: String) -> Self {
        EntityId::cache(cache)
    }
}

impl<C: Into<String>, K: Into<String>> From<(C, K)> for EntityId {
    fn from((cache, key): (C, K)) -> Self {
        EntityId::entry(cache, key)
    }
}
