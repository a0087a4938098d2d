//! Version entity - One published revision of a package
//!
//! A version is scoped to exactly one package; `(package name, version name)`
//! is the composite key. The `weight` is not a property of the version node:
//! it qualifies the `VERSIONS` edge from the package, and the version with the
//! highest weight is the package's default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::VersionName;

/// A version as read back from a store, including its edge weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub name: VersionName,
    pub manifest_url: String,
    /// Ordering weight of the package->version edge. Higher wins.
    pub weight: u32,
    pub created_at: DateTime<Utc>,
}

impl Version {
    /// A freshly created version always starts at weight 0; promotion is an
    /// explicit update.
    pub fn new(name: VersionName, manifest_url: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name,
            manifest_url: manifest_url.into(),
            weight: 0,
            created_at: now,
        }
    }
}
