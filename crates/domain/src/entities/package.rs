//! Package entity - A named unit of distribution in the registry
//!
//! # Graph-First Design
//!
//! Packages are nodes. Their versions hang off a weighted edge:
//!
//! ```cypher
//! (package:Package {name, maintainer, created_at})
//!     -[:VERSIONS {weight}]->(version:Version)
//! ```
//!
//! The package name is the external identity key and is unique across the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::PackageName;

/// A registered package.
///
/// Simple data struct: the name is validated by construction through
/// [`PackageName`]; the remaining fields carry no invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: PackageName,
    pub maintainer: String,
    pub created_at: DateTime<Utc>,
}

impl Package {
    pub fn new(name: PackageName, maintainer: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name,
            maintainer: maintainer.into(),
            created_at: now,
        }
    }
}
