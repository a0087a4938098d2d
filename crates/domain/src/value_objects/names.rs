//! Validated name newtypes for registry entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace
//! - Free of `/`, because names are embedded as resource path segments

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for name fields (PackageName, VersionName)
const MAX_NAME_LENGTH: usize = 200;

/// Version name that selects the heaviest version of a package.
///
/// It is reserved: no version can ever be stored under this name.
pub const ANY_VERSION: &str = "any";

fn validate_segment(kind: &str, name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{kind} name cannot be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "{kind} name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    if trimmed.contains('/') {
        return Err(DomainError::validation(format!(
            "{kind} name cannot contain '/'"
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// PackageName
// ============================================================================

/// A validated package name (non-empty, <=200 chars, trimmed, no '/')
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Create a new validated package name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty after trimming,
    /// longer than 200 characters, or contains a `/`.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validate_segment("Package", &name.into()).map(Self)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PackageName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> String {
        name.0
    }
}

// ============================================================================
// VersionName
// ============================================================================

/// A validated version name (non-empty, <=200 chars, trimmed, no '/', not `any`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionName(String);

impl VersionName {
    /// Create a new validated version name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for the same reasons as [`PackageName::new`],
    /// and `DomainError::Reserved` when the name is the [`ANY_VERSION`] sentinel.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = validate_segment("Version", &name.into())?;
        if name == ANY_VERSION {
            return Err(DomainError::reserved(ANY_VERSION));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for VersionName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<VersionName> for String {
    fn from(name: VersionName) -> String {
        name.0
    }
}

// ============================================================================
// VersionSelector
// ============================================================================

/// How a read request picks a version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// The version with the highest weight (requested as `any`).
    Heaviest,
    /// One specific version.
    Named(VersionName),
}

impl VersionSelector {
    /// Parse a version path segment, mapping the `any` sentinel to [`VersionSelector::Heaviest`].
    pub fn parse(segment: &str) -> Result<Self, DomainError> {
        if segment.trim() == ANY_VERSION {
            return Ok(Self::Heaviest);
        }
        VersionName::new(segment).map(Self::Named)
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heaviest => write!(f, "{ANY_VERSION}"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}
