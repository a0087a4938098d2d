//! Canonical update field sets
//!
//! A partial update is carried as a [`FieldSet`]: an ordered mapping from a
//! canonical field to its new value. Only fields present in the set may be
//! written. Backends render the canonical field into their own property
//! naming convention with [`FieldKey::render`] at the point they build a
//! statement or document, and nowhere else.

use std::collections::BTreeMap;
use std::fmt;

use super::names::{PackageName, VersionName};

/// Property naming convention used by a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNaming {
    /// `manifest_url` (graph store properties)
    SnakeCase,
    /// `manifestUrl` (document store keys)
    CamelCase,
}

/// A canonical, closed set of updatable fields for one entity type.
pub trait FieldKey: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// Every field of this entity type, in canonical order.
    const ALL: &'static [Self];

    /// snake_case property name.
    fn snake_case(self) -> &'static str;

    /// lowerCamelCase property name.
    fn camel_case(self) -> &'static str;

    /// Render the field for a backend's naming convention.
    fn render(self, naming: FieldNaming) -> &'static str {
        match naming {
            FieldNaming::SnakeCase => self.snake_case(),
            FieldNaming::CamelCase => self.camel_case(),
        }
    }

    /// Look up a field by its snake_case name.
    fn from_snake_case(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.snake_case() == name)
    }
}

/// Updatable fields of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageField {
    Name,
    Maintainer,
}

impl FieldKey for PackageField {
    const ALL: &'static [Self] = &[Self::Name, Self::Maintainer];

    fn snake_case(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Maintainer => "maintainer",
        }
    }

    fn camel_case(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Maintainer => "maintainer",
        }
    }
}

/// Updatable fields of a version. `Weight` lives on the package->version edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionField {
    Name,
    ManifestUrl,
    Weight,
}

impl FieldKey for VersionField {
    const ALL: &'static [Self] = &[Self::Name, Self::ManifestUrl, Self::Weight];

    fn snake_case(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ManifestUrl => "manifest_url",
            Self::Weight => "weight",
        }
    }

    fn camel_case(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ManifestUrl => "manifestUrl",
            Self::Weight => "weight",
        }
    }
}

/// New value for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Unsigned(u32),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Unsigned(_) => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u32> {
        match self {
            Self::Unsigned(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// Ordered mapping from canonical field to new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet<F: FieldKey> {
    fields: BTreeMap<F, FieldValue>,
}

impl<F: FieldKey> Default for FieldSet<F> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
}

impl<F: FieldKey> FieldSet<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: F) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: F) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (F, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Canonical fields rendered with a backend's naming convention.
    pub fn rendered(&self, naming: FieldNaming) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.iter().map(move |(k, v)| (k.render(naming), v))
    }

    fn text(&self, field: F) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }
}

/// Partial update of a package.
pub type PackageUpdate = FieldSet<PackageField>;

/// Partial update of a version.
pub type VersionUpdate = FieldSet<VersionField>;

impl FieldSet<PackageField> {
    pub fn with_name(mut self, name: PackageName) -> Self {
        self.fields
            .insert(PackageField::Name, FieldValue::Text(name.into()));
        self
    }

    pub fn with_maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.fields
            .insert(PackageField::Maintainer, FieldValue::Text(maintainer.into()));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.text(PackageField::Name)
    }

    pub fn maintainer(&self) -> Option<&str> {
        self.text(PackageField::Maintainer)
    }
}

impl FieldSet<VersionField> {
    pub fn with_name(mut self, name: VersionName) -> Self {
        self.fields
            .insert(VersionField::Name, FieldValue::Text(name.into()));
        self
    }

    pub fn with_manifest_url(mut self, manifest_url: impl Into<String>) -> Self {
        self.fields.insert(
            VersionField::ManifestUrl,
            FieldValue::Text(manifest_url.into()),
        );
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.fields
            .insert(VersionField::Weight, FieldValue::Unsigned(weight));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.text(VersionField::Name)
    }

    pub fn manifest_url(&self) -> Option<&str> {
        self.text(VersionField::ManifestUrl)
    }

    pub fn weight(&self) -> Option<u32> {
        self.get(VersionField::Weight)
            .and_then(FieldValue::as_unsigned)
    }
}
