//! Polvo domain: packages, versions, and the rules that protect them.
//!
//! - `entities` - Package and Version records
//! - `value_objects` - validated names, the version selector, update field sets
//! - `orn` - resource path resolution
//! - `common` - small pure helpers

pub mod common;
pub mod entities;
pub mod error;
pub mod orn;
pub mod value_objects;

pub use entities::{Package, Version};
pub use error::DomainError;
pub use value_objects::{
    FieldKey, FieldNaming, FieldSet, FieldValue, PackageField, PackageName, PackageUpdate,
    VersionField, VersionName, VersionSelector, VersionUpdate, ANY_VERSION,
};
