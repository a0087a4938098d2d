//! Value objects - Immutable objects defined by their attributes

mod field_set;
mod names;

pub use field_set::{
    FieldKey, FieldNaming, FieldSet, FieldValue, PackageField, PackageUpdate, VersionField,
    VersionUpdate,
};
pub use names::{PackageName, VersionName, VersionSelector, ANY_VERSION};
