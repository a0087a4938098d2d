//! Registry use cases.
//!
//! Request-level behaviour on top of the repository ports: ORN resolution,
//! the `any` version selector, name validation, field-mask projection for
//! updates, and conversion to response shapes.

mod package;
mod projection;
mod version;

pub use package::PackageCrud;
pub use projection::{project_package_update, project_version_update};
pub use version::VersionCrud;

use polvo_domain::orn::{resolve_package_name, resolve_version_path};
use polvo_domain::{DomainError, PackageName, VersionSelector};
use polvo_shared::{ErrorCode, FieldMaskError};

use crate::infrastructure::ports::RepoError;

/// Shared error type for registry use cases.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid field mask: {0}")]
    FieldMask(#[from] FieldMaskError),
    #[error("Invalid value: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl RegistryError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) | Self::FieldMask(_) | Self::Domain(_) => {
                ErrorCode::InvalidArgument
            }
            Self::Repo(e) => e.code(),
        }
    }
}

/// Container for registry use cases.
pub struct RegistryUseCases {
    pub packages: PackageCrud,
    pub versions: VersionCrud,
}

impl RegistryUseCases {
    pub fn new(packages: PackageCrud, versions: VersionCrud) -> Self {
        Self { packages, versions }
    }
}

fn package_from_orn(orn: &str) -> Result<PackageName, RegistryError> {
    let name = resolve_package_name(orn)
        .ok_or_else(|| RegistryError::invalid_argument(format!("invalid package ORN: '{orn}'")))?;
    Ok(PackageName::new(name)?)
}

fn version_from_orn(orn: &str) -> Result<(PackageName, VersionSelector), RegistryError> {
    let (package, version) = resolve_version_path(orn)
        .ok_or_else(|| RegistryError::invalid_argument(format!("invalid version ORN: '{orn}'")))?;
    Ok((PackageName::new(package)?, VersionSelector::parse(version)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orn_errors_are_invalid_argument() {
        let err = package_from_orn("projects/acme").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let err = version_from_orn("packages/core").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn any_segment_selects_heaviest() {
        let (package, selector) = version_from_orn("projects/acme/packages/core/versions/any").unwrap();
        assert_eq!(package.as_str(), "core");
        assert_eq!(selector, VersionSelector::Heaviest);
    }

    #[test]
    fn repo_codes_pass_through() {
        let err = RegistryError::from(RepoError::not_found("Package", "core"));
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
