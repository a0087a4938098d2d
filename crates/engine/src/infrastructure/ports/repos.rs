//! Repository port traits for registry storage.
//!
//! The contract is split by capability. A backend implements the traits for
//! what it can store; an operation it cannot perform reports
//! [`RepoError::Unsupported`] instead of panicking.

use async_trait::async_trait;
use polvo_domain::{Package, PackageName, PackageUpdate, Version, VersionName, VersionUpdate};

use super::error::RepoError;
use crate::infrastructure::context::RequestContext;

/// How `list_versions` shapes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListVersionsOptions {
    /// Cap on the number of versions returned.
    pub limit: Option<u32>,
    /// Descending weight when true; store order otherwise.
    pub order_by_weight: bool,
}

impl Default for ListVersionsOptions {
    fn default() -> Self {
        Self {
            limit: None,
            order_by_weight: true,
        }
    }
}

impl ListVersionsOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn unordered(mut self) -> Self {
        self.order_by_weight = false;
        self
    }
}

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageRepo: Send + Sync {
    async fn get_package(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
    ) -> Result<Package, RepoError>;

    /// All packages ordered by name. An empty store yields an empty list.
    async fn list_packages(&self, ctx: &RequestContext) -> Result<Vec<Package>, RepoError>;

    /// Atomic conditional create. `AlreadyExists` when the name is taken.
    async fn create_package(
        &self,
        ctx: &RequestContext,
        package: &Package,
    ) -> Result<Package, RepoError>;

    /// Write exactly the fields present in `fields`, then return the stored package.
    async fn update_package(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
        fields: &PackageUpdate,
    ) -> Result<Package, RepoError>;

    /// Cascading delete. Deleting an absent package succeeds.
    async fn delete_package(&self, ctx: &RequestContext, name: &PackageName)
        -> Result<(), RepoError>;

    async fn package_exists(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
    ) -> Result<bool, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionRepo: Send + Sync {
    async fn get_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<Version, RepoError>;

    /// The version with the highest weight. `NotFound` when the package has none.
    async fn get_heaviest_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
    ) -> Result<Version, RepoError>;

    /// `NotFound` when the package itself is absent.
    async fn list_versions(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        options: ListVersionsOptions,
    ) -> Result<Vec<Version>, RepoError>;

    /// Conditional create under an existing package, always at weight 0.
    ///
    /// `NotFound` for a missing package, `AlreadyExists` for a duplicate name.
    async fn create_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &Version,
    ) -> Result<Version, RepoError>;

    /// Write exactly the fields present in `fields`, then re-read the version.
    async fn update_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
        fields: &VersionUpdate,
    ) -> Result<Version, RepoError>;

    /// Deleting an absent version succeeds.
    async fn delete_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<(), RepoError>;

    async fn version_exists(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<bool, RepoError>;
}

/// A backend that stores both packages and versions.
pub trait Repository: PackageRepo + VersionRepo {}

impl<T: PackageRepo + VersionRepo> Repository for T {}
