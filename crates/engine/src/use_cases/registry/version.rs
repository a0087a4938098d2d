//! Version CRUD operations.
//!
//! Reads accept `any` as the version segment and resolve it to the heaviest
//! version of the package. Writes always need a concrete version name.

use std::sync::Arc;

use polvo_domain::orn::version_orn;
use polvo_domain::{PackageName, Version, VersionName, VersionSelector};
use polvo_shared::{
    CreateVersionRequest, DeleteInfo, DeleteVersionRequest, GetManifestUrlRequest,
    GetVersionRequest, ListVersionsRequest, ManifestUrlInfo, UpdateVersionRequest, VersionInfo,
};

use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::{ClockPort, ListVersionsOptions, VersionRepo};

use super::{package_from_orn, project_version_update, version_from_orn, RegistryError};

pub struct VersionCrud {
    repo: Arc<dyn VersionRepo>,
    clock: Arc<dyn ClockPort>,
}

impl VersionCrud {
    pub fn new(repo: Arc<dyn VersionRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    async fn select(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        selector: &VersionSelector,
    ) -> Result<Version, RegistryError> {
        let version = match selector {
            VersionSelector::Heaviest => self.repo.get_heaviest_version(ctx, package).await?,
            VersionSelector::Named(name) => self.repo.get_version(ctx, package, name).await?,
        };
        Ok(version)
    }

    pub async fn get_version(
        &self,
        ctx: &RequestContext,
        request: GetVersionRequest,
    ) -> Result<VersionInfo, RegistryError> {
        let (package, selector) = version_from_orn(&request.orn)?;
        let version = self.select(ctx, &package, &selector).await?;
        Ok(VersionInfo::from_version(&package, &version))
    }

    /// Manifest URL of one version. The returned ORN names the concrete
    /// version even when `any` was requested.
    pub async fn get_manifest_url(
        &self,
        ctx: &RequestContext,
        request: GetManifestUrlRequest,
    ) -> Result<ManifestUrlInfo, RegistryError> {
        let (package, selector) = version_from_orn(&request.orn)?;
        let version = self.select(ctx, &package, &selector).await?;
        Ok(ManifestUrlInfo {
            orn: version_orn(package.as_str(), version.name.as_str()),
            manifest_url: version.manifest_url,
        })
    }

    pub async fn list_versions(
        &self,
        ctx: &RequestContext,
        request: ListVersionsRequest,
    ) -> Result<Vec<VersionInfo>, RegistryError> {
        let package = package_from_orn(&request.orn)?;
        let options = ListVersionsOptions {
            limit: request.limit,
            order_by_weight: request.order_by_weight.unwrap_or(true),
        };

        let versions = self.repo.list_versions(ctx, &package, options).await?;
        Ok(versions
            .iter()
            .map(|v| VersionInfo::from_version(&package, v))
            .collect())
    }

    /// Create a version at weight 0. The requested weight is ignored; weight
    /// only changes through an update.
    pub async fn create_version(
        &self,
        ctx: &RequestContext,
        request: CreateVersionRequest,
    ) -> Result<VersionInfo, RegistryError> {
        let package = package_from_orn(&request.package_orn)?;
        let name = VersionName::new(request.version.name)?;
        let version = Version::new(name, request.version.manifest_url, self.clock.now());

        let created = self.repo.create_version(ctx, &package, &version).await?;
        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %package,
            version = %created.name,
            "Version created"
        );
        Ok(VersionInfo::from_version(&package, &created))
    }

    pub async fn update_version(
        &self,
        ctx: &RequestContext,
        request: UpdateVersionRequest,
    ) -> Result<VersionInfo, RegistryError> {
        let (package, name) = named_version(&request.orn)?;
        let fields = project_version_update(&request)?;

        let updated = self.repo.update_version(ctx, &package, &name, &fields).await?;
        Ok(VersionInfo::from_version(&package, &updated))
    }

    /// Deleting an absent version succeeds.
    pub async fn delete_version(
        &self,
        ctx: &RequestContext,
        request: DeleteVersionRequest,
    ) -> Result<DeleteInfo, RegistryError> {
        let (package, name) = named_version(&request.orn)?;
        let existed = self.repo.version_exists(ctx, &package, &name).await?;
        self.repo.delete_version(ctx, &package, &name).await?;

        if existed {
            tracing::info!(
                correlation_id = %ctx.correlation_id().short(),
                package = %package,
                version = %name,
                "Version deleted"
            );
        }
        Ok(DeleteInfo {
            orn: version_orn(package.as_str(), name.as_str()),
            existed,
        })
    }
}

fn named_version(orn: &str) -> Result<(PackageName, VersionName), RegistryError> {
    match version_from_orn(orn)? {
        (package, VersionSelector::Named(name)) => Ok((package, name)),
        (_, VersionSelector::Heaviest) => Err(RegistryError::invalid_argument(
            "writes require a concrete version name, not 'any'",
        )),
    }
}
