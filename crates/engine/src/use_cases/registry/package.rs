//! Package CRUD operations.

use std::sync::Arc;

use polvo_domain::orn::package_orn;
use polvo_domain::{Package, PackageName};
use polvo_shared::{
    CreatePackageRequest, DeleteInfo, DeletePackageRequest, GetPackageRequest, PackageInfo,
    UpdatePackageRequest,
};

use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::{ClockPort, PackageRepo};

use super::{package_from_orn, project_package_update, RegistryError};

pub struct PackageCrud {
    repo: Arc<dyn PackageRepo>,
    clock: Arc<dyn ClockPort>,
}

impl PackageCrud {
    pub fn new(repo: Arc<dyn PackageRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub async fn create_package(
        &self,
        ctx: &RequestContext,
        request: CreatePackageRequest,
    ) -> Result<PackageInfo, RegistryError> {
        let name = PackageName::new(request.package.name)?;
        let package = Package::new(name, request.package.maintainer, self.clock.now());

        let created = self.repo.create_package(ctx, &package).await?;
        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %created.name,
            "Package created"
        );
        Ok(PackageInfo::from(&created))
    }

    pub async fn get_package(
        &self,
        ctx: &RequestContext,
        request: GetPackageRequest,
    ) -> Result<PackageInfo, RegistryError> {
        let name = package_from_orn(&request.orn)?;
        let package = self.repo.get_package(ctx, &name).await?;
        Ok(PackageInfo::from(&package))
    }

    pub async fn list_packages(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<PackageInfo>, RegistryError> {
        let packages = self.repo.list_packages(ctx).await?;
        Ok(packages.iter().map(PackageInfo::from).collect())
    }

    /// Apply the fields selected by the request's mask.
    pub async fn update_package(
        &self,
        ctx: &RequestContext,
        request: UpdatePackageRequest,
    ) -> Result<PackageInfo, RegistryError> {
        let name = package_from_orn(&request.orn)?;
        let fields = project_package_update(&request)?;

        let updated = self.repo.update_package(ctx, &name, &fields).await?;
        Ok(PackageInfo::from(&updated))
    }

    /// Delete a package and its versions. Deleting an absent package succeeds.
    pub async fn delete_package(
        &self,
        ctx: &RequestContext,
        request: DeletePackageRequest,
    ) -> Result<DeleteInfo, RegistryError> {
        let name = package_from_orn(&request.orn)?;
        let existed = self.repo.package_exists(ctx, &name).await?;
        self.repo.delete_package(ctx, &name).await?;

        if existed {
            tracing::info!(
                correlation_id = %ctx.correlation_id().short(),
                package = %name,
                "Package deleted"
            );
        }
        Ok(DeleteInfo {
            orn: package_orn(name.as_str()),
            existed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockPackageRepo, RepoError};
    use crate::test_fixtures::{fixed_now, package};
    use polvo_shared::{ErrorCode, FieldMask, PackageData};

    fn crud(repo: MockPackageRepo) -> PackageCrud {
        PackageCrud::new(Arc::new(repo), Arc::new(FixedClock(fixed_now())))
    }

    #[tokio::test]
    async fn create_stamps_clock_and_returns_canonical_orn() {
        let mut repo = MockPackageRepo::new();
        repo.expect_create_package()
            .withf(|_, p| p.name.as_str() == "core" && p.created_at == fixed_now())
            .returning(|_, p| Ok(p.clone()));

        let info = crud(repo)
            .create_package(
                &RequestContext::new(),
                CreatePackageRequest {
                    package: PackageData {
                        name: " core ".into(),
                        maintainer: "team-a".into(),
                    },
                },
            )
            .await
            .unwrap();

        assert_eq!(info.orn, "packages/core");
        assert_eq!(info.maintainer, "team-a");
    }

    #[tokio::test]
    async fn create_with_invalid_name_never_reaches_repo() {
        let repo = MockPackageRepo::new();
        let err = crud(repo)
            .create_package(
                &RequestContext::new(),
                CreatePackageRequest {
                    package: PackageData::default(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn duplicate_create_maps_to_already_exists() {
        let mut repo = MockPackageRepo::new();
        repo.expect_create_package()
            .returning(|_, p| Err(RepoError::already_exists("Package", p.name.as_str())));

        let err = crud(repo)
            .create_package(
                &RequestContext::new(),
                CreatePackageRequest {
                    package: PackageData {
                        name: "core".into(),
                        maintainer: String::new(),
                    },
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyExists);
    }

    #[tokio::test]
    async fn get_resolves_nested_orn() {
        let mut repo = MockPackageRepo::new();
        repo.expect_get_package()
            .withf(|_, name| name.as_str() == "core")
            .returning(|_, name| Ok(package(name.as_str())));

        let info = crud(repo)
            .get_package(
                &RequestContext::new(),
                GetPackageRequest {
                    orn: "orn:polvo/projects/acme/packages/core".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(info.name, "core");
    }

    #[tokio::test]
    async fn update_passes_only_masked_fields() {
        let mut repo = MockPackageRepo::new();
        repo.expect_update_package()
            .withf(|_, name, fields| {
                name.as_str() == "core" && fields.len() == 1 && fields.maintainer() == Some("team-b")
            })
            .returning(|_, name, _| {
                let mut p = package(name.as_str());
                p.maintainer = "team-b".into();
                Ok(p)
            });

        let info = crud(repo)
            .update_package(
                &RequestContext::new(),
                UpdatePackageRequest {
                    orn: "packages/core".into(),
                    package: PackageData {
                        name: String::new(),
                        maintainer: "team-b".into(),
                    },
                    field_mask: FieldMask::new(["package.maintainer"]),
                },
            )
            .await
            .unwrap();
        assert_eq!(info.maintainer, "team-b");
        assert_eq!(info.name, "core");
    }

    #[tokio::test]
    async fn delete_reports_whether_package_existed() {
        let mut repo = MockPackageRepo::new();
        repo.expect_package_exists().returning(|_, _| Ok(false));
        repo.expect_delete_package().times(1).returning(|_, _| Ok(()));

        let info = crud(repo)
            .delete_package(
                &RequestContext::new(),
                DeletePackageRequest {
                    orn: "packages/ghost".into(),
                },
            )
            .await
            .unwrap();
        assert!(!info.existed);
        assert_eq!(info.orn, "packages/ghost");
    }
}
