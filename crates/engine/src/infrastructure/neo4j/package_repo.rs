//! Neo4j package operations.

use async_trait::async_trait;
use polvo_domain::{Package, PackageName, PackageUpdate};

use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::{PackageRepo, RepoError};

use super::cypher;
use super::helpers::{package_from_node, RowExt};
use super::transaction::AccessMode;
use super::Neo4jRegistryRepo;

#[async_trait]
impl PackageRepo for Neo4jRegistryRepo {
    async fn get_package(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
    ) -> Result<Package, RepoError> {
        let mut txn = self.graph.begin(ctx, "get_package", AccessMode::Read).await?;
        let result = async {
            let row = txn
                .fetch_one(cypher::get_package(name))
                .await?
                .ok_or_else(|| RepoError::not_found("Package", name))?;
            package_from_node(&row.get_node_strict("p")?)
        }
        .await;
        txn.finish(result).await
    }

    async fn list_packages(&self, ctx: &RequestContext) -> Result<Vec<Package>, RepoError> {
        let mut txn = self.graph.begin(ctx, "list_packages", AccessMode::Read).await?;
        let result = async {
            txn.fetch_all(cypher::list_packages())
                .await?
                .iter()
                .map(|row| package_from_node(&row.get_node_strict("p")?))
                .collect::<Result<Vec<_>, _>>()
        }
        .await;
        let packages = txn.finish(result).await?;

        tracing::debug!(
            correlation_id = %ctx.correlation_id().short(),
            count = packages.len(),
            "Listed packages"
        );
        Ok(packages)
    }

    async fn create_package(
        &self,
        ctx: &RequestContext,
        package: &Package,
    ) -> Result<Package, RepoError> {
        let mut txn = self
            .graph
            .begin(ctx, "create_package", AccessMode::Write)
            .await?;
        let result = async {
            let row = txn
                .fetch_one(cypher::create_package(package))
                .await?
                .ok_or_else(|| RepoError::already_exists("Package", &package.name))?;
            package_from_node(&row.get_node_strict("p")?)
        }
        .await;
        let created = txn
            .finish(result)
            .await
            .map_err(|e| e.on_conflict("Package", &package.name))?;

        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %created.name,
            "Created package"
        );
        Ok(created)
    }

    async fn update_package(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
        fields: &PackageUpdate,
    ) -> Result<Package, RepoError> {
        if fields.is_empty() {
            return self.get_package(ctx, name).await;
        }
        let target = fields.name().unwrap_or(name.as_str()).to_string();

        let mut txn = self
            .graph
            .begin(ctx, "update_package", AccessMode::Write)
            .await?;
        let result = async {
            let row = txn
                .fetch_one(cypher::update_package(name, fields))
                .await?
                .ok_or_else(|| RepoError::not_found("Package", name))?;
            package_from_node(&row.get_node_strict("p")?)
        }
        .await;
        let updated = txn
            .finish(result)
            .await
            .map_err(|e| e.on_conflict("Package", &target))?;

        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %name,
            fields = fields.len(),
            "Updated package"
        );
        Ok(updated)
    }

    async fn delete_package(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
    ) -> Result<(), RepoError> {
        let mut txn = self
            .graph
            .begin(ctx, "delete_package", AccessMode::Write)
            .await?;
        let result = txn.run(cypher::delete_package(name)).await;
        txn.finish(result).await?;

        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %name,
            "Deleted package with its versions"
        );
        Ok(())
    }

    async fn package_exists(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
    ) -> Result<bool, RepoError> {
        let mut txn = self
            .graph
            .begin(ctx, "package_exists", AccessMode::Read)
            .await?;
        let result = async {
            match txn.fetch_one(cypher::package_exists(name)).await? {
                Some(row) => row.get_bool_strict("exists"),
                None => Ok(false),
            }
        }
        .await;
        txn.finish(result).await
    }
}
