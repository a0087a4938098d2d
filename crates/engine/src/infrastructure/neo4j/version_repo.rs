//! Neo4j version operations.
//!
//! Versions are always reached through their package, so a missing package
//! and a missing version both read as "not found".

use async_trait::async_trait;
use polvo_domain::{PackageName, Version, VersionName, VersionUpdate, ANY_VERSION};

use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::{ListVersionsOptions, RepoError, VersionRepo};

use super::cypher::{self, version_key};
use super::helpers::{version_from_row, RowExt};
use super::transaction::{AccessMode, GraphTxn};
use super::Neo4jRegistryRepo;

async fn package_present(txn: &mut GraphTxn<'_>, package: &PackageName) -> Result<bool, RepoError> {
    match txn.fetch_one(cypher::package_exists(package)).await? {
        Some(row) => row.get_bool_strict("exists"),
        None => Ok(false),
    }
}

#[async_trait]
impl VersionRepo for Neo4jRegistryRepo {
    async fn get_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<Version, RepoError> {
        let mut txn = self.graph.begin(ctx, "get_version", AccessMode::Read).await?;
        let result = async {
            let row = txn
                .fetch_one(cypher::get_version(package, version))
                .await?
                .ok_or_else(|| {
                    RepoError::not_found("Version", version_key(package.as_str(), version.as_str()))
                })?;
            version_from_row(&row)
        }
        .await;
        txn.finish(result).await
    }

    async fn get_heaviest_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
    ) -> Result<Version, RepoError> {
        let mut txn = self
            .graph
            .begin(ctx, "get_heaviest_version", AccessMode::Read)
            .await?;
        let result = async {
            let row = txn
                .fetch_one(cypher::get_heaviest_version(package))
                .await?
                .ok_or_else(|| {
                    RepoError::not_found("Version", version_key(package.as_str(), ANY_VERSION))
                })?;
            version_from_row(&row)
        }
        .await;
        let version = txn.finish(result).await?;

        tracing::debug!(
            correlation_id = %ctx.correlation_id().short(),
            package = %package,
            version = %version.name,
            weight = version.weight,
            "Resolved heaviest version"
        );
        Ok(version)
    }

    async fn list_versions(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        options: ListVersionsOptions,
    ) -> Result<Vec<Version>, RepoError> {
        let mut txn = self.graph.begin(ctx, "list_versions", AccessMode::Read).await?;
        let result = async {
            if !package_present(&mut txn, package).await? {
                return Err(RepoError::not_found("Package", package));
            }
            txn.fetch_all(cypher::list_versions(package, options))
                .await?
                .iter()
                .map(version_from_row)
                .collect::<Result<Vec<_>, _>>()
        }
        .await;
        txn.finish(result).await
    }

    async fn create_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &Version,
    ) -> Result<Version, RepoError> {
        let key = version_key(package.as_str(), version.name.as_str());
        let mut txn = self
            .graph
            .begin(ctx, "create_version", AccessMode::Write)
            .await?;
        let result = async {
            if let Some(row) = txn.fetch_one(cypher::create_version(package, version)).await? {
                return version_from_row(&row);
            }
            // The guarded create wrote nothing; report which precondition failed.
            if package_present(&mut txn, package).await? {
                Err(RepoError::already_exists("Version", &key))
            } else {
                Err(RepoError::not_found("Package", package))
            }
        }
        .await;
        let created = txn
            .finish(result)
            .await
            .map_err(|e| e.on_conflict("Version", &key))?;

        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %package,
            version = %created.name,
            "Created version"
        );
        Ok(created)
    }

    async fn update_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
        fields: &VersionUpdate,
    ) -> Result<Version, RepoError> {
        if fields.is_empty() {
            return self.get_version(ctx, package, version).await;
        }
        let target = fields.name().unwrap_or(version.as_str()).to_string();

        let mut txn = self
            .graph
            .begin(ctx, "update_version", AccessMode::Write)
            .await?;
        let result = async {
            let row = txn
                .fetch_one(cypher::update_version(package, version, fields))
                .await?
                .ok_or_else(|| {
                    RepoError::not_found("Version", version_key(package.as_str(), version.as_str()))
                })?;
            let name = row.get_string_strict("name")?;
            VersionName::new(name).map_err(|e| RepoError::serialization(e.to_string()))
        }
        .await;
        let current = txn
            .finish(result)
            .await
            .map_err(|e| e.on_conflict("Version", version_key(package.as_str(), &target)))?;

        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %package,
            version = %version,
            fields = fields.len(),
            "Updated version"
        );

        // Read back after commit rather than trusting the mutation result.
        self.get_version(ctx, package, &current).await
    }

    async fn delete_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<(), RepoError> {
        let mut txn = self
            .graph
            .begin(ctx, "delete_version", AccessMode::Write)
            .await?;
        let result = txn.run(cypher::delete_version(package, version)).await;
        txn.finish(result).await?;

        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %package,
            version = %version,
            "Deleted version"
        );
        Ok(())
    }

    async fn version_exists(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<bool, RepoError> {
        let mut txn = self
            .graph
            .begin(ctx, "version_exists", AccessMode::Read)
            .await?;
        let result = async {
            match txn.fetch_one(cypher::version_exists(package, version)).await? {
                Some(row) => row.get_bool_strict("exists"),
                None => Ok(false),
            }
        }
        .await;
        txn.finish(result).await
    }
}
