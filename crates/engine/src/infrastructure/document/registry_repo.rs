//! Registry storage over the document store.
//!
//! Packages live at `packages/<name>`, versions at
//! `packages/<name>/versions/<version>`, with camelCase document keys.
//! Every operation takes the store lock once and does not suspend while
//! holding it, so each operation is atomic. Cancellation and the deadline
//! are honoured up to the moment the lock is acquired.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use polvo_domain::common::{format_datetime, parse_datetime};
use polvo_domain::orn::{package_orn, version_orn};
use polvo_domain::{
    FieldKey, FieldNaming, FieldValue, Package, PackageField, PackageName, PackageUpdate,
    Version, VersionField, VersionName, VersionUpdate, ANY_VERSION,
};
use serde_json::Value;

use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::{
    ListVersionsOptions, PackageRepo, RepoError, VersionRepo,
};

use super::store::{Document, DocumentStore, Documents, Listed};

const BACKEND: &str = "document";
const CREATED_AT: &str = "createdAt";

fn versions_collection(package: &PackageName) -> String {
    format!("{}/versions", package_orn(package.as_str()))
}

fn key<F: FieldKey>(field: F) -> &'static str {
    field.render(FieldNaming::CamelCase)
}

fn to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Unsigned(n) => Value::from(*n),
    }
}

fn text<'a>(doc: &'a Document, field: &str) -> Result<&'a str, RepoError> {
    doc.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| RepoError::serialization(format!("Missing required key '{field}'")))
}

fn package_to_doc(package: &Package) -> Document {
    let mut doc = Document::new();
    doc.insert(key(PackageField::Name).into(), package.name.as_str().into());
    doc.insert(
        key(PackageField::Maintainer).into(),
        package.maintainer.as_str().into(),
    );
    doc.insert(CREATED_AT.into(), format_datetime(package.created_at).into());
    doc
}

fn package_from_doc(doc: &Document) -> Result<Package, RepoError> {
    let name = PackageName::new(text(doc, key(PackageField::Name))?)
        .map_err(|e| RepoError::serialization(format!("Stored package name is invalid: {e}")))?;
    let created_at = parse_datetime(text(doc, CREATED_AT)?)
        .map_err(|e| RepoError::serialization(format!("Invalid '{CREATED_AT}': {e}")))?;
    Ok(Package {
        name,
        maintainer: text(doc, key(PackageField::Maintainer))
            .unwrap_or_default()
            .to_string(),
        created_at,
    })
}

fn version_to_doc(version: &Version) -> Document {
    let mut doc = Document::new();
    doc.insert(key(VersionField::Name).into(), version.name.as_str().into());
    doc.insert(
        key(VersionField::ManifestUrl).into(),
        version.manifest_url.as_str().into(),
    );
    doc.insert(key(VersionField::Weight).into(), version.weight.into());
    doc.insert(CREATED_AT.into(), format_datetime(version.created_at).into());
    doc
}

fn version_from_doc(doc: &Document) -> Result<Version, RepoError> {
    let name = VersionName::new(text(doc, key(VersionField::Name))?)
        .map_err(|e| RepoError::serialization(format!("Stored version name is invalid: {e}")))?;
    let weight = doc
        .get(key(VersionField::Weight))
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| RepoError::serialization("Missing or invalid 'weight'"))?;
    let created_at = parse_datetime(text(doc, CREATED_AT)?)
        .map_err(|e| RepoError::serialization(format!("Invalid '{CREATED_AT}': {e}")))?;
    Ok(Version {
        name,
        manifest_url: text(doc, key(VersionField::ManifestUrl))
            .unwrap_or_default()
            .to_string(),
        weight,
        created_at,
    })
}

fn apply<F: FieldKey>(doc: &mut Document, fields: &polvo_domain::FieldSet<F>) {
    for (property, value) in fields.rendered(FieldNaming::CamelCase) {
        doc.insert(property.to_string(), to_json(value));
    }
}

fn weight_of(listed: &Listed<'_>) -> u32 {
    listed
        .data
        .get(key(VersionField::Weight))
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Versions of a package, heaviest first; equal weights keep insertion order.
fn versions_by_weight<'a>(docs: &'a Documents, package: &PackageName) -> Vec<Listed<'a>> {
    let mut listed = docs.list(&versions_collection(package));
    listed.sort_by_key(|l| (Reverse(weight_of(l)), l.seq));
    listed
}

/// Registry repository over the in-memory document store.
#[derive(Clone, Default)]
pub struct DocumentRegistryRepo {
    store: Arc<DocumentStore>,
}

impl DocumentRegistryRepo {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PackageRepo for DocumentRegistryRepo {
    async fn get_package(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
    ) -> Result<Package, RepoError> {
        let docs = ctx
            .guard("get_package", async { Ok(self.store.read().await) })
            .await?;
        let doc = docs
            .get(&package_orn(name.as_str()))
            .ok_or_else(|| RepoError::not_found("Package", name))?;
        package_from_doc(doc)
    }

    async fn list_packages(&self, ctx: &RequestContext) -> Result<Vec<Package>, RepoError> {
        let docs = ctx
            .guard("list_packages", async { Ok(self.store.read().await) })
            .await?;
        docs.list("packages")
            .iter()
            .map(|listed| package_from_doc(listed.data))
            .collect()
    }

    async fn create_package(
        &self,
        ctx: &RequestContext,
        package: &Package,
    ) -> Result<Package, RepoError> {
        let mut docs = ctx
            .guard("create_package", async { Ok(self.store.write().await) })
            .await?;
        if !docs.create(package_orn(package.name.as_str()), package_to_doc(package)) {
            return Err(RepoError::already_exists("Package", &package.name));
        }
        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %package.name,
            "Created package document"
        );
        Ok(package.clone())
    }

    async fn update_package(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
        fields: &PackageUpdate,
    ) -> Result<Package, RepoError> {
        let mut docs = ctx
            .guard("update_package", async { Ok(self.store.write().await) })
            .await?;
        let doc = docs
            .get_mut(&package_orn(name.as_str()))
            .ok_or_else(|| RepoError::not_found("Package", name))?;
        if fields.name().is_some_and(|new| new != name.as_str()) {
            return Err(RepoError::unsupported("rename_package", BACKEND));
        }
        apply(doc, fields);
        package_from_doc(doc)
    }

    async fn delete_package(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
    ) -> Result<(), RepoError> {
        let mut docs = ctx
            .guard("delete_package", async { Ok(self.store.write().await) })
            .await?;
        let removed = docs.delete_tree(&package_orn(name.as_str()));
        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %name,
            documents = removed,
            "Deleted package documents"
        );
        Ok(())
    }

    async fn package_exists(
        &self,
        ctx: &RequestContext,
        name: &PackageName,
    ) -> Result<bool, RepoError> {
        let docs = ctx
            .guard("package_exists", async { Ok(self.store.read().await) })
            .await?;
        Ok(docs.contains(&package_orn(name.as_str())))
    }
}

#[async_trait]
impl VersionRepo for DocumentRegistryRepo {
    async fn get_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<Version, RepoError> {
        let docs = ctx
            .guard("get_version", async { Ok(self.store.read().await) })
            .await?;
        let path = version_orn(package.as_str(), version.as_str());
        let doc = docs
            .get(&path)
            .ok_or_else(|| RepoError::not_found("Version", format!("{package}/{version}")))?;
        version_from_doc(doc)
    }

    async fn get_heaviest_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
    ) -> Result<Version, RepoError> {
        let docs = ctx
            .guard("get_heaviest_version", async { Ok(self.store.read().await) })
            .await?;
        let heaviest = versions_by_weight(&docs, package)
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::not_found("Version", format!("{package}/{ANY_VERSION}")))?;
        version_from_doc(heaviest.data)
    }

    async fn list_versions(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        options: ListVersionsOptions,
    ) -> Result<Vec<Version>, RepoError> {
        let docs = ctx
            .guard("list_versions", async { Ok(self.store.read().await) })
            .await?;
        if !docs.contains(&package_orn(package.as_str())) {
            return Err(RepoError::not_found("Package", package));
        }
        let mut listed = if options.order_by_weight {
            versions_by_weight(&docs, package)
        } else {
            let mut listed = docs.list(&versions_collection(package));
            listed.sort_by_key(|l| l.seq);
            listed
        };
        if let Some(limit) = options.limit {
            listed.truncate(limit as usize);
        }
        listed.iter().map(|l| version_from_doc(l.data)).collect()
    }

    async fn create_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &Version,
    ) -> Result<Version, RepoError> {
        let mut docs = ctx
            .guard("create_version", async { Ok(self.store.write().await) })
            .await?;
        if !docs.contains(&package_orn(package.as_str())) {
            return Err(RepoError::not_found("Package", package));
        }
        let created = Version {
            weight: 0,
            ..version.clone()
        };
        let path = version_orn(package.as_str(), created.name.as_str());
        if !docs.create(path, version_to_doc(&created)) {
            return Err(RepoError::already_exists(
                "Version",
                format!("{package}/{}", created.name),
            ));
        }
        tracing::info!(
            correlation_id = %ctx.correlation_id().short(),
            package = %package,
            version = %created.name,
            "Created version document"
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
        let mut docs = ctx
            .guard("update_version", async { Ok(self.store.write().await) })
            .await?;
        let path = version_orn(package.as_str(), version.as_str());
        if !docs.contains(&path) {
            return Err(RepoError::not_found("Version", format!("{package}/{version}")));
        }

        let target = match fields.name() {
            Some(new_name) if new_name != version.as_str() => {
                let target = version_orn(package.as_str(), new_name);
                if !docs.rename(&path, target.clone()) {
                    return Err(RepoError::already_exists(
                        "Version",
                        format!("{package}/{new_name}"),
                    ));
                }
                target
            }
            _ => path,
        };

        let doc = docs
            .get_mut(&target)
            .ok_or_else(|| RepoError::not_found("Version", &target))?;
        apply(doc, fields);
        version_from_doc(doc)
    }

    async fn delete_version(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<(), RepoError> {
        let mut docs = ctx
            .guard("delete_version", async { Ok(self.store.write().await) })
            .await?;
        docs.delete(&version_orn(package.as_str(), version.as_str()));
        Ok(())
    }

    async fn version_exists(
        &self,
        ctx: &RequestContext,
        package: &PackageName,
        version: &VersionName,
    ) -> Result<bool, RepoError> {
        let docs = ctx
            .guard("version_exists", async { Ok(self.store.read().await) })
            .await?;
        Ok(docs.contains(&version_orn(package.as_str(), version.as_str())))
    }
}
