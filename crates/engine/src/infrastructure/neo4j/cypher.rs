//! Query/mutation builder for the registry graph.
//!
//! ```cypher
//! (p:Package {name, maintainer, created_at})
//!     -[r:VERSIONS {weight}]->
//! (v:Version {name, manifest_url, created_at, version_key})
//! ```
//!
//! Caller values are always bound as parameters. The only text spliced into
//! a statement is a property name rendered from the closed canonical field
//! enums, so no caller input can change a statement's shape.

use std::fmt::Write as _;

use neo4rs::{query, Query};
use polvo_domain::common::format_datetime;
use polvo_domain::{
    FieldKey, FieldNaming, FieldValue, Package, PackageName, PackageUpdate, Version, VersionField,
    VersionName, VersionUpdate,
};

use crate::infrastructure::ports::ListVersionsOptions;

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Int(i64),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for Param {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&FieldValue> for Param {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => Self::Text(s.clone()),
            FieldValue::Unsigned(n) => Self::from(*n),
        }
    }
}

/// Statement text plus its parameters, inspectable before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    text: String,
    params: Vec<(String, Param)>,
}

impl Statement {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    fn param(mut self, key: impl Into<String>, value: impl Into<Param>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn param_value(&self, key: &str) -> Option<&Param> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn into_query(self) -> Query {
        self.params
            .into_iter()
            .fold(query(&self.text), |q, (key, value)| match value {
                Param::Text(s) => q.param(&key, s),
                Param::Int(n) => q.param(&key, n),
            })
    }
}

/// Key backing the composite `(package, version)` uniqueness constraint.
pub fn version_key(package: &str, version: &str) -> String {
    format!("{package}/{version}")
}

const VERSION_ORDER: &str = "ORDER BY r.weight DESC, v.created_at ASC, v.name ASC";

// =============================================================================
// Packages
// =============================================================================

pub fn get_package(name: &PackageName) -> Statement {
    Statement::new("MATCH (p:Package {name: $name}) RETURN p").param("name", name.as_str())
}

pub fn list_packages() -> Statement {
    Statement::new("MATCH (p:Package) RETURN p ORDER BY p.name ASC")
}

pub fn package_exists(name: &PackageName) -> Statement {
    Statement::new("MATCH (p:Package {name: $name}) RETURN count(p) > 0 AS exists")
        .param("name", name.as_str())
}

/// Writes the package only when no package holds the name; zero rows means it was taken.
pub fn create_package(package: &Package) -> Statement {
    Statement::new(
        "WITH $name AS name
         WHERE NOT EXISTS { MATCH (:Package {name: name}) }
         CREATE (p:Package {name: name, maintainer: $maintainer, created_at: $created_at})
         RETURN p",
    )
    .param("name", package.name.as_str())
    .param("maintainer", package.maintainer.as_str())
    .param("created_at", format_datetime(package.created_at))
}

/// Zero rows means the package does not exist.
///
/// A rename also rewrites `version_key` on every version of the package.
pub fn update_package(name: &PackageName, fields: &PackageUpdate) -> Statement {
    let mut text = String::from("MATCH (p:Package {name: $name})");
    let mut statement_params: Vec<(String, Param)> = Vec::new();

    let assignments: Vec<String> = fields
        .rendered(FieldNaming::SnakeCase)
        .map(|(property, value)| {
            let key = format!("set_{property}");
            statement_params.push((key.clone(), Param::from(value)));
            format!("p.{property} = ${key}")
        })
        .collect();
    if !assignments.is_empty() {
        let _ = write!(text, "\nSET {}", assignments.join(", "));
    }

    if fields.name().is_some() {
        text.push_str(
            "\nWITH p
             OPTIONAL MATCH (p)-[:VERSIONS]->(v:Version)
             WITH p, collect(v) AS versions
             FOREACH (v IN versions | SET v.version_key = p.name + '/' + v.name)",
        );
    }
    text.push_str("\nRETURN p");

    statement_params
        .into_iter()
        .fold(Statement::new(text).param("name", name.as_str()), |s, (k, v)| {
            s.param(k, v)
        })
}

/// Removes the package, every version under it, and the edges between them.
pub fn delete_package(name: &PackageName) -> Statement {
    Statement::new(
        "MATCH (p:Package {name: $name})
         OPTIONAL MATCH (p)-[:VERSIONS]->(v:Version)
         WITH p, collect(v) AS versions
         FOREACH (v IN versions | DETACH DELETE v)
         DETACH DELETE p",
    )
    .param("name", name.as_str())
}

// =============================================================================
// Versions
// =============================================================================

pub fn get_version(package: &PackageName, version: &VersionName) -> Statement {
    Statement::new(
        "MATCH (:Package {name: $package})-[r:VERSIONS]->(v:Version {name: $version})
         RETURN v, r.weight AS weight",
    )
    .param("package", package.as_str())
    .param("version", version.as_str())
}

pub fn get_heaviest_version(package: &PackageName) -> Statement {
    Statement::new(format!(
        "MATCH (:Package {{name: $package}})-[r:VERSIONS]->(v:Version)
         RETURN v, r.weight AS weight
         {VERSION_ORDER}
         LIMIT 1"
    ))
    .param("package", package.as_str())
}

/// Versions of an existing package. Existence is checked separately.
pub fn list_versions(package: &PackageName, options: ListVersionsOptions) -> Statement {
    let mut text = String::from(
        "MATCH (:Package {name: $package})-[r:VERSIONS]->(v:Version)
         RETURN v, r.weight AS weight",
    );
    if options.order_by_weight {
        let _ = write!(text, "\n{VERSION_ORDER}");
    }
    let statement = match options.limit {
        Some(limit) => {
            text.push_str("\nLIMIT $limit");
            Statement::new(text).param("limit", limit)
        }
        None => Statement::new(text),
    };
    statement.param("package", package.as_str())
}

pub fn version_exists(package: &PackageName, version: &VersionName) -> Statement {
    Statement::new(
        "MATCH (:Package {name: $package})-[:VERSIONS]->(v:Version {name: $version})
         RETURN count(v) > 0 AS exists",
    )
    .param("package", package.as_str())
    .param("version", version.as_str())
}

/// Writes the version and its weight-0 edge only when the package exists and
/// holds no version of that name; zero rows means a precondition failed.
pub fn create_version(package: &PackageName, version: &Version) -> Statement {
    Statement::new(
        "MATCH (p:Package {name: $package})
         WHERE NOT EXISTS { MATCH (p)-[:VERSIONS]->(:Version {name: $name}) }
         CREATE (p)-[r:VERSIONS {weight: $weight}]->(v:Version {
             name: $name,
             manifest_url: $manifest_url,
             created_at: $created_at,
             version_key: $version_key
         })
         RETURN v, r.weight AS weight",
    )
    .param("package", package.as_str())
    .param("name", version.name.as_str())
    .param("manifest_url", version.manifest_url.as_str())
    .param("created_at", format_datetime(version.created_at))
    .param("weight", 0u32)
    .param(
        "version_key",
        version_key(package.as_str(), version.name.as_str()),
    )
}

/// Version fields live on the node; `weight` lives on the edge.
fn version_target(field: VersionField) -> &'static str {
    match field {
        VersionField::Weight => "r",
        VersionField::Name | VersionField::ManifestUrl => "v",
    }
}

/// Sets only the fields present in `fields`. Returns the (possibly new) name;
/// zero rows means the version does not exist.
pub fn update_version(
    package: &PackageName,
    version: &VersionName,
    fields: &VersionUpdate,
) -> Statement {
    let mut statement_params: Vec<(String, Param)> = Vec::new();
    let mut assignments: Vec<String> = fields
        .iter()
        .map(|(field, value)| {
            let property = field.render(FieldNaming::SnakeCase);
            let key = format!("set_{property}");
            statement_params.push((key.clone(), Param::from(value)));
            format!("{}.{property} = ${key}", version_target(field))
        })
        .collect();
    if fields.name().is_some() {
        assignments.push("v.version_key = p.name + '/' + $set_name".to_string());
    }

    let mut text = String::from(
        "MATCH (p:Package {name: $package})-[r:VERSIONS]->(v:Version {name: $version})",
    );
    if !assignments.is_empty() {
        let _ = write!(text, "\nSET {}", assignments.join(", "));
    }
    text.push_str("\nRETURN v.name AS name");

    statement_params.into_iter().fold(
        Statement::new(text)
            .param("package", package.as_str())
            .param("version", version.as_str()),
        |s, (k, v)| s.param(k, v),
    )
}

/// Removes the version node and its edge from the package. No-op when absent.
pub fn delete_version(package: &PackageName, version: &VersionName) -> Statement {
    Statement::new(
        "MATCH (:Package {name: $package})-[:VERSIONS]->(v:Version {name: $version})
         DETACH DELETE v",
    )
    .param("package", package.as_str())
    .param("version", version.as_str())
}
