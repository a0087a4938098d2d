//! Neo4j deserialization helpers for row conversion functions.
//!
//! Extension traits and conversions that turn rows and nodes into domain
//! records. Conversions are strict: a missing or malformed property is an
//! error, never a silently defaulted value.

use chrono::{DateTime, Utc};
use neo4rs::{Node, Row};
use polvo_domain::common::parse_datetime;
use polvo_domain::{Package, PackageName, Version, VersionName};

use crate::infrastructure::ports::RepoError;

/// Map a driver error, recognising uniqueness-constraint rejections and
/// transient aborts.
pub fn map_neo4j_error(operation: &'static str, e: neo4rs::Error) -> RepoError {
    classify_failure(operation, e.to_string())
}

fn classify_failure(operation: &'static str, message: String) -> RepoError {
    if message.contains("ConstraintValidationFailed") || message.contains("already exists with") {
        RepoError::ConstraintViolation(message)
    } else if message.contains("TransientError") || message.contains("DeadlockDetected") {
        RepoError::Aborted { operation, message }
    } else {
        RepoError::database(operation, message)
    }
}

/// Extension trait for Neo4j Node to simplify common deserialization patterns.
pub trait NodeExt {
    /// Get a required string field with strict error handling (fail-fast).
    fn get_string_strict(&self, field: &str) -> Result<String, RepoError>;

    /// Get a required RFC 3339 timestamp field.
    fn get_datetime_strict(&self, field: &str) -> Result<DateTime<Utc>, RepoError>;
}

impl NodeExt for Node {
    fn get_string_strict(&self, field: &str) -> Result<String, RepoError> {
        self.get(field).map_err(|e| {
            RepoError::serialization(format!("Missing required field '{field}': {e}"))
        })
    }

    fn get_datetime_strict(&self, field: &str) -> Result<DateTime<Utc>, RepoError> {
        let s = self.get_string_strict(field)?;
        parse_datetime(&s).map_err(|e| {
            RepoError::serialization(format!(
                "Invalid datetime in field '{field}': {e} (value: '{s}')"
            ))
        })
    }
}

/// Extension trait for Neo4j Row to simplify common deserialization patterns.
pub trait RowExt {
    fn get_node_strict(&self, column: &str) -> Result<Node, RepoError>;

    fn get_bool_strict(&self, column: &str) -> Result<bool, RepoError>;

    /// Integer column that must fit a `u32`.
    fn get_u32_strict(&self, column: &str) -> Result<u32, RepoError>;

    fn get_string_strict(&self, column: &str) -> Result<String, RepoError>;
}

impl RowExt for Row {
    fn get_node_strict(&self, column: &str) -> Result<Node, RepoError> {
        self.get(column).map_err(|e| {
            RepoError::serialization(format!("Missing required column '{column}': {e}"))
        })
    }

    fn get_bool_strict(&self, column: &str) -> Result<bool, RepoError> {
        self.get(column).map_err(|e| {
            RepoError::serialization(format!("Missing required column '{column}': {e}"))
        })
    }

    fn get_u32_strict(&self, column: &str) -> Result<u32, RepoError> {
        let n: i64 = self.get(column).map_err(|e| {
            RepoError::serialization(format!("Missing required column '{column}': {e}"))
        })?;
        u32::try_from(n).map_err(|_| {
            RepoError::serialization(format!("Column '{column}' out of range: {n}"))
        })
    }

    fn get_string_strict(&self, column: &str) -> Result<String, RepoError> {
        self.get(column).map_err(|e| {
            RepoError::serialization(format!("Missing required column '{column}': {e}"))
        })
    }
}

pub fn package_from_node(node: &Node) -> Result<Package, RepoError> {
    let name = PackageName::new(node.get_string_strict("name")?)
        .map_err(|e| RepoError::serialization(format!("Stored package name is invalid: {e}")))?;
    Ok(Package {
        name,
        maintainer: node.get_string_strict("maintainer")?,
        created_at: node.get_datetime_strict("created_at")?,
    })
}

/// Expects the version node in column `v` and the edge weight in `weight`.
pub fn version_from_row(row: &Row) -> Result<Version, RepoError> {
    let node = row.get_node_strict("v")?;
    let name = VersionName::new(node.get_string_strict("name")?)
        .map_err(|e| RepoError::serialization(format!("Stored version name is invalid: {e}")))?;
    Ok(Version {
        name,
        manifest_url: node.get_string_strict("manifest_url")?,
        weight: row.get_u32_strict("weight")?,
        created_at: node.get_datetime_strict("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_rejections_become_conflicts() {
        let err = classify_failure(
            "create_package",
            "Neo.ClientError.Schema.ConstraintValidationFailed: Node(3) already exists with label `Package`".into(),
        );
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
        assert!(err.on_conflict("Package", "core").is_already_exists());
    }

    #[test]
    fn transient_failures_are_aborted() {
        let err = classify_failure(
            "update_version",
            "Neo.TransientError.Transaction.DeadlockDetected: cycle".into(),
        );
        assert!(matches!(err, RepoError::Aborted { operation: "update_version", .. }));
    }

    #[test]
    fn anything_else_is_a_database_error() {
        let err = classify_failure("commit", "connection reset".into());
        assert!(matches!(err, RepoError::Database { operation: "commit", .. }));
    }
}
