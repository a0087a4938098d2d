//! Neo4j test harness for E2E testing.
//!
//! Provides testcontainer-based Neo4j instance management for integration tests.

use neo4rs::query;
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};

use crate::infrastructure::config::Neo4jConfig;
use crate::infrastructure::neo4j::{ensure_schema, Neo4jGraph};

/// Password used for Neo4j test containers.
pub const TEST_NEO4J_PASSWORD: &str = "testpassword";

/// Neo4j test harness managing container lifecycle.
pub struct Neo4jTestHarness {
    _container: ContainerAsync<GenericImage>,
    graph: Neo4jGraph,
}

impl Neo4jTestHarness {
    /// Start a new Neo4j container, connect, and install the registry schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or connection cannot be established.
    pub async fn start() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container: ContainerAsync<GenericImage> = neo4j_image(TEST_NEO4J_PASSWORD).start().await;
        let bolt_port = container.get_host_port_ipv4(7687).await;

        let config = Neo4jConfig {
            uri: format!("bolt://127.0.0.1:{bolt_port}"),
            user: "neo4j".to_string(),
            password: TEST_NEO4J_PASSWORD.to_string(),
            database: "neo4j".to_string(),
            // ~45 seconds with capped backoff
            connect_attempts: 30,
        };
        let graph = Neo4jGraph::connect(&config).await?;
        ensure_schema(&graph).await?;

        Ok(Self {
            _container: container,
            graph,
        })
    }

    /// Get reference to the Neo4j graph connection.
    pub fn graph(&self) -> &Neo4jGraph {
        &self.graph
    }

    /// Clone the graph connection for use in other components.
    pub fn graph_clone(&self) -> Neo4jGraph {
        self.graph.clone()
    }

    /// Clean all data from the database. Constraints and indexes stay.
    pub async fn clean(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        clean_db(&self.graph).await
    }
}

/// Create a Neo4j container image with the given password.
///
/// Configuration for reliability:
/// - Pinned version for consistency across runs
/// - Memory limits to prevent JVM crashes
/// - No stdout wait; readiness is verified by the connection retry loop
pub fn neo4j_image(password: &str) -> GenericImage {
    GenericImage::new("neo4j", "5.26.0-community")
        .with_env_var("NEO4J_AUTH", format!("neo4j/{password}"))
        .with_env_var(
            "NEO4J_dbms_connector_bolt_advertised__address",
            "localhost:7687",
        )
        .with_env_var("NEO4J_server_memory_heap_initial__size", "256m")
        .with_env_var("NEO4J_server_memory_heap_max__size", "512m")
        .with_env_var("NEO4J_server_memory_pagecache_size", "128m")
        .with_exposed_port(7687)
        .with_wait_for(WaitFor::seconds(5))
}

/// Clean all data from a Neo4j database.
pub async fn clean_db(graph: &Neo4jGraph) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    graph
        .run(query("MATCH (n) DETACH DELETE n"))
        .await
        .map_err(|e| format!("Failed to clean database: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker (testcontainers)"]
    async fn test_neo4j_harness_clean_removes_all_data() {
        let harness = Neo4jTestHarness::start()
            .await
            .expect("Failed to start Neo4j harness");

        harness
            .graph()
            .run(query("CREATE (:Package {name: 'scratch'})"))
            .await
            .expect("Create failed");

        harness.clean().await.expect("Clean failed");

        let mut result = harness
            .graph()
            .execute(query("MATCH (n) RETURN count(n) as count"))
            .await
            .expect("Count query failed");

        let row = result.next().await.expect("No result").expect("Row error");
        let count: i64 = row.get("count").expect("Column not found");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    #[ignore = "requires docker (testcontainers)"]
    async fn test_schema_is_idempotent() {
        let harness = Neo4jTestHarness::start()
            .await
            .expect("Failed to start Neo4j harness");

        ensure_schema(harness.graph())
            .await
            .expect("second ensure_schema should succeed");
    }
}
