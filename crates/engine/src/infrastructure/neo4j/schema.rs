//! Neo4j schema initialization - constraints and indexes.

use neo4rs::query;

use crate::infrastructure::neo4j::Neo4jGraph;

/// Initialize Neo4j schema with required constraints and indexes.
///
/// This should be called once on startup. Constraints are created with
/// IF NOT EXISTS to be idempotent.
pub async fn ensure_schema(graph: &Neo4jGraph) -> Result<(), neo4rs::Error> {
    // Package names are the external identity key.
    graph
        .run(query(
            "CREATE CONSTRAINT package_name_unique IF NOT EXISTS
             FOR (p:Package) REQUIRE p.name IS UNIQUE",
        ))
        .await?;

    // Composite key (package name + version name), flattened into version_key.
    // Rejects duplicate versions that race past the in-query guard.
    graph
        .run(query(
            "CREATE CONSTRAINT version_key_unique IF NOT EXISTS
             FOR (v:Version) REQUIRE v.version_key IS UNIQUE",
        ))
        .await?;

    graph
        .run(query(
            "CREATE INDEX version_name IF NOT EXISTS
             FOR (v:Version) ON (v.name)",
        ))
        .await?;

    tracing::info!("Neo4j schema initialized (constraints and indexes ensured)");
    Ok(())
}
