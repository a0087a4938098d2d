//! Neo4j graph backend for the registry.

mod cypher;
mod graph;
mod helpers;
mod package_repo;
mod schema;
mod transaction;
mod version_repo;


pub use graph::Neo4jGraph;
pub use schema::ensure_schema;
pub use transaction::{AccessMode, GraphTxn};

/// Package and version storage over one graph handle.
///
/// Each operation runs in its own transaction; no state is kept between calls.
#[derive(Clone)]
pub struct Neo4jRegistryRepo {
    graph: Neo4jGraph,
}

impl Neo4jRegistryRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Neo4jGraph {
        &self.graph
    }
}
