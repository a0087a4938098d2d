//! Neo4j graph handle.

use std::time::Duration;

use neo4rs::{query, ConfigBuilder, Graph};
use tokio::time::sleep;

use crate::infrastructure::config::Neo4jConfig;
use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::RepoError;

use super::transaction::{AccessMode, GraphTxn};

/// Concrete wrapper around `neo4rs::Graph`.
///
/// Created once at startup and handed to the repository; the driver pools
/// its own connections behind it.
#[derive(Clone)]
pub struct Neo4jGraph {
    inner: Graph,
}

impl Neo4jGraph {
    pub fn new(graph: Graph) -> Self {
        Self { inner: graph }
    }

    /// Connect with exponential backoff, verifying each connection with a query.
    ///
    /// Backoff: 500ms -> 1s -> 2s -> 4s -> 5s (capped).
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, RepoError> {
        let max_attempts = config.connect_attempts.max(1);
        let max_delay = Duration::from_secs(5);
        let mut delay = Duration::from_millis(500);
        let mut last_err = String::from("unknown");

        for attempt in 1..=max_attempts {
            match Self::connect_once(config).await {
                Ok(graph) => {
                    tracing::info!(attempt, uri = %config.uri, "Neo4j connection established and verified");
                    return Ok(Self::new(graph));
                }
                Err(e) => last_err = e.to_string(),
            }

            if attempt < max_attempts {
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_err,
                    "Retrying Neo4j connection"
                );
                sleep(delay).await;
                delay = std::cmp::min(delay.saturating_mul(2), max_delay);
            }
        }

        Err(RepoError::database(
            "connect",
            format!(
                "failed to connect to {} after {max_attempts} attempts: {last_err}",
                config.uri
            ),
        ))
    }

    async fn connect_once(config: &Neo4jConfig) -> Result<Graph, neo4rs::Error> {
        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .build()?;
        let graph = Graph::connect(neo4j_config).await?;
        graph.run(query("RETURN 1")).await?;
        Ok(graph)
    }

    /// Open a transaction for one repository operation.
    pub async fn begin<'c>(
        &self,
        ctx: &'c RequestContext,
        operation: &'static str,
        mode: AccessMode,
    ) -> Result<GraphTxn<'c>, RepoError> {
        let txn = ctx
            .guard(operation, async {
                self.inner
                    .start_txn()
                    .await
                    .map_err(|e| RepoError::database(operation, e))
            })
            .await?;
        Ok(GraphTxn::new(ctx, operation, mode, txn))
    }
}

impl std::ops::Deref for Neo4jGraph {
    type Target = Graph;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
