//! Polvo registry engine - Main entry point.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polvo_engine::infrastructure::{
    clock::SystemClock,
    config::{AppConfig, Backend},
    document::DocumentRegistryRepo,
    neo4j::{ensure_schema, Neo4jGraph, Neo4jRegistryRepo},
    ports::ClockPort,
};
use polvo_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polvo_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Polvo registry engine");

    let config = AppConfig::from_env()?;
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    let app = match (config.backend, &config.neo4j) {
        (Backend::Neo4j, Some(neo4j)) => {
            tracing::info!(uri = %neo4j.uri, database = %neo4j.database, "Connecting to Neo4j");
            let graph = Neo4jGraph::connect(neo4j).await?;

            // Ensure database schema (constraints and indexes)
            ensure_schema(&graph).await?;

            App::new(
                Arc::new(Neo4jRegistryRepo::new(graph)),
                clock,
                config.operation_timeout,
            )
        }
        (Backend::Neo4j, None) => anyhow::bail!("Neo4j backend selected without Neo4j settings"),
        (Backend::Document, _) => {
            tracing::warn!("Using in-memory document backend; data is lost on exit");
            App::new(
                Arc::new(DocumentRegistryRepo::default()),
                clock,
                config.operation_timeout,
            )
        }
    };

    let ctx = app.request_context();
    let packages = app.repositories.packages.list_packages(&ctx).await?;
    tracing::info!(
        backend = ?config.backend,
        packages = packages.len(),
        timeout_ms = app.operation_timeout().as_millis() as u64,
        "Registry ready"
    );

    let shutdown = app.shutdown_token();
    setup_shutdown_signal(shutdown.clone());
    shutdown.cancelled().await;

    tracing::info!("Registry engine stopped");
    Ok(())
}

/// Cancel `cancel_token` on Ctrl+C or SIGTERM.
fn setup_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }

        cancel_token.cancel();
    });
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
