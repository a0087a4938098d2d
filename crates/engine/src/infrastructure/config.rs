//! Application configuration loaded from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which store backs the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Neo4j,
    /// In-memory document store. Contents do not survive a restart.
    Document,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neo4j" => Ok(Self::Neo4j),
            "document" => Ok(Self::Document),
            other => bail!("unknown registry backend '{other}' (expected 'neo4j' or 'document')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub connect_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: Backend,
    /// Present only for the Neo4j backend.
    pub neo4j: Option<Neo4jConfig>,
    /// Deadline applied to request contexts created by the app.
    pub operation_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let backend: Backend = var("REGISTRY_BACKEND", "neo4j")
            .parse()
            .context("REGISTRY_BACKEND is invalid")?;

        let neo4j = match backend {
            Backend::Neo4j => Some(Neo4jConfig {
                uri: var("NEO4J_URI", "bolt://localhost:7687"),
                user: var("NEO4J_USER", "neo4j"),
                password: lookup("NEO4J_PASSWORD")
                    .context("NEO4J_PASSWORD environment variable is required")?,
                database: var("NEO4J_DATABASE", "neo4j"),
                connect_attempts: var("NEO4J_CONNECT_ATTEMPTS", "10")
                    .parse()
                    .context("NEO4J_CONNECT_ATTEMPTS must be a positive integer")?,
            }),
            Backend::Document => None,
        };

        let timeout_ms: u64 = var("OPERATION_TIMEOUT_MS", "10000")
            .parse()
            .context("OPERATION_TIMEOUT_MS must be a number of milliseconds")?;

        Ok(Self {
            backend,
            neo4j,
            operation_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
