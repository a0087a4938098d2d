//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod context;
pub mod document;
pub mod neo4j;
pub mod ports;
