//! Backend E2E tests.
//!
//! These tests drive the registry use cases through a complete [`App`]
//! backed by a real Neo4j database (via testcontainers).
//!
//! # Running E2E Tests
//!
//! ```bash
//! # Run all E2E tests (requires Docker)
//! cargo test -p polvo-engine --lib e2e_tests -- --ignored --test-threads=1
//!
//! # Run the Neo4j repository contract only
//! cargo test -p polvo-engine --lib neo4j::integration_tests -- --ignored
//! ```
//!
//! [`App`]: crate::App

mod neo4j_test_harness;

pub use neo4j_test_harness::*;
