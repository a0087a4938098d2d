//! Polvo registry engine library.
//!
//! ## Structure
//!
//! - `use_cases/` - Request handling: ORN resolution, field masks, DTOs
//! - `infrastructure/` - Ports, request context and the storage backends
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;

/// E2E tests using real Neo4j via testcontainers.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
