//! Document-store backend for the registry.

mod registry_repo;
mod store;

pub use registry_repo::DocumentRegistryRepo;
pub use store::{Document, DocumentStore, Documents};
