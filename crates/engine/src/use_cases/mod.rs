//! Use cases - request orchestration on top of the repository ports.

pub mod registry;

pub use registry::{PackageCrud, RegistryError, RegistryUseCases, VersionCrud};
