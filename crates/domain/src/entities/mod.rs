//! Domain entities - Core business objects with identity

mod package;
mod version;

pub use package::Package;
pub use version::Version;
