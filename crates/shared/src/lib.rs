//! Polvo Shared - wire shapes for the registry
//!
//! This crate contains the types an outer transport exchanges with the engine:
//! - Request DTOs, addressed by ORN
//! - Response DTOs and the [`ErrorCode`] classification
//! - [`FieldMask`] and the static message shapes masks are validated against
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde, chrono, thiserror, and the domain crate
//! 2. **No business logic** - pure data types plus mask canonicalization

pub mod field_mask;
pub mod requests;
pub mod responses;

pub use field_mask::{FieldMask, FieldMaskError, FieldShape, MessageShape};
pub use requests::{
    CreatePackageRequest, CreateVersionRequest, DeletePackageRequest, DeleteVersionRequest,
    GetManifestUrlRequest, GetPackageRequest, GetVersionRequest, ListVersionsRequest,
    PackageData, UpdatePackageRequest, UpdateVersionRequest, VersionData,
};
pub use responses::{DeleteInfo, ErrorCode, ManifestUrlInfo, PackageInfo, VersionInfo};
