//! Common test helpers and the repository contract shared by every backend.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::repository_contract as contract;
//!
//! #[tokio::test]
//! async fn create_package_succeeds_exactly_once() {
//!     contract::create_package_succeeds_exactly_once(&DocumentRegistryRepo::default()).await;
//! }
//! ```

pub mod repository_contract;

use chrono::{DateTime, TimeZone, Utc};
use polvo_domain::{Package, PackageName, Version, VersionName};

/// Fixed instant used for every fixture timestamp.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
}

pub fn package_name(name: &str) -> PackageName {
    PackageName::new(name).unwrap()
}

pub fn version_name(name: &str) -> VersionName {
    VersionName::new(name).unwrap()
}

pub fn package(name: &str) -> Package {
    Package::new(package_name(name), "team-registry", fixed_now())
}

pub fn version(name: &str, manifest_url: &str) -> Version {
    Version::new(version_name(name), manifest_url, fixed_now())
}
