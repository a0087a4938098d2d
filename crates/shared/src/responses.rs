//! Response shapes and error classification
//!
//! Responses carry the record's ORN so callers can address it again without
//! rebuilding paths themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polvo_domain::orn::{package_orn, version_orn};
use polvo_domain::{Package, PackageName, Version};

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub orn: String,
    pub name: String,
    pub maintainer: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Package> for PackageInfo {
    fn from(package: &Package) -> Self {
        Self {
            orn: package_orn(package.name.as_str()),
            name: package.name.to_string(),
            maintainer: package.maintainer.clone(),
            created_at: package.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub orn: String,
    pub name: String,
    pub manifest_url: String,
    pub weight: u32,
    pub created_at: DateTime<Utc>,
}

impl VersionInfo {
    /// Versions do not know their parent, so the package name is passed in.
    pub fn from_version(package: &PackageName, version: &Version) -> Self {
        Self {
            orn: version_orn(package.as_str(), version.name.as_str()),
            name: version.name.to_string(),
            manifest_url: version.manifest_url.clone(),
            weight: version.weight,
            created_at: version.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestUrlInfo {
    /// ORN of the version that was selected (never the `any` form).
    pub orn: String,
    pub manifest_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInfo {
    pub orn: String,
    /// False when the target was already absent.
    pub existed: bool,
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error classification codes
///
/// Every engine error maps onto exactly one code, so an outer transport can
/// pick its own status without matching on error variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Target absent
    NotFound,
    /// Conditional create found an existing record
    AlreadyExists,
    /// Malformed path, name, or field mask
    InvalidArgument,
    /// Store aborted the transaction (deadlock, transient failure)
    Aborted,
    /// Caller cancelled before commit
    Cancelled,
    /// Deadline passed before commit
    DeadlineExceeded,
    /// Backend does not support the operation
    Unimplemented,
    /// Store or transport failure
    Internal,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use polvo_domain::VersionName;

    #[test]
    fn version_info_carries_full_orn() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let package = PackageName::new("core").unwrap();
        let version = Version::new(VersionName::new("1.0.0").unwrap(), "https://cdn/m.json", now);
        let info = VersionInfo::from_version(&package, &version);
        assert_eq!(info.orn, "packages/core/versions/1.0.0");
        assert_eq!(info.weight, 0);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["manifestUrl"], "https://cdn/m.json");
    }

    #[test]
    fn package_info_from_domain() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let package = Package::new(PackageName::new("core").unwrap(), "team-a", now);
        let info = PackageInfo::from(&package);
        assert_eq!(info.orn, "packages/core");
        assert_eq!(info.maintainer, "team-a");
    }

    #[test]
    fn error_code_wire_form_is_snake_case() {
        let json = serde_json::to_string(&ErrorCode::AlreadyExists).unwrap();
        assert_eq!(json, "\"already_exists\"");
        let unknown: ErrorCode = serde_json::from_str("\"resource_exhausted\"").unwrap();
        assert_eq!(unknown, ErrorCode::Unknown);
    }
}
