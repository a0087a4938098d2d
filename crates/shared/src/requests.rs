//! Request shapes for the registry operations
//!
//! Every request addresses its target by ORN. Update requests carry the full
//! sub-message plus a [`FieldMask`] naming the fields to persist; each update
//! request exposes a static [`MessageShape`] the mask is validated against.

use serde::{Deserialize, Serialize};

use crate::field_mask::{FieldMask, FieldShape, MessageShape};

// =============================================================================
// Payloads
// =============================================================================

/// Package fields as sent by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub maintainer: String,
}

/// Version fields as sent by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub manifest_url: String,
    #[serde(default)]
    pub weight: u32,
}

pub static PACKAGE_DATA_SHAPE: MessageShape = MessageShape {
    name: "Package",
    fields: &[FieldShape::scalar("name"), FieldShape::scalar("maintainer")],
};

pub static VERSION_DATA_SHAPE: MessageShape = MessageShape {
    name: "Version",
    fields: &[
        FieldShape::scalar("name"),
        FieldShape::scalar("manifest_url"),
        FieldShape::scalar("weight"),
    ],
};

// =============================================================================
// Package requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    pub package: PackageData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPackageRequest {
    pub orn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageRequest {
    pub orn: String,
    pub package: PackageData,
    #[serde(default)]
    pub field_mask: FieldMask,
}

impl UpdatePackageRequest {
    pub const SUB_MESSAGE: &'static str = "package";

    pub fn shape() -> &'static MessageShape {
        static SHAPE: MessageShape = MessageShape {
            name: "UpdatePackageRequest",
            fields: &[
                FieldShape::scalar("orn"),
                FieldShape::message("package", &PACKAGE_DATA_SHAPE),
                FieldShape::scalar("field_mask"),
            ],
        };
        &SHAPE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePackageRequest {
    pub orn: String,
}

// =============================================================================
// Version requests
// =============================================================================

/// `orn` may use `any` as the version segment to select the heaviest version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVersionRequest {
    pub orn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetManifestUrlRequest {
    pub orn: String,
}

/// `orn` addresses the parent package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsRequest {
    pub orn: String,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub order_by_weight: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionRequest {
    pub package_orn: String,
    pub version: VersionData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVersionRequest {
    pub orn: String,
    pub version: VersionData,
    #[serde(default)]
    pub field_mask: FieldMask,
}

impl UpdateVersionRequest {
    pub const SUB_MESSAGE: &'static str = "version";

    pub fn shape() -> &'static MessageShape {
        static SHAPE: MessageShape = MessageShape {
            name: "UpdateVersionRequest",
            fields: &[
                FieldShape::scalar("orn"),
                FieldShape::message("version", &VERSION_DATA_SHAPE),
                FieldShape::scalar("field_mask"),
            ],
        };
        &SHAPE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVersionRequest {
    pub orn: String,
}
