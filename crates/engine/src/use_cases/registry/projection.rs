//! Field-mask projection for partial updates.
//!
//! Turns an update request plus its mask into the canonical field set the
//! repository writes. Fields outside the mask never reach the repository,
//! whatever their value in the request payload.

use polvo_domain::{
    FieldKey, PackageField, PackageName, PackageUpdate, VersionField, VersionName, VersionUpdate,
};
use polvo_shared::{FieldMask, MessageShape, UpdatePackageRequest, UpdateVersionRequest};

use super::RegistryError;

/// Canonical fields of `sub_message` selected by `mask`.
///
/// The mask is normalized and validated against `shape` first; any invalid
/// path fails the whole projection. Naming the sub-message itself selects
/// all of its fields. Paths outside the sub-message are ignored.
fn selected_fields<F: FieldKey>(
    mask: &FieldMask,
    shape: &MessageShape,
    sub_message: &str,
) -> Result<Vec<F>, RegistryError> {
    let mask = mask.normalize();
    mask.validate(shape)?;

    let fields = match mask.selected_under(sub_message) {
        None => F::ALL.to_vec(),
        Some(names) => names
            .into_iter()
            .map(|name| {
                F::from_snake_case(name).ok_or_else(|| {
                    RegistryError::invalid_argument(format!("unknown {sub_message} field '{name}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    if fields.is_empty() {
        return Err(RegistryError::invalid_argument(format!(
            "field mask selects no {sub_message} fields"
        )));
    }
    Ok(fields)
}

pub fn project_package_update(
    request: &UpdatePackageRequest,
) -> Result<PackageUpdate, RegistryError> {
    let fields = selected_fields::<PackageField>(
        &request.field_mask,
        UpdatePackageRequest::shape(),
        UpdatePackageRequest::SUB_MESSAGE,
    )?;

    let data = &request.package;
    let mut update = PackageUpdate::new();
    for field in fields {
        update = match field {
            PackageField::Name => update.with_name(PackageName::new(data.name.as_str())?),
            PackageField::Maintainer => update.with_maintainer(data.maintainer.as_str()),
        };
    }
    Ok(update)
}

pub fn project_version_update(
    request: &UpdateVersionRequest,
) -> Result<VersionUpdate, RegistryError> {
    let fields = selected_fields::<VersionField>(
        &request.field_mask,
        UpdateVersionRequest::shape(),
        UpdateVersionRequest::SUB_MESSAGE,
    )?;

    let data = &request.version;
    let mut update = VersionUpdate::new();
    for field in fields {
        update = match field {
            VersionField::Name => update.with_name(VersionName::new(data.name.as_str())?),
            VersionField::ManifestUrl => update.with_manifest_url(data.manifest_url.as_str()),
            VersionField::Weight => update.with_weight(data.weight),
        };
    }
    Ok(update)
}
