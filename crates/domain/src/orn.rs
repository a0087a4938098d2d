//! Resource path (ORN) resolution.
//!
//! Registry resources are addressed by hierarchical paths such as
//! `orn:polvo/projects/acme/packages/core/versions/1.0.0`. Resolution is a
//! pure string operation: absence of a match is the failure signal, never an
//! error.

use std::sync::LazyLock;

use regex_lite::Regex;

static PACKAGE_ORN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)packages/([^/]+)(?:/|$)").expect("valid regex")
});

static VERSION_ORN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)packages/([^/]+)/versions/([^/]+)/?$").expect("valid regex")
});

/// Extract the package segment from `.../packages/<name>(/...)?`.
///
/// # Examples
///
/// ```
/// use polvo_domain::orn::resolve_package_name;
///
/// assert_eq!(resolve_package_name("orn:polvo/packages/core"), Some("core"));
/// assert_eq!(resolve_package_name("packages/core/versions/1.0.0"), Some("core"));
/// assert_eq!(resolve_package_name("projects/acme"), None);
/// ```
pub fn resolve_package_name(orn: &str) -> Option<&str> {
    PACKAGE_ORN_RE
        .captures(orn)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract `(package, version)` from `.../packages/<name>/versions/<name>`.
///
/// Both segments are returned together or not at all.
///
/// # Examples
///
/// ```
/// use polvo_domain::orn::resolve_version_path;
///
/// assert_eq!(
///     resolve_version_path("orn:polvo/packages/core/versions/1.0.0"),
///     Some(("core", "1.0.0"))
/// );
/// assert_eq!(resolve_version_path("packages/core"), None);
/// ```
pub fn resolve_version_path(orn: &str) -> Option<(&str, &str)> {
    let caps = VERSION_ORN_RE.captures(orn)?;
    match (caps.get(1), caps.get(2)) {
        (Some(package), Some(version)) => Some((package.as_str(), version.as_str())),
        _ => None,
    }
}

/// Canonical ORN of a package.
pub fn package_orn(package: &str) -> String {
    format!("packages/{package}")
}

/// Canonical ORN of a version.
pub fn version_orn(package: &str, version: &str) -> String {
    format!("packages/{package}/versions/{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_name_from_nested_paths() {
        assert_eq!(
            resolve_package_name("orn:polvo/projects/acme/packages/core"),
            Some("core")
        );
        assert_eq!(resolve_package_name("packages/core/"), Some("core"));
        assert_eq!(
            resolve_package_name("projects/acme/packages/core/versions/any"),
            Some("core")
        );
    }

    #[test]
    fn package_segment_must_be_a_whole_segment() {
        assert_eq!(resolve_package_name("mypackages/core"), None);
        assert_eq!(resolve_package_name("packages/"), None);
        assert_eq!(resolve_package_name(""), None);
    }

    #[test]
    fn version_path_requires_both_segments() {
        assert_eq!(
            resolve_version_path("projects/acme/packages/core/versions/2.0.0"),
            Some(("core", "2.0.0"))
        );
        assert_eq!(
            resolve_version_path("packages/core/versions/any/"),
            Some(("core", "any"))
        );
        assert_eq!(resolve_version_path("packages/core/versions/"), None);
        assert_eq!(resolve_version_path("packages/core/versions"), None);
        assert_eq!(resolve_version_path("versions/1.0.0"), None);
    }

    #[test]
    fn version_path_rejects_trailing_segments() {
        assert_eq!(
            resolve_version_path("packages/core/versions/1.0.0/manifest"),
            None
        );
    }

    #[test]
    fn formatted_orns_resolve_back() {
        let orn = version_orn("core", "1.0.0");
        assert_eq!(resolve_version_path(&orn), Some(("core", "1.0.0")));
        assert_eq!(resolve_package_name(&package_orn("core")), Some("core"));
    }
}
