//! Version resolution shared by every upgrade command
//!
//! Turns a raw list of registry tags into a single "latest" version and
//! decides whether the locally recorded version must be bumped.

use semver::Version;

use crate::version::error::VersionError;
use crate::version::semver::{is_release_tag, parse_version};

/// Result of comparing the registry against the recorded version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeDecision {
    /// Version currently recorded in the build config
    pub current: Version,
    /// Highest eligible version published in the registry
    pub latest: Version,
    /// Whether `latest` is strictly greater than `current`
    pub needs_upgrade: bool,
}

/// Keep only plain release tags and parse them.
///
/// Tags with letters or without exactly three numeric components are skipped.
/// A tag that looks like a release but still fails to parse (e.g. a component
/// overflowing `u64`) is an error rather than being dropped.
pub fn filter_and_parse(tags: &[String]) -> Result<Vec<Version>, VersionError> {
    tags.iter()
        .filter(|tag| is_release_tag(tag))
        .map(|tag| parse_version(tag))
        .collect()
}

/// Select the highest version. Among equal maxima the last one wins.
pub fn highest(versions: &[Version]) -> Result<Version, VersionError> {
    versions
        .iter()
        .max()
        .cloned()
        .ok_or(VersionError::NoEligibleVersions)
}

/// Returns true iff `remote` is strictly greater than `local`.
pub fn needs_upgrade(remote: &Version, local: &Version) -> bool {
    remote > local
}

/// Resolve the latest registry version and compare it to `current_version`.
pub fn resolve_upgrade(
    tags: &[String],
    current_version: &str,
) -> Result<UpgradeDecision, VersionError> {
    let current = parse_version(current_version)?;
    let latest = highest(&filter_and_parse(tags)?)?;
    let needs_upgrade = needs_upgrade(&latest, &current);

    Ok(UpgradeDecision {
        current,
        latest,
        needs_upgrade,
    })
}

/// Split `<name>-<major>.<minor>.<patch>` into its name and version.
///
/// The name may contain hyphens; the version is always the last segment.
pub fn split_image_reference(reference: &str) -> Result<(&str, Version), VersionError> {
    let invalid = |reason: String| VersionError::InvalidImageReference {
        reference: reference.to_string(),
        reason,
    };

    let (name, version) = reference
        .rsplit_once('-')
        .ok_or_else(|| invalid("missing version suffix".to_string()))?;

    if name.is_empty() {
        return Err(invalid("missing image name".to_string()));
    }

    let version = parse_version(version).map_err(|e| invalid(e.to_string()))?;
    Ok((name, version))
}

/// Bump the patch component of an image reference.
///
/// Examples:
/// - "foo-1.2.3" -> "foo-1.2.4"
/// - "foo-bar-0.9.9" -> "foo-bar-0.9.10"
pub fn increment_patch(reference: &str) -> Result<String, VersionError> {
    let (name, mut version) = split_image_reference(reference)?;

    version.patch = version.patch.checked_add(1).ok_or_else(|| {
        VersionError::InvalidImageReference {
            reference: reference.to_string(),
            reason: "patch version overflow".to_string(),
        }
    })?;

    Ok(format!("{name}-{version}"))
}

/// Versions already pushed for `image_name`, taken from tags shaped like
/// `<image_name>-<major>.<minor>.<patch>`.
///
/// Tags of other images and tags containing a `v` are ignored.
pub fn pushed_image_versions(
    image_name: &str,
    tags: &[String],
) -> Result<Vec<Version>, VersionError> {
    tags.iter()
        .filter(|tag| !tag.contains('v'))
        .filter_map(|tag| {
            tag.strip_prefix(image_name)
                .and_then(|rest| rest.strip_prefix('-'))
        })
        .filter(|version| is_release_tag(version))
        .map(parse_version)
        .collect()
}
