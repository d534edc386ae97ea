use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::version::error::VersionError;

/// Plain `MAJOR.MINOR.PATCH` release tag. Anything carrying letters
/// (`v1.21.0`, `1.21.0-alpine`, `1.21rc1`) is rejected.
static RELEASE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("valid release tag regex"));

/// Check whether a registry tag is eligible for version comparison.
///
/// Examples:
/// - "1.21.0" -> true
/// - "1.21.0-alpine" -> false
/// - "v1.21.0" -> false
/// - "1.21" -> false
pub fn is_release_tag(tag: &str) -> bool {
    RELEASE_TAG.is_match(tag)
}

/// Parse a strict three-part numeric version.
///
/// Unlike `semver::Version::parse`, leading zeros are accepted ("2023.09.1"
/// parses as 2023.9.1) and pre-release or build metadata is rejected.
pub fn parse_version(version: &str) -> Result<Version, VersionError> {
    if !is_release_tag(version) {
        return Err(VersionError::Parse {
            version: version.to_string(),
            reason: "expected MAJOR.MINOR.PATCH with numeric components".to_string(),
        });
    }

    let components = version
        .split('.')
        .map(|part| {
            part.parse::<u64>().map_err(|e| VersionError::Parse {
                version: version.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<u64>, VersionError>>()?;

    // The regex guarantees exactly three components.
    Ok(Version::new(components[0], components[1], components[2]))
}
