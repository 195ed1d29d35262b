//! Semantic version classification and increments.

use semver::Version;

use crate::error::{ReleaseError, Result};
use crate::types::{NextVersions, SemanticVersion};

/// Parse a version, tolerating a leading `v` or `=` the way release tags are written.
pub fn parse_version(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed
        .strip_prefix('=')
        .unwrap_or(trimmed)
        .trim_start();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Classify a version by the first non-zero component, checking patch, then
/// minor, then major. `0.0.0` and unparseable input are `Invalid`.
pub fn classify_version(version: &str) -> SemanticVersion {
    let Some(parsed) = parse_version(version) else {
        return SemanticVersion::Invalid;
    };

    if parsed.patch != 0 {
        SemanticVersion::Patch
    } else if parsed.minor != 0 {
        SemanticVersion::Minor
    } else if parsed.major != 0 {
        SemanticVersion::Major
    } else {
        SemanticVersion::Invalid
    }
}

/// The next patch, minor and major versions after `latest`, prefixed with `v`.
pub fn next_versions(latest: &str) -> Result<NextVersions> {
    let current =
        parse_version(latest).ok_or_else(|| ReleaseError::InvalidVersion(latest.to_string()))?;

    Ok(NextVersions {
        patch: format!("v{}", increment(&current, SemanticVersion::Patch)),
        minor: format!("v{}", increment(&current, SemanticVersion::Minor)),
        major: format!("v{}", increment(&current, SemanticVersion::Major)),
    })
}

fn increment(current: &Version, bump: SemanticVersion) -> Version {
    let pre_release = !current.pre.is_empty();
    let mut next = Version::new(current.major, current.minor, current.patch);

    match bump {
        // A pre-release of x.y.z is released as x.y.z itself.
        SemanticVersion::Patch => {
            if !pre_release {
                next.patch += 1;
            }
        }
        SemanticVersion::Minor => {
            if !pre_release || current.patch != 0 {
                next.minor += 1;
            }
            next.patch = 0;
        }
        SemanticVersion::Major => {
            if !pre_release || current.minor != 0 || current.patch != 0 {
                next.major += 1;
            }
            next.minor = 0;
            next.patch = 0;
        }
        SemanticVersion::Invalid => {}
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_checks_patch_first() {
        assert_eq!(classify_version("v1.2.3"), SemanticVersion::Patch);
        assert_eq!(classify_version("1.2.0"), SemanticVersion::Minor);
        assert_eq!(classify_version("v1.0.1"), SemanticVersion::Patch);
        assert_eq!(classify_version("0.3.0"), SemanticVersion::Minor);
    }

    #[test]
    fn test_classify_major() {
        assert_eq!(classify_version("2.0.0"), SemanticVersion::Major);
        assert_eq!(classify_version("v10.0.0"), SemanticVersion::Major);
    }

    #[test]
    fn test_classify_invalid() {
        assert_eq!(classify_version("0.0.0"), SemanticVersion::Invalid);
        assert_eq!(classify_version("release"), SemanticVersion::Invalid);
        assert_eq!(classify_version("1.2"), SemanticVersion::Invalid);
        assert_eq!(classify_version(""), SemanticVersion::Invalid);
    }

    #[test]
    fn test_parse_version_prefixes() {
        assert_eq!(parse_version(" v1.2.3 "), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("=1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("vv1.2.3"), None);
    }

    #[test]
    fn test_next_versions() {
        let next = next_versions("v1.4.2").unwrap();
        assert_eq!(next.patch, "v1.4.3");
        assert_eq!(next.minor, "v1.5.0");
        assert_eq!(next.major, "v2.0.0");
    }

    #[test]
    fn test_next_versions_from_pre_release() {
        let next = next_versions("1.5.0-beta.1").unwrap();
        assert_eq!(next.patch, "v1.5.0");
        assert_eq!(next.minor, "v1.5.0");
        assert_eq!(next.major, "v2.0.0");

        let next = next_versions("2.0.0-rc.1").unwrap();
        assert_eq!(next.major, "v2.0.0");
    }

    #[test]
    fn test_next_versions_invalid() {
        assert!(matches!(
            next_versions("latest"),
            Err(ReleaseError::InvalidVersion(_))
        ));
    }
}
