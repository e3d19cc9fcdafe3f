use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ReleaseError, Result};

/// The kind of release being cut.
///
/// The three standard kinds bump a numeric component. Anything else is treated
/// as a pre-release tag name and published under a dist-tag of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReleaseKind {
    Major,
    Minor,
    #[default]
    Patch,
    PreRelease(String),
}

impl ReleaseKind {
    pub fn as_str(&self) -> &str {
        match self {
            ReleaseKind::Major => "major",
            ReleaseKind::Minor => "minor",
            ReleaseKind::Patch => "patch",
            ReleaseKind::PreRelease(tag) => tag,
        }
    }

    /// Registry dist-tag for this kind, `None` for the standard kinds.
    pub fn dist_tag(&self) -> Option<&str> {
        match self {
            ReleaseKind::PreRelease(tag) => Some(tag),
            _ => None,
        }
    }
}

impl FromStr for ReleaseKind {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "" => Err(ReleaseError::config("release type must not be empty")),
            "major" => Ok(ReleaseKind::Major),
            "minor" => Ok(ReleaseKind::Minor),
            "patch" => Ok(ReleaseKind::Patch),
            tag if tag.contains(|c: char| !(c.is_ascii_alphanumeric() || c == '-')) => Err(
                ReleaseError::config(format!("invalid pre-release tag name '{}'", tag)),
            ),
            tag => Ok(ReleaseKind::PreRelease(tag.to_string())),
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)((?:-[0-9A-Za-z-]+\.\d+)+)?$")
            .expect("version pattern is valid")
    })
}

/// One `-<tag>.<counter>` group of a pre-release suffix.
fn prerelease_group() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"-([0-9A-Za-z-]+)\.(\d+)").expect("pre-release group pattern is valid")
    })
}

/// Computes the next version string.
///
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
/// - **PreRelease(tag)**: bumps the counter of the last `-tag.<n>` group when
///   `current` carries one, otherwise appends `-tag.0` to `current` untouched.
///
/// Standard bumps drop any pre-release segment. A tag that differs from the
/// ones already present stacks onto them (`1.0.0-alpha.0` + `beta` gives
/// `1.0.0-alpha.0-beta.0`), and bumping `alpha` again only moves alpha's
/// counter (`1.0.0-alpha.1-beta.0`).
///
/// # Errors
/// `InvalidVersionFormat` unless `current` is `N.N.N` followed by zero or more
/// `-<tag>.<n>` groups, or when a component would overflow.
///
/// # Example
/// ```ignore
/// assert_eq!(bump("1.2.3", &ReleaseKind::Minor)?, "1.3.0");
/// assert_eq!(bump("1.2.3-alpha.0", &"alpha".parse()?)?, "1.2.3-alpha.1");
/// ```
pub fn bump(current: &str, kind: &ReleaseKind) -> Result<String> {
    let trimmed = current.trim();
    let caps = version_pattern()
        .captures(trimmed)
        .ok_or_else(|| ReleaseError::version(current))?;

    let component = |i: usize| -> Result<u64> {
        caps[i]
            .parse::<u64>()
            .map_err(|_| ReleaseError::version(current))
    };
    let (major, minor, patch) = (component(1)?, component(2)?, component(3)?);
    let incremented = |n: u64| n.checked_add(1).ok_or_else(|| ReleaseError::version(current));

    let next = match kind {
        ReleaseKind::Major => semver::Version::new(incremented(major)?, 0, 0).to_string(),
        ReleaseKind::Minor => semver::Version::new(major, incremented(minor)?, 0).to_string(),
        ReleaseKind::Patch => semver::Version::new(major, minor, incremented(patch)?).to_string(),
        ReleaseKind::PreRelease(tag) => {
            let suffix_start = caps.get(4).map_or(trimmed.len(), |m| m.start());
            bump_prerelease(trimmed, suffix_start, tag)?
        }
    };

    Ok(next)
}

fn bump_prerelease(current: &str, suffix_start: usize, tag: &str) -> Result<String> {
    let suffix = &current[suffix_start..];
    let matching = prerelease_group()
        .captures_iter(suffix)
        .filter(|caps| &caps[1] == tag)
        .last();

    let Some(counter) = matching.and_then(|caps| caps.get(2)) else {
        return Ok(format!("{}-{}.0", current, tag));
    };

    let next = counter
        .as_str()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| ReleaseError::version(current))?;

    let (start, end) = (suffix_start + counter.start(), suffix_start + counter.end());
    Ok(format!("{}{}{}", &current[..start], next, &current[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(s: &str) -> ReleaseKind {
        s.parse().unwrap()
    }

    #[test]
    fn test_standard_bumps() {
        assert_eq!(bump("1.2.3", &ReleaseKind::Patch).unwrap(), "1.2.4");
        assert_eq!(bump("1.2.3", &ReleaseKind::Minor).unwrap(), "1.3.0");
        assert_eq!(bump("1.2.3", &ReleaseKind::Major).unwrap(), "2.0.0");
    }

    #[test]
    fn test_standard_bumps_over_many_triples() {
        for major in 0..4u64 {
            for minor in [0u64, 1, 9, 10] {
                for patch in [0u64, 7, 99] {
                    let v = format!("{}.{}.{}", major, minor, patch);
                    assert_eq!(
                        bump(&v, &ReleaseKind::Patch).unwrap(),
                        format!("{}.{}.{}", major, minor, patch + 1)
                    );
                    assert_eq!(
                        bump(&v, &ReleaseKind::Minor).unwrap(),
                        format!("{}.{}.0", major, minor + 1)
                    );
                    assert_eq!(
                        bump(&v, &ReleaseKind::Major).unwrap(),
                        format!("{}.0.0", major + 1)
                    );
                }
            }
        }
    }

    #[test]
    fn test_prerelease_increments_matching_tag() {
        assert_eq!(bump("1.2.3-alpha.0", &kind("alpha")).unwrap(), "1.2.3-alpha.1");
        assert_eq!(bump("1.2.3-beta.9", &kind("beta")).unwrap(), "1.2.3-beta.10");
    }

    #[test]
    fn test_prerelease_appends_new_tag() {
        assert_eq!(bump("1.2.3", &kind("alpha")).unwrap(), "1.2.3-alpha.0");
    }

    #[test]
    fn test_different_tag_stacks() {
        assert_eq!(
            bump("1.0.0-alpha.0", &kind("beta")).unwrap(),
            "1.0.0-alpha.0-beta.0"
        );
    }

    #[test]
    fn test_standard_bump_drops_prerelease() {
        assert_eq!(bump("1.2.3-alpha.4", &ReleaseKind::Patch).unwrap(), "1.2.4");
    }

    #[test]
    fn test_invalid_versions() {
        for raw in [
            "",
            "1.2",
            "1.2.3.4",
            "v1.2.3",
            "a.b.c",
            "1.2.-3",
            "1.2.3-",
            "1.2.3-alpha",
            "1.2.3-alpha.beta",
            "1.2.3-1",
            "1.2.3-alpha.0-beta",
        ] {
            let err = bump(raw, &ReleaseKind::Patch).unwrap_err();
            assert!(
                matches!(err, ReleaseError::InvalidVersionFormat(_)),
                "expected InvalidVersionFormat for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_prerelease_suffix_rejected_for_any_kind() {
        assert!(matches!(
            bump("1.2.3-alpha", &kind("alpha")),
            Err(ReleaseError::InvalidVersionFormat(_))
        ));
    }

    #[test]
    fn test_stacked_tags_bump_their_own_counter() {
        assert_eq!(
            bump("1.0.0-alpha.0-beta.0", &kind("alpha")).unwrap(),
            "1.0.0-alpha.1-beta.0"
        );
        assert_eq!(
            bump("1.0.0-alpha.0-beta.0", &kind("beta")).unwrap(),
            "1.0.0-alpha.0-beta.1"
        );
        assert_eq!(
            bump("1.0.0-alpha.0-beta.0", &ReleaseKind::Minor).unwrap(),
            "1.1.0"
        );
    }

    #[test]
    fn test_tag_is_matched_whole() {
        assert_eq!(
            bump("1.0.0-pre-beta.3", &kind("beta")).unwrap(),
            "1.0.0-pre-beta.3-beta.0"
        );
    }

    #[test]
    fn test_overflow_is_invalid() {
        let max = u64::MAX;
        for (raw, release) in [
            (format!("{}.0.0", max), ReleaseKind::Major),
            (format!("1.{}.0", max), ReleaseKind::Minor),
            (format!("1.2.{}", max), ReleaseKind::Patch),
            (format!("1.2.3-rc.{}", max), kind("rc")),
        ] {
            assert!(
                matches!(bump(&raw, &release), Err(ReleaseError::InvalidVersionFormat(_))),
                "expected InvalidVersionFormat for {}",
                raw
            );
        }
        assert_eq!(
            bump(&format!("{}.0.0", max), &ReleaseKind::Patch).unwrap(),
            format!("{}.0.1", max)
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(kind("major"), ReleaseKind::Major);
        assert_eq!(kind(" patch "), ReleaseKind::Patch);
        assert_eq!(kind("rc"), ReleaseKind::PreRelease("rc".to_string()));
        assert!("".parse::<ReleaseKind>().is_err());
        assert!("bad tag".parse::<ReleaseKind>().is_err());
        assert!("a.b".parse::<ReleaseKind>().is_err());
    }

    #[test]
    fn test_dist_tag() {
        assert_eq!(ReleaseKind::Minor.dist_tag(), None);
        assert_eq!(kind("next").dist_tag(), Some("next"));
    }
}
