//! Strictly typed version identifiers

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::version::error::VersionError;

/// Installed browser version, parsed strictly.
///
/// Accepts exactly the two forms the release indexes understand: the full
/// 4-component `major.minor.build.patch` form reported by the browser binary,
/// and a bare major-version digit string as used by the legacy index.
/// Anything else is a parse error, never a best-effort match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum BrowserVersion {
    Full {
        major: u32,
        minor: u32,
        build: u32,
        patch: u32,
    },
    Major(u32),
}

impl BrowserVersion {
    pub fn major(&self) -> u32 {
        match self {
            Self::Full { major, .. } => *major,
            Self::Major(major) => *major,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full { .. })
    }

    /// The `major.minor.build` prefix used by the per-build index document.
    /// `None` for a major-only version.
    pub fn build_prefix(&self) -> Option<String> {
        match self {
            Self::Full {
                major,
                minor,
                build,
                ..
            } => Some(format!("{major}.{minor}.{build}")),
            Self::Major(_) => None,
        }
    }
}

impl FromStr for BrowserVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let component = |part: &str| -> Result<u32, VersionError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::InvalidFormat(s.to_string()));
            }
            part.parse()
                .map_err(|_| VersionError::InvalidFormat(s.to_string()))
        };

        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [major] => Ok(Self::Major(component(major)?)),
            [major, minor, build, patch] => Ok(Self::Full {
                major: component(major)?,
                minor: component(minor)?,
                build: component(build)?,
                patch: component(patch)?,
            }),
            _ => Err(VersionError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for BrowserVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full {
                major,
                minor,
                build,
                patch,
            } => write!(f, "{major}.{minor}.{build}.{patch}"),
            Self::Major(major) => write!(f, "{major}"),
        }
    }
}

impl From<BrowserVersion> for String {
    fn from(version: BrowserVersion) -> Self {
        version.to_string()
    }
}

/// Driver version resolved from a release index.
///
/// Guaranteed non-empty: an empty index response must surface as an error
/// before one of these exists, so a malformed download URL cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverVersion(String);

impl DriverVersion {
    /// Returns `None` for an empty or whitespace-only string.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rule used to query the release index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Latest driver built against the exact browser build (Chrome 115+).
    FullVersion,
    /// Latest driver for the browser's major line (legacy index, Chrome <= 114).
    MajorVersion,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("124.0.6367.91", BrowserVersion::Full { major: 124, minor: 0, build: 6367, patch: 91 })]
    #[case("91", BrowserVersion::Major(91))]
    #[case("0.0.0.0", BrowserVersion::Full { major: 0, minor: 0, build: 0, patch: 0 })]
    fn browser_version_parses_recognized_forms(
        #[case] input: &str,
        #[case] expected: BrowserVersion,
    ) {
        assert_eq!(input.parse::<BrowserVersion>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("124.0.6367")] // 3 components is neither form
    #[case("124.0")]
    #[case("124.0.6367.91.2")]
    #[case("124.0.6367.x")]
    #[case("v124.0.6367.91")]
    #[case("124.")]
    #[case(".124")]
    #[case("one-two-four")]
    fn browser_version_rejects_unrecognized_forms(#[case] input: &str) {
        assert!(matches!(
            input.parse::<BrowserVersion>(),
            Err(VersionError::InvalidFormat(_))
        ));
    }

    #[rstest]
    #[case("124.0.6367.91", "124.0.6367.91")]
    #[case("91", "91")]
    fn browser_version_display_round_trips(#[case] input: &str, #[case] expected: &str) {
        let version: BrowserVersion = input.parse().unwrap();
        assert_eq!(version.to_string(), expected);
    }

    #[test]
    fn build_prefix_only_exists_for_full_versions() {
        let full: BrowserVersion = "124.0.6367.91".parse().unwrap();
        assert_eq!(full.build_prefix(), Some("124.0.6367".to_string()));

        let major: BrowserVersion = "91".parse().unwrap();
        assert_eq!(major.build_prefix(), None);
    }

    #[test]
    fn driver_version_rejects_empty_input() {
        assert_eq!(DriverVersion::new(""), None);
        assert_eq!(DriverVersion::new("  \n"), None);
    }

    #[test]
    fn driver_version_trims_surrounding_whitespace() {
        let version = DriverVersion::new("124.0.6367.91\n").unwrap();
        assert_eq!(version.as_str(), "124.0.6367.91");
    }
}
