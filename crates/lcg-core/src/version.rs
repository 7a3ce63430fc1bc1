//! Release versions and next-version resolution.
//!
//! A release version is a plain `major.minor.patch` semantic version. It is
//! embedded verbatim in folder names, changelog file names and changeset ids,
//! so pre-release and build metadata are rejected at parse time.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version assigned to the first release when none is requested explicitly.
pub const FIRST_RELEASE: ReleaseVersion = ReleaseVersion(semver::Version::new(0, 0, 1));

/// A `major.minor.patch` release version, ordered by semver precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseVersion(semver::Version);

impl ReleaseVersion {
    /// Create a version from its three components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse a version string, rejecting pre-release and build metadata.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let version =
            semver::Version::parse(input.trim()).map_err(|e| CoreError::InvalidVersion {
                version: input.to_string(),
                reason: e.to_string(),
            })?;
        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(CoreError::InvalidVersion {
                version: input.to_string(),
                reason: "pre-release and build metadata are not allowed".to_string(),
            });
        }
        Ok(Self(version))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)
    }
}

impl FromStr for ReleaseVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReleaseVersion {
    type Error = CoreError;

    fn try_from(s: String) -> CoreResult<Self> {
        Self::parse(&s)
    }
}

impl From<ReleaseVersion> for String {
    fn from(version: ReleaseVersion) -> Self {
        version.to_string()
    }
}

/// Which version component a release bumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    /// Breaking release: `major + 1`, minor and patch reset
    Major,
    /// Feature release: `minor + 1`, patch reset
    Minor,
    /// Fix release: `patch + 1`
    Patch,
}

impl VersionBump {
    /// Apply the bump to a version. Fails with `InvalidVersion` when the
    /// bumped component is already at `u64::MAX`.
    pub fn apply(&self, version: &ReleaseVersion) -> CoreResult<ReleaseVersion> {
        let overflow = || CoreError::InvalidVersion {
            version: version.to_string(),
            reason: format!("{self} component cannot be incremented"),
        };
        let bumped = match self {
            VersionBump::Major => {
                ReleaseVersion::new(version.major().checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => ReleaseVersion::new(
                version.major(),
                version.minor().checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            VersionBump::Patch => ReleaseVersion::new(
                version.major(),
                version.minor(),
                version.patch().checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(bumped)
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

/// What the caller asked for when starting a new release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Explicit version to release
    pub version: Option<ReleaseVersion>,
    /// Bump the major version
    pub major: bool,
    /// Bump the minor version
    pub minor: bool,
    /// Bump the patch version
    pub patch: bool,
}

impl ReleaseRequest {
    /// Returns `true` when no explicit version and no bump flag was given.
    pub fn is_unspecified(&self) -> bool {
        self.version.is_none() && !self.major && !self.minor && !self.patch
    }

    /// The bump these flags select. Major wins over minor, minor over patch,
    /// and an unspecified request falls back to a patch bump.
    pub fn bump(&self) -> VersionBump {
        if self.major {
            VersionBump::Major
        } else if self.minor {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }
}

/// Decide the version of the next release.
///
/// Without a prior release the explicit version (or [`FIRST_RELEASE`]) is
/// used as is. Otherwise an explicit version must be strictly greater than
/// `latest`, and bump flags are applied to `latest`.
pub fn resolve_version(
    request: &ReleaseRequest,
    latest: Option<&ReleaseVersion>,
) -> CoreResult<ReleaseVersion> {
    let Some(latest) = latest else {
        return Ok(request.version.clone().unwrap_or(FIRST_RELEASE));
    };

    if let Some(requested) = &request.version {
        if requested <= latest {
            return Err(CoreError::VersionConflict {
                requested: requested.to_string(),
                latest: latest.to_string(),
            });
        }
        return Ok(requested.clone());
    }

    if request.is_unspecified() {
        log::info!("No release inputs given, pinning as patch release");
    }
    request.bump().apply(latest)
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
