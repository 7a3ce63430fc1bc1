//! Master and release changelog manifests.
//!
//! Both manifests are append-only: every mutation returns a new manifest with
//! entries added at the end, and the input is left untouched. The last entry
//! of each is the "current" one.

use crate::changeset::ChangeSet;
use crate::error::{CoreError, CoreResult};
use crate::paths::PathLayout;
use crate::sequence::{parse_sequence, MAX_SEQUENCE};
use crate::version::ReleaseVersion;
use serde::{Deserialize, Serialize};

/// Reference from the master changelog to one release changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRef {
    /// Path of the release changelog, relative to the master changelog
    pub path: String,
}

impl ReleaseRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Version encoded in the folder that holds the release changelog
    pub fn version(&self) -> CoreResult<ReleaseVersion> {
        let mut segments = self.path.rsplit('/').filter(|s| !s.is_empty());
        let _file = segments.next();
        let folder = segments.next().ok_or_else(|| CoreError::MalformedId {
            id: self.path.clone(),
            reason: "expected <migrations>/<version>/<version>-changelog.yml".to_string(),
        })?;
        ReleaseVersion::parse(folder).map_err(|_| CoreError::MalformedId {
            id: self.path.clone(),
            reason: format!("folder '{folder}' is not a release version"),
        })
    }
}

/// The top-level changelog listing every release in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MasterFile", into = "MasterFile")]
pub struct MasterManifest {
    releases: Vec<ReleaseRef>,
}

impl MasterManifest {
    /// Create an empty master manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases in chronological order
    pub fn releases(&self) -> &[ReleaseRef] {
        &self.releases
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn release_count(&self) -> usize {
        self.releases.len()
    }

    /// Version of the last release
    pub fn latest_version(&self) -> CoreResult<ReleaseVersion> {
        self.releases
            .last()
            .ok_or(CoreError::EmptyManifest)?
            .version()
    }

    /// Append a reference to the release changelog for `version`.
    ///
    /// `folder_exists` is the caller's filesystem check for the release
    /// folder. Returns the updated manifest and the on-disk path of the new
    /// release changelog.
    pub fn register_release(
        &self,
        layout: &PathLayout,
        version: &ReleaseVersion,
        folder_exists: bool,
    ) -> CoreResult<(MasterManifest, String)> {
        if folder_exists {
            return Err(CoreError::DuplicateRelease {
                path: layout.release_dir(version),
            });
        }

        if !self.is_empty() {
            let latest = self.latest_version()?;
            if *version <= latest {
                return Err(CoreError::VersionConflict {
                    requested: version.to_string(),
                    latest: latest.to_string(),
                });
            }
        }

        let mut updated = self.clone();
        updated
            .releases
            .push(ReleaseRef::new(layout.relative().release_manifest(version)));
        Ok((updated, layout.release_manifest(version)))
    }
}

/// The per-release changelog listing that release's changesets in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReleaseFile", into = "ReleaseFile")]
pub struct ReleaseManifest {
    change_sets: Vec<ChangeSet>,
}

impl ReleaseManifest {
    /// Create a release manifest holding `change_sets`
    pub fn new(change_sets: Vec<ChangeSet>) -> Self {
        Self { change_sets }
    }

    /// Changesets in creation order
    pub fn change_sets(&self) -> &[ChangeSet] {
        &self.change_sets
    }

    pub fn is_empty(&self) -> bool {
        self.change_sets.is_empty()
    }

    /// The most recently created changeset
    pub fn latest_change_set(&self) -> CoreResult<&ChangeSet> {
        self.change_sets.last().ok_or(CoreError::EmptyRelease)
    }

    /// Sequence number for the next changeset in this release
    pub fn next_sequence(&self) -> CoreResult<u32> {
        let latest = self.latest_change_set()?;
        let sequence = parse_sequence(&latest.id)?;
        sequence
            .checked_add(1)
            .ok_or(CoreError::SequenceOverflow {
                sequence,
                max: MAX_SEQUENCE,
            })
    }

    /// Return a copy with `change_sets` appended
    pub fn append(&self, change_sets: impl IntoIterator<Item = ChangeSet>) -> ReleaseManifest {
        let mut updated = self.clone();
        updated.change_sets.extend(change_sets);
        updated
    }
}

// On-disk shapes. Both files are a single `databaseChangeLog` list whose items
// are one-key maps (`include:` for the master, `changeSet:` for a release).
// Unknown keys are rejected since both files are rewritten in full.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MasterFile {
    #[serde(default)]
    database_change_log: Vec<IncludeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct IncludeEntry {
    include: IncludeFile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct IncludeFile {
    file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ReleaseFile {
    #[serde(default)]
    database_change_log: Vec<ChangeSetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ChangeSetEntry {
    change_set: ChangeSet,
}

impl From<MasterFile> for MasterManifest {
    fn from(file: MasterFile) -> Self {
        Self {
            releases: file
                .database_change_log
                .into_iter()
                .map(|entry| ReleaseRef::new(entry.include.file))
                .collect(),
        }
    }
}

impl From<MasterManifest> for MasterFile {
    fn from(manifest: MasterManifest) -> Self {
        Self {
            database_change_log: manifest
                .releases
                .into_iter()
                .map(|r| IncludeEntry {
                    include: IncludeFile { file: r.path },
                })
                .collect(),
        }
    }
}

impl From<ReleaseFile> for ReleaseManifest {
    fn from(file: ReleaseFile) -> Self {
        Self::new(
            file.database_change_log
                .into_iter()
                .map(|entry| entry.change_set)
                .collect(),
        )
    }
}

impl From<ReleaseManifest> for ReleaseFile {
    fn from(manifest: ReleaseManifest) -> Self {
        Self {
            database_change_log: manifest
                .change_sets
                .into_iter()
                .map(|change_set| ChangeSetEntry { change_set })
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
