//! Deterministic path layout for release changelogs and changeset SQL files.
//!
//! Every path is a pure function of the layout, version, sequence number,
//! name and kind. The same layout with an empty root produces the paths that
//! are written into manifests, relative to the master changelog's directory.

use crate::error::{CoreError, CoreResult};
use crate::sequence::pad_sequence;
use crate::version::ReleaseVersion;
use std::fmt;

/// Folder under a release holding rollback scripts
pub const ROLLBACKS_DIR: &str = "rollbacks";

/// Folder under a release holding testdata scripts
pub const TESTDATA_DIR: &str = "testdata";

/// Which artifact of a release a path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// `<version>-changelog.yml`
    ReleaseManifest,
    /// Forward migration script
    Migration,
    /// Rollback script for a migration
    Rollback,
    /// Testdata seed script
    TestdataMigration,
    /// Rollback script for testdata
    TestdataRollback,
}

impl PathKind {
    /// Subdirectories between the release folder and the file
    fn subdirs(&self) -> &'static [&'static str] {
        match self {
            PathKind::ReleaseManifest | PathKind::Migration => &[],
            PathKind::Rollback => &[ROLLBACKS_DIR],
            PathKind::TestdataMigration => &[TESTDATA_DIR],
            PathKind::TestdataRollback => &[TESTDATA_DIR, ROLLBACKS_DIR],
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::ReleaseManifest => write!(f, "release changelog"),
            PathKind::Migration => write!(f, "migration"),
            PathKind::Rollback => write!(f, "rollback"),
            PathKind::TestdataMigration => write!(f, "testdata migration"),
            PathKind::TestdataRollback => write!(f, "testdata rollback"),
        }
    }
}

/// Root and migrations folder that all generated paths hang off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    root: String,
    migrations_folder: String,
}

impl PathLayout {
    /// Create a layout. An empty `root` yields root-relative paths.
    pub fn new(root: impl Into<String>, migrations_folder: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            migrations_folder: migrations_folder.into(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn migrations_folder(&self) -> &str {
        &self.migrations_folder
    }

    /// The same layout without its root, for paths stored in manifests
    pub fn relative(&self) -> Self {
        Self::new("", self.migrations_folder.clone())
    }

    /// `<root>/<migrationsFolder>/<version>`
    pub fn release_dir(&self, version: &ReleaseVersion) -> String {
        self.join(&[version.to_string().as_str()])
    }

    /// `<root>/<migrationsFolder>/<version>/<version>-changelog.yml`
    pub fn release_manifest(&self, version: &ReleaseVersion) -> String {
        self.join(&[
            version.to_string().as_str(),
            release_manifest_name(version).as_str(),
        ])
    }

    /// Generate the path of one release artifact.
    ///
    /// `sequence` and `name` are required for every kind except
    /// [`PathKind::ReleaseManifest`], which ignores them.
    pub fn generate(
        &self,
        kind: PathKind,
        version: &ReleaseVersion,
        sequence: Option<u32>,
        name: Option<&str>,
    ) -> CoreResult<String> {
        if kind == PathKind::ReleaseManifest {
            return Ok(self.release_manifest(version));
        }

        let sequence = sequence.ok_or_else(|| CoreError::PathComponentMissing {
            kind: kind.to_string(),
            component: "sequence",
        })?;
        let name = name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CoreError::PathComponentMissing {
                kind: kind.to_string(),
                component: "name",
            })?;

        let version_str = version.to_string();
        let file = sql_file_name(version, sequence, name)?;
        let mut segments: Vec<&str> = vec![version_str.as_str()];
        segments.extend_from_slice(kind.subdirs());
        segments.push(file.as_str());
        Ok(self.join(&segments))
    }

    fn join(&self, tail: &[&str]) -> String {
        let root = self.root.trim_end_matches('/');
        let folder = self.migrations_folder.trim_matches('/');
        [root, folder]
            .into_iter()
            .chain(tail.iter().copied())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// `<version>-changelog.yml`
pub fn release_manifest_name(version: &ReleaseVersion) -> String {
    format!("{version}-changelog.yml")
}

/// `<version>-<seq>__<name>.sql`
pub fn sql_file_name(version: &ReleaseVersion, sequence: u32, name: &str) -> CoreResult<String> {
    Ok(format!("{}-{}__{}.sql", version, pad_sequence(sequence)?, name))
}

#[cfg(test)]
#[path = "paths_test.rs"]
mod tests;
