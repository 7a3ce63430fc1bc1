//! lcg-core - Core library for changelog generation
//!
//! This crate resolves release versions, keeps the master and per-release
//! changelogs in sync, sequences changesets inside a release, and computes
//! every path those artifacts live at.

pub mod changeset;
pub mod config;
pub mod error;
pub mod manifest;
pub mod operations;
pub mod paths;
pub mod project;
pub mod sequence;
pub mod store;
pub mod templates;
pub mod version;

pub use changeset::{Change, ChangeSet, MASTER_CONTEXT, TESTDATA_CONTEXT};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use manifest::{MasterManifest, ReleaseManifest, ReleaseRef};
pub use operations::{
    list_releases, new_change_set, new_release, ChangeSetOutcome, ChangeSetRequest,
    ReleaseOutcome, ReleaseSummary,
};
pub use paths::{PathKind, PathLayout};
pub use project::Project;
pub use sequence::{ChangeSetPair, ChangeSetSequencer};
pub use store::{FileScaffolder, FsScaffolder, ManifestStore, YamlManifestStore};
pub use version::{resolve_version, ReleaseRequest, ReleaseVersion, VersionBump};
