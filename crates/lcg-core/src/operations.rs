//! The two entry operations: start a new release, add a changeset to the
//! current release. Plus a read-only listing used by `lcg ls`.
//!
//! Every computation (version, manifest update, changeset records, paths)
//! completes before the first write. Writes go SQL files first, then the
//! release changelog, then the master changelog, so an interrupted run never
//! leaves the master pointing at a release changelog that does not exist.

use crate::error::{CoreError, CoreResult};
use crate::manifest::{MasterManifest, ReleaseManifest};
use crate::paths::{PathKind, PathLayout};
use crate::project::Project;
use crate::sequence::{ChangeSetSequencer, DEFAULT_CHANGESET_NAME};
use crate::store::{FileScaffolder, ManifestStore};
use crate::templates::sql_template;
use crate::version::{resolve_version, ReleaseRequest, ReleaseVersion};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Sequence number of the first changeset in a release
const FIRST_SEQUENCE: u32 = 1;

/// Result of [`new_release`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// The version that was released
    pub version: ReleaseVersion,
    /// Latest version before this release, if there was one
    pub previous: Option<ReleaseVersion>,
    /// Path of the new release changelog
    pub release_manifest: PathBuf,
    /// Ids of the changesets the release starts with
    pub change_set_ids: Vec<String>,
    /// SQL files created
    pub files: Vec<PathBuf>,
}

/// What the caller asked for when adding a changeset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSetRequest {
    /// Changeset name, [`DEFAULT_CHANGESET_NAME`] when absent
    pub name: Option<String>,
    /// Also create the testdata twin
    pub with_testdata: bool,
}

/// Result of [`new_change_set`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetOutcome {
    /// Release the changeset was added to
    pub version: ReleaseVersion,
    /// Sequence number of the new changeset
    pub sequence: u32,
    /// Ids of the appended changesets (primary first)
    pub change_set_ids: Vec<String>,
    /// Path of the updated release changelog
    pub release_manifest: PathBuf,
    /// SQL files created
    pub files: Vec<PathBuf>,
}

/// Start a new release: resolve its version, scaffold its folder with a first
/// changeset and its testdata twin, and register it in the master changelog.
pub fn new_release(
    project: &Project,
    request: &ReleaseRequest,
    store: &impl ManifestStore,
    scaffolder: &impl FileScaffolder,
) -> CoreResult<ReleaseOutcome> {
    let master_path = project.changelog_path();
    let master = if store.exists(&master_path) {
        store.read_master(&master_path)?
    } else {
        log::info!(
            "No master changelog found at {}, starting a new one",
            master_path.display()
        );
        MasterManifest::new()
    };

    let previous = match master.latest_version() {
        Ok(latest) => Some(latest),
        Err(CoreError::EmptyManifest) => None,
        Err(e) => return Err(e),
    };
    let version = resolve_version(request, previous.as_ref())?;
    match &previous {
        Some(prev) => log::info!("Old version: {prev}, new version: {version}"),
        None => log::info!("Creating first release: {version}"),
    }

    let layout = project.layout();
    let folder_exists = scaffolder.exists(Path::new(&layout.release_dir(&version)));
    let (updated_master, release_path) =
        master.register_release(&layout, &version, folder_exists)?;

    let pair = ChangeSetSequencer::new(&layout, &project.config.author).build(
        &version,
        FIRST_SEQUENCE,
        DEFAULT_CHANGESET_NAME,
        true,
    )?;
    let planned = plan_sql_files(
        &layout,
        &version,
        FIRST_SEQUENCE,
        DEFAULT_CHANGESET_NAME,
        true,
    )?;
    let release = ReleaseManifest::new(pair.into_vec());
    let change_set_ids = ids(release.change_sets().iter().map(|cs| cs.id.as_str()));

    let files = write_sql_files(scaffolder, planned)?;
    let release_path = PathBuf::from(release_path);
    store.write_release(&release_path, &release)?;
    store.write_master(&master_path, &updated_master)?;
    log::info!("Wrote master changelog: {}", master_path.display());

    Ok(ReleaseOutcome {
        version,
        previous,
        release_manifest: release_path,
        change_set_ids,
        files,
    })
}

/// Append a changeset (and optionally its testdata twin) to the latest
/// release.
pub fn new_change_set(
    project: &Project,
    request: &ChangeSetRequest,
    store: &impl ManifestStore,
    scaffolder: &impl FileScaffolder,
) -> CoreResult<ChangeSetOutcome> {
    let master_path = project.changelog_path();
    if !store.exists(&master_path) {
        return Err(CoreError::MasterNotFound {
            path: master_path.display().to_string(),
        });
    }
    let master = store.read_master(&master_path)?;
    let version = master.latest_version()?;

    let layout = project.layout();
    let release_path = PathBuf::from(layout.release_manifest(&version));
    if !store.exists(&release_path) {
        return Err(CoreError::ReleaseManifestNotFound {
            path: release_path.display().to_string(),
        });
    }
    let release = store.read_release(&release_path)?;
    let sequence = release.next_sequence()?;

    let name = request.name.as_deref().unwrap_or(DEFAULT_CHANGESET_NAME);
    let pair = ChangeSetSequencer::new(&layout, &project.config.author).build(
        &version,
        sequence,
        name,
        request.with_testdata,
    )?;
    let planned = plan_sql_files(&layout, &version, sequence, name, request.with_testdata)?;
    let appended = pair.into_vec();
    let change_set_ids = ids(appended.iter().map(|cs| cs.id.as_str()));
    let updated = release.append(appended);

    let files = write_sql_files(scaffolder, planned)?;
    store.write_release(&release_path, &updated)?;
    log::info!(
        "New changeset: {} written to {}",
        change_set_ids.join(", "),
        release_path.display()
    );

    Ok(ChangeSetOutcome {
        version,
        sequence,
        change_set_ids,
        release_manifest: release_path,
        files,
    })
}

/// One release as listed by [`list_releases`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseSummary {
    pub version: ReleaseVersion,
    /// Reference as written in the master changelog
    pub path: String,
    /// `false` when the master references a release changelog that is missing
    pub exists: bool,
    /// Changeset ids in creation order
    pub change_sets: Vec<String>,
}

/// List every release in the master changelog with its changeset ids
pub fn list_releases(
    project: &Project,
    store: &impl ManifestStore,
) -> CoreResult<Vec<ReleaseSummary>> {
    let master_path = project.changelog_path();
    if !store.exists(&master_path) {
        return Err(CoreError::MasterNotFound {
            path: master_path.display().to_string(),
        });
    }
    let master = store.read_master(&master_path)?;
    let layout = project.layout();

    master
        .releases()
        .iter()
        .map(|release_ref| -> CoreResult<ReleaseSummary> {
            let version = release_ref.version()?;
            let path = PathBuf::from(layout.release_manifest(&version));
            let exists = store.exists(&path);
            let change_sets = if exists {
                ids(store
                    .read_release(&path)?
                    .change_sets()
                    .iter()
                    .map(|cs| cs.id.as_str()))
            } else {
                log::warn!("Release changelog missing: {}", path.display());
                Vec::new()
            };
            Ok(ReleaseSummary {
                version,
                path: release_ref.path.clone(),
                exists,
                change_sets,
            })
        })
        .collect()
}

/// On-disk SQL files for one changeset, paired with their template bodies
fn plan_sql_files(
    layout: &PathLayout,
    version: &ReleaseVersion,
    sequence: u32,
    name: &str,
    with_testdata: bool,
) -> CoreResult<Vec<(PathBuf, &'static str)>> {
    let mut kinds = vec![PathKind::Migration, PathKind::Rollback];
    if with_testdata {
        kinds.extend([PathKind::TestdataMigration, PathKind::TestdataRollback]);
    }

    let mut planned = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let path = layout.generate(kind, version, Some(sequence), Some(name))?;
        if let Some(body) = sql_template(kind) {
            planned.push((PathBuf::from(path), body));
        }
    }
    Ok(planned)
}

/// Write planned SQL files, leaving any existing file untouched
fn write_sql_files(
    scaffolder: &impl FileScaffolder,
    planned: Vec<(PathBuf, &'static str)>,
) -> CoreResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(planned.len());
    for (path, body) in planned {
        if scaffolder.exists(&path) {
            log::warn!("Leaving existing file untouched: {}", path.display());
            continue;
        }
        scaffolder.write_template(&path, body)?;
        written.push(path);
    }
    Ok(written)
}

fn ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    ids.map(str::to_string).collect()
}

#[cfg(test)]
#[path = "operations_test.rs"]
mod tests;
