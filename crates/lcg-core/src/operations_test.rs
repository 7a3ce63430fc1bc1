use super::*;
use crate::changeset::{Change, MASTER_CONTEXT};
use crate::config::Config;
use crate::store::{FsScaffolder, YamlManifestStore};
use std::fs;
use tempfile::{tempdir, TempDir};

fn project() -> (TempDir, Project) {
    let dir = tempdir().unwrap();
    let project = Project::with_config(dir.path(), Config::default());
    (dir, project)
}

fn v(s: &str) -> ReleaseVersion {
    ReleaseVersion::parse(s).unwrap()
}

fn release(project: &Project, request: &ReleaseRequest) -> CoreResult<ReleaseOutcome> {
    new_release(project, request, &YamlManifestStore, &FsScaffolder)
}

fn change_set(project: &Project, name: Option<&str>, testdata: bool) -> CoreResult<ChangeSetOutcome> {
    let request = ChangeSetRequest {
        name: name.map(str::to_string),
        with_testdata: testdata,
    };
    new_change_set(project, &request, &YamlManifestStore, &FsScaffolder)
}

/// Scaffolder that refuses every write
struct ReadOnlyScaffolder;

impl FileScaffolder for ReadOnlyScaffolder {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write_template(&self, path: &Path, _content: &str) -> CoreResult<()> {
        Err(CoreError::IoWithPath {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

/// Rewrite the `id:` line of changeset `id` in a changelog, the way a user
/// editing the file by hand would
fn edit_id_line(path: &Path, id: &str, edit: impl Fn(&str) -> Vec<String>) {
    let content = fs::read_to_string(path).unwrap();
    let mut found = false;
    let mut lines = Vec::new();
    for line in content.lines() {
        let value = line.trim().strip_prefix("id:").map(|v| v.trim().trim_matches('\''));
        if value == Some(id) {
            found = true;
            lines.extend(edit(line));
        } else {
            lines.push(line.to_string());
        }
    }
    assert!(found, "no id line for {id} in:\n{content}");
    fs::write(path, lines.join("\n") + "\n").unwrap();
}

#[test]
fn test_first_release_scaffolds_everything() {
    let (dir, project) = project();
    let outcome = release(&project, &ReleaseRequest::default()).unwrap();

    assert_eq!(outcome.version, v("0.0.1"));
    assert_eq!(outcome.previous, None);
    assert_eq!(
        outcome.change_set_ids,
        vec!["0.0.1-001", "0.0.1-001-testdata"]
    );

    let base = dir.path().join("db/migrations/0.0.1");
    for rel in [
        "0.0.1-changelog.yml",
        "0.0.1-001__changeset_example.sql",
        "rollbacks/0.0.1-001__changeset_example.sql",
        "testdata/0.0.1-001__changeset_example.sql",
        "testdata/rollbacks/0.0.1-001__changeset_example.sql",
    ] {
        assert!(base.join(rel).is_file(), "missing {rel}");
    }
    assert_eq!(outcome.files.len(), 4);
    assert_eq!(outcome.release_manifest, base.join("0.0.1-changelog.yml"));

    let master = YamlManifestStore
        .read_master(&project.changelog_path())
        .unwrap();
    assert_eq!(master.release_count(), 1);
    assert_eq!(
        master.releases()[0].path,
        "migrations/0.0.1/0.0.1-changelog.yml"
    );
}

#[test]
fn test_generated_sql_bodies() {
    let (dir, project) = project();
    release(&project, &ReleaseRequest::default()).unwrap();

    let base = dir.path().join("db/migrations/0.0.1");
    let migration = fs::read_to_string(base.join("0.0.1-001__changeset_example.sql")).unwrap();
    let rollback =
        fs::read_to_string(base.join("rollbacks/0.0.1-001__changeset_example.sql")).unwrap();
    let seed = fs::read_to_string(base.join("testdata/0.0.1-001__changeset_example.sql")).unwrap();
    let unseed =
        fs::read_to_string(base.join("testdata/rollbacks/0.0.1-001__changeset_example.sql"))
            .unwrap();
    assert!(migration.contains("CREATE TABLE example_table"));
    assert!(rollback.contains("DROP TABLE example_table"));
    assert!(seed.contains("INSERT INTO example_table"));
    assert!(unseed.contains("TRUNCATE TABLE example_table"));
}

#[test]
fn test_end_to_end_add_changeset() {
    let (dir, project) = project();
    release(&project, &ReleaseRequest::default()).unwrap();

    let outcome = change_set(&project, Some("add_users"), false).unwrap();
    assert_eq!(outcome.version, v("0.0.1"));
    assert_eq!(outcome.sequence, 2);
    assert_eq!(outcome.change_set_ids, vec!["0.0.1-002"]);

    let release = YamlManifestStore
        .read_release(&outcome.release_manifest)
        .unwrap();
    let ids: Vec<&str> = release.change_sets().iter().map(|cs| cs.id.as_str()).collect();
    assert_eq!(ids, vec!["0.0.1-001", "0.0.1-001-testdata", "0.0.1-002"]);

    let latest = release.latest_change_set().unwrap();
    assert_eq!(latest.logical_file_path, "0.0.1-002__add_users.sql");
    assert_eq!(latest.context, MASTER_CONTEXT);
    assert_eq!(
        latest.changes[0],
        Change::sql_file("migrations/0.0.1/0.0.1-002__add_users.sql")
    );

    let base = dir.path().join("db/migrations/0.0.1");
    assert!(base.join("0.0.1-002__add_users.sql").is_file());
    assert!(base.join("rollbacks/0.0.1-002__add_users.sql").is_file());
    assert!(!base.join("testdata/0.0.1-002__add_users.sql").exists());
}

#[test]
fn test_add_changeset_with_testdata() {
    let (dir, project) = project();
    release(&project, &ReleaseRequest::default()).unwrap();
    change_set(&project, None, false).unwrap();

    let outcome = change_set(&project, Some("seed_users"), true).unwrap();
    assert_eq!(outcome.sequence, 3);
    assert_eq!(
        outcome.change_set_ids,
        vec!["0.0.1-003", "0.0.1-003-testdata"]
    );
    assert_eq!(outcome.files.len(), 4);

    let base = dir.path().join("db/migrations/0.0.1");
    assert!(base.join("testdata/0.0.1-003__seed_users.sql").is_file());
    assert!(base
        .join("testdata/rollbacks/0.0.1-003__seed_users.sql")
        .is_file());
}

#[test]
fn test_default_changeset_name() {
    let (_dir, project) = project();
    release(&project, &ReleaseRequest::default()).unwrap();
    let outcome = change_set(&project, None, false).unwrap();
    let release = YamlManifestStore
        .read_release(&outcome.release_manifest)
        .unwrap();
    assert_eq!(
        release.latest_change_set().unwrap().logical_file_path,
        "0.0.1-002__changeset_example.sql"
    );
}

#[test]
fn test_second_release_bumps_and_appends() {
    let (_dir, project) = project();
    release(&project, &ReleaseRequest::default()).unwrap();

    let outcome = release(
        &project,
        &ReleaseRequest {
            minor: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(outcome.previous, Some(v("0.0.1")));
    assert_eq!(outcome.version, v("0.1.0"));

    let master = YamlManifestStore
        .read_master(&project.changelog_path())
        .unwrap();
    assert_eq!(master.release_count(), 2);
    assert_eq!(master.latest_version().unwrap(), v("0.1.0"));

    // New changesets go to the newest release and restart at 002.
    let added = change_set(&project, Some("x"), false).unwrap();
    assert_eq!(added.change_set_ids, vec!["0.1.0-002"]);
}

#[test]
fn test_explicit_version_conflict_writes_nothing() {
    let (_dir, project) = project();
    release(
        &project,
        &ReleaseRequest {
            version: Some(v("1.0.0")),
            ..Default::default()
        },
    )
    .unwrap();
    let before = fs::read_to_string(project.changelog_path()).unwrap();

    let err = release(
        &project,
        &ReleaseRequest {
            version: Some(v("0.5.0")),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::VersionConflict { .. }));
    assert_eq!(fs::read_to_string(project.changelog_path()).unwrap(), before);
}

#[test]
fn test_existing_release_folder_is_a_conflict() {
    let (dir, project) = project();
    fs::create_dir_all(dir.path().join("db/migrations/0.0.1")).unwrap();

    let err = release(&project, &ReleaseRequest::default()).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateRelease { .. }));
    assert!(err.to_string().contains("0.0.1"));
    assert!(!project.changelog_path().exists());
}

#[test]
fn test_failed_scaffold_leaves_master_untouched() {
    let (_dir, project) = project();
    let err = new_release(
        &project,
        &ReleaseRequest::default(),
        &YamlManifestStore,
        &ReadOnlyScaffolder,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
    assert!(!project.changelog_path().exists());
}

#[test]
fn test_changeset_without_master() {
    let (_dir, project) = project();
    let err = change_set(&project, None, false).unwrap_err();
    assert!(matches!(err, CoreError::MasterNotFound { .. }));
    assert!(err.to_string().contains("changelog.yml"));
}

#[test]
fn test_changeset_with_missing_release_manifest() {
    let (dir, project) = project();
    release(&project, &ReleaseRequest::default()).unwrap();
    fs::remove_file(dir.path().join("db/migrations/0.0.1/0.0.1-changelog.yml")).unwrap();

    let err = change_set(&project, None, false).unwrap_err();
    assert!(matches!(err, CoreError::ReleaseManifestNotFound { .. }));
}

#[test]
fn test_changeset_on_empty_master() {
    let (_dir, project) = project();
    YamlManifestStore
        .write_master(&project.changelog_path(), &MasterManifest::new())
        .unwrap();
    assert!(matches!(
        change_set(&project, None, false),
        Err(CoreError::EmptyManifest)
    ));
}

#[test]
fn test_release_on_empty_master_starts_at_first_version() {
    let (_dir, project) = project();
    YamlManifestStore
        .write_master(&project.changelog_path(), &MasterManifest::new())
        .unwrap();
    let outcome = release(&project, &ReleaseRequest::default()).unwrap();
    assert_eq!(outcome.version, v("0.0.1"));
}

#[test]
fn test_existing_sql_file_is_not_overwritten() {
    let (dir, project) = project();
    release(&project, &ReleaseRequest::default()).unwrap();
    let target = dir.path().join("db/migrations/0.0.1/0.0.1-002__keep.sql");
    fs::write(&target, "-- mine").unwrap();

    let outcome = change_set(&project, Some("keep"), false).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "-- mine");
    assert_eq!(outcome.files.len(), 1);
}

#[test]
fn test_invalid_changeset_name_writes_nothing() {
    let (_dir, project) = project();
    let first = release(&project, &ReleaseRequest::default()).unwrap();
    let before = fs::read_to_string(&first.release_manifest).unwrap();

    let err = change_set(&project, Some("../../etc"), false).unwrap_err();
    assert!(matches!(err, CoreError::InvalidName { .. }));
    assert_eq!(fs::read_to_string(&first.release_manifest).unwrap(), before);
}

#[test]
fn test_list_releases() {
    let (dir, project) = project();
    release(&project, &ReleaseRequest::default()).unwrap();
    change_set(&project, Some("a"), false).unwrap();
    release(
        &project,
        &ReleaseRequest {
            major: true,
            ..Default::default()
        },
    )
    .unwrap();
    fs::remove_file(dir.path().join("db/migrations/1.0.0/1.0.0-changelog.yml")).unwrap();

    let releases = list_releases(&project, &YamlManifestStore).unwrap();
    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].version, v("0.0.1"));
    assert!(releases[0].exists);
    assert_eq!(
        releases[0].change_sets,
        vec!["0.0.1-001", "0.0.1-001-testdata", "0.0.1-002"]
    );
    assert_eq!(releases[1].version, v("1.0.0"));
    assert!(!releases[1].exists);
    assert!(releases[1].change_sets.is_empty());
}

#[test]
fn test_custom_config_layout() {
    let dir = tempdir().unwrap();
    let config = Config {
        root_path: "database".to_string(),
        changelog_file: "master.yml".to_string(),
        migrations_folder: "releases".to_string(),
        author: "Jane Doe <jane@example.com>".to_string(),
    };
    let project = Project::with_config(dir.path(), config);
    release(&project, &ReleaseRequest::default()).unwrap();

    assert!(dir.path().join("database/master.yml").is_file());
    let release_path = dir.path().join("database/releases/0.0.1/0.0.1-changelog.yml");
    let manifest = YamlManifestStore.read_release(&release_path).unwrap();
    assert_eq!(
        manifest.change_sets()[0].author,
        "Jane Doe <jane@example.com>"
    );
    assert_eq!(
        manifest.change_sets()[0].changes[0],
        Change::sql_file("releases/0.0.1/0.0.1-001__changeset_example.sql")
    );
}

#[test]
fn test_hand_added_key_fails_instead_of_being_dropped() {
    let (_dir, project) = project();
    let first = release(&project, &ReleaseRequest::default()).unwrap();
    edit_id_line(&first.release_manifest, "0.0.1-001", |line| {
        let indent = &line[..line.len() - line.trim_start().len()];
        vec![line.to_string(), format!("{indent}runOnChange: true")]
    });
    let before = fs::read_to_string(&first.release_manifest).unwrap();

    let err = change_set(&project, Some("add_users"), false).unwrap_err();
    assert!(matches!(err, CoreError::YamlParseWithPath { .. }));
    assert!(err.to_string().contains("0.0.1-changelog.yml"), "{err}");
    assert_eq!(fs::read_to_string(&first.release_manifest).unwrap(), before);
    assert!(!project
        .root
        .join("db/migrations/0.0.1/0.0.1-002__add_users.sql")
        .exists());
}

#[test]
fn test_sequence_at_integer_limit_is_an_error() {
    let (_dir, project) = project();
    let first = release(&project, &ReleaseRequest::default()).unwrap();
    edit_id_line(&first.release_manifest, "0.0.1-001-testdata", |line| {
        vec![line.replace("0.0.1-001-testdata", &format!("0.0.1-{}", u32::MAX))]
    });
    let before = fs::read_to_string(&first.release_manifest).unwrap();

    let err = change_set(&project, None, false).unwrap_err();
    assert!(matches!(err, CoreError::SequenceOverflow { .. }));
    assert_eq!(fs::read_to_string(&first.release_manifest).unwrap(), before);
}
