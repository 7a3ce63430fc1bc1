//! Changeset records as they appear in a release changelog

use serde::{Deserialize, Serialize};

/// A single change applied by a changeset.
///
/// On disk each change is a one-key map (`sqlFile:` or `tagDatabase:`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChangeEntry", into = "ChangeEntry")]
pub enum Change {
    /// Run the SQL file at `path`
    SqlFile { path: String },
    /// Tag the database with `tag`
    TagDatabase { tag: String },
}

impl Change {
    pub fn sql_file(path: impl Into<String>) -> Self {
        Change::SqlFile { path: path.into() }
    }

    pub fn tag_database(tag: impl Into<String>) -> Self {
        Change::TagDatabase { tag: tag.into() }
    }

    /// Path of the SQL file this change runs, if it runs one
    pub fn sql_path(&self) -> Option<&str> {
        match self {
            Change::SqlFile { path } => Some(path),
            Change::TagDatabase { .. } => None,
        }
    }
}

/// Wire form of a [`Change`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ChangeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sql_file: Option<SqlFileEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag_database: Option<TagDatabaseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SqlFileEntry {
    path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TagDatabaseEntry {
    tag: String,
}

impl TryFrom<ChangeEntry> for Change {
    type Error = String;

    fn try_from(entry: ChangeEntry) -> Result<Self, Self::Error> {
        match (entry.sql_file, entry.tag_database) {
            (Some(sql), None) => Ok(Change::SqlFile { path: sql.path }),
            (None, Some(tag)) => Ok(Change::TagDatabase { tag: tag.tag }),
            (None, None) => Err("change must contain `sqlFile` or `tagDatabase`".to_string()),
            (Some(_), Some(_)) => {
                Err("change must contain only one of `sqlFile` or `tagDatabase`".to_string())
            }
        }
    }
}

impl From<Change> for ChangeEntry {
    fn from(change: Change) -> Self {
        match change {
            Change::SqlFile { path } => ChangeEntry {
                sql_file: Some(SqlFileEntry { path }),
                ..Default::default()
            },
            Change::TagDatabase { tag } => ChangeEntry {
                tag_database: Some(TagDatabaseEntry { tag }),
                ..Default::default()
            },
        }
    }
}

/// Context of schema changesets, applied everywhere
pub const MASTER_CONTEXT: &str = "master";

/// Context of testdata changesets, applied only where sample data is wanted
pub const TESTDATA_CONTEXT: &str = "testdata";

/// One migration unit within a release
///
/// Unknown keys are rejected: the release changelog is rewritten on every
/// append, so a key this type cannot hold would be silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangeSet {
    /// `<version>-<seq>` or `<version>-<seq>-testdata`
    pub id: String,

    pub author: String,

    /// Labels in insertion order, without duplicates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Liquibase context expression, [`MASTER_CONTEXT`] or
    /// [`TESTDATA_CONTEXT`] for generated changesets
    pub context: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Basename of the changeset's SQL file
    pub logical_file_path: String,

    /// Changes applied in order
    pub changes: Vec<Change>,

    /// Changes applied in order to undo `changes`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rollback: Vec<Change>,
}

impl ChangeSet {
    /// Add a label unless it is already present
    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }

    pub fn is_testdata(&self) -> bool {
        self.context == TESTDATA_CONTEXT
    }

    /// SQL files referenced by `changes` followed by those in `rollback`
    pub fn sql_paths(&self) -> impl Iterator<Item = &str> {
        self.changes
            .iter()
            .chain(self.rollback.iter())
            .filter_map(Change::sql_path)
    }
}

#[cfg(test)]
#[path = "changeset_test.rs"]
mod tests;
