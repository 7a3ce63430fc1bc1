//! Changeset sequence numbers and changeset construction.
//!
//! Sequence numbers are 1-based and rendered with a fixed width of three
//! digits, so a release holds at most [`MAX_SEQUENCE`] changesets.

use crate::changeset::{Change, ChangeSet, MASTER_CONTEXT, TESTDATA_CONTEXT};
use crate::error::{CoreError, CoreResult};
use crate::paths::{PathKind, PathLayout};
use crate::version::ReleaseVersion;

/// Width of the zero-padded sequence segment of a changeset id
pub const SEQUENCE_WIDTH: usize = 3;

/// Largest sequence number that fits [`SEQUENCE_WIDTH`]
pub const MAX_SEQUENCE: u32 = 999;

/// Suffix that marks the testdata twin of a changeset
pub const TESTDATA_SUFFIX: &str = "-testdata";

/// Name used when a changeset is created without one
pub const DEFAULT_CHANGESET_NAME: &str = "changeset_example";

/// Labels attached to every generated changeset
pub const DEFAULT_LABELS: [&str; 2] = ["example_changeset", "remove_these"];

/// Extra label attached to testdata changesets
pub const TESTDATA_LABEL: &str = "testdata";

const MIGRATION_COMMENT: &str = "This is an example migration";
const TESTDATA_COMMENT: &str = "This is an example testdata migration";

/// Zero-pad a sequence number to [`SEQUENCE_WIDTH`] digits
pub fn pad_sequence(sequence: u32) -> CoreResult<String> {
    if sequence == 0 {
        return Err(CoreError::MalformedId {
            id: sequence.to_string(),
            reason: "changeset sequences start at 1".to_string(),
        });
    }
    if sequence > MAX_SEQUENCE {
        return Err(CoreError::SequenceOverflow {
            sequence,
            max: MAX_SEQUENCE,
        });
    }
    Ok(format!("{:0width$}", sequence, width = SEQUENCE_WIDTH))
}

/// Parse the sequence number out of a changeset id.
///
/// Accepts `<version>-<seq>` and `<version>-<seq>-testdata`.
pub fn parse_sequence(id: &str) -> CoreResult<u32> {
    let malformed = |reason: &str| CoreError::MalformedId {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    let base = id.strip_suffix(TESTDATA_SUFFIX).unwrap_or(id);
    let parts: Vec<&str> = base.split('-').collect();
    let [version, sequence] = parts.as_slice() else {
        return Err(malformed("expected <version>-<sequence>[-testdata]"));
    };

    ReleaseVersion::parse(version).map_err(|_| malformed("version segment is not a version"))?;

    if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("sequence segment is not a number"));
    }
    sequence
        .parse::<u32>()
        .map_err(|_| malformed("sequence segment is out of range"))
}

/// Reject names that cannot be embedded in a file name
pub fn validate_name(name: &str) -> CoreResult<()> {
    let invalid = |reason: &str| CoreError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(invalid("must not contain '/', '\\', or '..'"));
    }
    if name.starts_with('.') || name.starts_with('-') {
        return Err(invalid("must not start with '.' or '-'"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    Ok(())
}

/// Changesets produced by one sequencing step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetPair {
    /// The schema changeset
    pub primary: ChangeSet,
    /// Its testdata twin, sharing the sequence number
    pub testdata: Option<ChangeSet>,
}

impl ChangeSetPair {
    /// The changesets in manifest order
    pub fn into_vec(self) -> Vec<ChangeSet> {
        std::iter::once(self.primary).chain(self.testdata).collect()
    }
}

/// Builds changeset records for one release
#[derive(Debug, Clone)]
pub struct ChangeSetSequencer<'a> {
    layout: PathLayout,
    author: &'a str,
}

impl<'a> ChangeSetSequencer<'a> {
    /// `layout` is the on-disk layout; manifest references are generated
    /// relative to its root.
    pub fn new(layout: &PathLayout, author: &'a str) -> Self {
        Self {
            layout: layout.relative(),
            author,
        }
    }

    /// Build the changeset for `sequence`, plus its testdata twin when
    /// `with_testdata` is set.
    pub fn build(
        &self,
        version: &ReleaseVersion,
        sequence: u32,
        name: &str,
        with_testdata: bool,
    ) -> CoreResult<ChangeSetPair> {
        validate_name(name)?;
        let padded = pad_sequence(sequence)?;
        let id = format!("{version}-{padded}");
        let path = |kind| self.layout.generate(kind, version, Some(sequence), Some(name));

        let mut primary = ChangeSet {
            id: id.clone(),
            author: self.author.to_string(),
            labels: Vec::new(),
            context: MASTER_CONTEXT.to_string(),
            comment: Some(MIGRATION_COMMENT.to_string()),
            logical_file_path: format!("{version}-{padded}__{name}.sql"),
            changes: vec![
                Change::sql_file(path(PathKind::Migration)?),
                Change::tag_database(version.to_string()),
            ],
            rollback: vec![Change::sql_file(path(PathKind::Rollback)?)],
        };
        for label in DEFAULT_LABELS {
            primary.add_label(label);
        }

        let testdata = if with_testdata {
            let mut twin = primary.clone();
            twin.id = format!("{id}{TESTDATA_SUFFIX}");
            twin.context = TESTDATA_CONTEXT.to_string();
            twin.add_label(TESTDATA_LABEL);
            twin.comment = Some(TESTDATA_COMMENT.to_string());
            twin.logical_file_path = format!("{version}-{padded}{TESTDATA_SUFFIX}__{name}.sql");
            twin.changes = vec![
                Change::sql_file(path(PathKind::TestdataMigration)?),
                Change::tag_database(version.to_string()),
            ];
            twin.rollback = vec![Change::sql_file(path(PathKind::TestdataRollback)?)];
            Some(twin)
        } else {
            None
        };

        log::debug!("Built changeset {id} (testdata: {with_testdata})");
        Ok(ChangeSetPair { primary, testdata })
    }
}

#[cfg(test)]
#[path = "sequence_test.rs"]
mod tests;
