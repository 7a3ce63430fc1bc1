//! Example SQL bodies written into freshly scaffolded files

use crate::paths::PathKind;

/// Forward migration example
pub const MIGRATION_SQL: &str = "-- This is an auto-generated example migration, please remove this.
CREATE TABLE example_table
(
\thello_world VARCHAR(100)
);
";

/// Rollback example, undoes [`MIGRATION_SQL`]
pub const ROLLBACK_SQL: &str = "-- This is an auto-generated example rollback, please remove this.
DROP TABLE example_table;
";

/// Testdata seed example
pub const TESTDATA_MIGRATION_SQL: &str =
    "-- This is an auto-generated example testdata insert, please remove this.
INSERT INTO example_table (hello_world)
VALUES ('hello_world');
";

/// Testdata rollback example, undoes [`TESTDATA_MIGRATION_SQL`]
pub const TESTDATA_ROLLBACK_SQL: &str =
    "-- This is an auto-generated example rollback, please remove this.
TRUNCATE TABLE example_table;
";

/// SQL body for a scaffolded file of `kind`.
///
/// Release changelogs are serialized manifests, not templates, so they have
/// no body here.
pub fn sql_template(kind: PathKind) -> Option<&'static str> {
    match kind {
        PathKind::ReleaseManifest => None,
        PathKind::Migration => Some(MIGRATION_SQL),
        PathKind::Rollback => Some(ROLLBACK_SQL),
        PathKind::TestdataMigration => Some(TESTDATA_MIGRATION_SQL),
        PathKind::TestdataRollback => Some(TESTDATA_ROLLBACK_SQL),
    }
}
