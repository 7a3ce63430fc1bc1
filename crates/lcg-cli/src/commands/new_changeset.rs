//! New-changeset command implementation

use anyhow::{Context, Result};
use lcg_core::{new_change_set, ChangeSetRequest, FsScaffolder, YamlManifestStore};

use crate::cli::{GlobalArgs, NewChangeSetArgs};
use crate::commands::common::{display_path, load_project};

/// Execute the new-changeset command
pub(crate) fn execute(args: &NewChangeSetArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let request = ChangeSetRequest {
        name: args.name.clone(),
        with_testdata: args.with_testdata,
    };

    let outcome = new_change_set(&project, &request, &YamlManifestStore, &FsScaffolder)
        .context("Failed to add changeset")?;

    println!(
        "Added changeset {} to release {}",
        outcome.change_set_ids.join(", "),
        outcome.version
    );
    println!(
        "  Changelog: {}",
        display_path(&project, &outcome.release_manifest)
    );
    for file in &outcome.files {
        println!("  Created: {}", display_path(&project, file));
    }
    Ok(())
}

#[cfg(test)]
#[path = "new_changeset_test.rs"]
mod tests;
