//! New-release command implementation

use anyhow::{Context, Result};
use lcg_core::{new_release, FsScaffolder, ReleaseRequest, ReleaseVersion, YamlManifestStore};

use crate::cli::{GlobalArgs, NewReleaseArgs};
use crate::commands::common::{display_path, load_project};

/// Execute the new-release command
pub(crate) fn execute(args: &NewReleaseArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let request = release_request(args)?;

    let outcome = new_release(&project, &request, &YamlManifestStore, &FsScaffolder)
        .context("Failed to create release")?;

    match &outcome.previous {
        Some(previous) => println!("Released {} (previous: {})", outcome.version, previous),
        None => println!("Released {} (first release)", outcome.version),
    }
    println!(
        "  Changelog: {}",
        display_path(&project, &outcome.release_manifest)
    );
    for id in &outcome.change_set_ids {
        println!("  Changeset: {}", id);
    }
    for file in &outcome.files {
        println!("  Created: {}", display_path(&project, file));
    }
    Ok(())
}

fn release_request(args: &NewReleaseArgs) -> Result<ReleaseRequest> {
    let version = args
        .release_version
        .as_deref()
        .map(ReleaseVersion::parse)
        .transpose()
        .context("Invalid --release-version")?;

    Ok(ReleaseRequest {
        version,
        major: args.major,
        minor: args.minor,
        patch: args.patch,
    })
}

#[cfg(test)]
#[path = "new_release_test.rs"]
mod tests;
