//! List command implementation

use anyhow::{Context, Result};
use lcg_core::{list_releases, ReleaseSummary, YamlManifestStore};

use crate::cli::{GlobalArgs, LsArgs, LsOutput};
use crate::commands::common::{load_project, print_json, print_table};

/// Execute the ls command
pub(crate) fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let releases =
        list_releases(&project, &YamlManifestStore).context("Failed to list releases")?;

    match args.output {
        LsOutput::Table => {
            print_table(&["VERSION", "CHANGESETS", "LATEST", "CHANGELOG"], &rows(&releases));
            println!();
            println!("{} release(s)", releases.len());
        }
        LsOutput::Json => print_json(&releases)?,
    }
    Ok(())
}

fn rows(releases: &[ReleaseSummary]) -> Vec<Vec<String>> {
    releases
        .iter()
        .map(|release| {
            let latest = release.change_sets.last().cloned().unwrap_or_else(|| "-".to_string());
            let path = if release.exists {
                release.path.clone()
            } else {
                format!("{} (missing)", release.path)
            };
            vec![
                release.version.to_string(),
                release.change_sets.len().to_string(),
                latest,
                path,
            ]
        })
        .collect()
}

#[cfg(test)]
#[path = "ls_test.rs"]
mod tests;
