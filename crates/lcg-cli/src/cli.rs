//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// lcg - Liquibase changelog generator for versioned SQL releases
#[derive(Parser, Debug)]
#[command(name = "lcg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true, env = "LCG_CONFIG")]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new release folder and register it in the master changelog
    NewRelease(NewReleaseArgs),

    /// Add a changeset to the latest release
    NewChangeset(NewChangeSetArgs),

    /// List releases and their changesets
    Ls(LsArgs),
}

/// Arguments for the new-release command
#[derive(Args, Debug, Default)]
pub struct NewReleaseArgs {
    /// Explicit version for the release (MAJOR.MINOR.PATCH)
    #[arg(short = 'r', long, conflicts_with_all = ["major", "minor", "patch"])]
    pub release_version: Option<String>,

    /// Bump the major version
    #[arg(long)]
    pub major: bool,

    /// Bump the minor version
    #[arg(long)]
    pub minor: bool,

    /// Bump the patch version (default)
    #[arg(long)]
    pub patch: bool,
}

/// Arguments for the new-changeset command
#[derive(Args, Debug, Default)]
pub struct NewChangeSetArgs {
    /// Changeset name used in file names (default: changeset_example)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Also create a testdata changeset
    #[arg(short = 't', long)]
    pub with_testdata: bool,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,
}

/// List output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
