//! Error types for lcg-core

use thiserror::Error;

/// Core error type for lcg
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// V001: Version string is not a plain `major.minor.patch` version
    #[error("[V001] Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// V002: Requested version does not move past the latest release
    #[error("[V002] Release version {requested} must be greater than the latest version {latest} in the master changelog")]
    VersionConflict { requested: String, latest: String },

    /// M001: Release folder already exists on disk
    #[error("[M001] Release folder already exists: {path}")]
    DuplicateRelease { path: String },

    /// M002: Master changelog lists no releases
    #[error("[M002] Master changelog has no releases")]
    EmptyManifest,

    /// M003: Release changelog lists no changesets
    #[error("[M003] Release changelog has no changesets")]
    EmptyRelease,

    /// M004: Changeset id or release reference is not in the expected shape
    #[error("[M004] Malformed id '{id}': {reason}")]
    MalformedId { id: String, reason: String },

    /// M005: Sequence number does not fit the 3-digit changeset width
    #[error("[M005] Changeset sequence {sequence} exceeds the maximum of {max} per release")]
    SequenceOverflow { sequence: u32, max: u32 },

    /// M006: No master changelog at the configured location
    #[error("[M006] No master changelog exists at: {path}, run `lcg new-release` to start a new project")]
    MasterNotFound { path: String },

    /// M007: Master changelog references a release changelog that is missing
    #[error("[M007] No release changelog exists at: {path}, run `lcg new-release` to start a new release")]
    ReleaseManifestNotFound { path: String },

    /// M008: A path was requested without a component its kind needs
    #[error("[M008] Cannot build {kind} path without a {component}")]
    PathComponentMissing {
        kind: String,
        component: &'static str,
    },

    /// M009: Changeset name cannot be used in a file name
    #[error("[M009] Invalid changeset name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E017: YAML parse error with file path context
    #[error("[E017] Failed to parse '{path}': {source}")]
    YamlParseWithPath {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
