//! Persistence boundaries for manifests and generated files.
//!
//! The sequencing engine only talks to these two traits. The YAML/filesystem
//! implementations below are what the CLI uses.

use crate::error::{CoreError, CoreResult};
use crate::manifest::{MasterManifest, ReleaseManifest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Reads and writes manifest files
pub trait ManifestStore {
    /// Check whether a manifest exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the master changelog at `path`
    fn read_master(&self, path: &Path) -> CoreResult<MasterManifest>;

    /// Write the master changelog to `path`
    fn write_master(&self, path: &Path, manifest: &MasterManifest) -> CoreResult<()>;

    /// Read a release changelog at `path`
    fn read_release(&self, path: &Path) -> CoreResult<ReleaseManifest>;

    /// Write a release changelog to `path`
    fn write_release(&self, path: &Path, manifest: &ReleaseManifest) -> CoreResult<()>;
}

/// Creates release folders and SQL files
pub trait FileScaffolder {
    /// Check whether a file or directory exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Write `content` to `path`, creating parent directories as needed
    fn write_template(&self, path: &Path, content: &str) -> CoreResult<()>;
}

/// [`ManifestStore`] backed by YAML files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlManifestStore;

impl YamlManifestStore {
    fn read<T: DeserializeOwned>(path: &Path) -> CoreResult<T> {
        let content = fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| CoreError::YamlParseWithPath {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Write atomically: serialize, write to a temp file, then rename over
    /// the target.
    fn write<T: Serialize>(path: &Path, value: &T) -> CoreResult<()> {
        let yaml = serde_yaml::to_string(value)?;
        create_parent_dirs(path)?;

        let temp_path = path.with_extension(format!("yml.{}.tmp", std::process::id()));
        fs::write(&temp_path, yaml).map_err(|e| CoreError::IoWithPath {
            path: temp_path.display().to_string(),
            source: e,
        })?;
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            }
        })?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl ManifestStore for YamlManifestStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_master(&self, path: &Path) -> CoreResult<MasterManifest> {
        Self::read(path)
    }

    fn write_master(&self, path: &Path, manifest: &MasterManifest) -> CoreResult<()> {
        Self::write(path, manifest)
    }

    fn read_release(&self, path: &Path) -> CoreResult<ReleaseManifest> {
        Self::read(path)
    }

    fn write_release(&self, path: &Path, manifest: &ReleaseManifest) -> CoreResult<()> {
        Self::write(path, manifest)
    }
}

/// [`FileScaffolder`] writing straight to the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsScaffolder;

impl FileScaffolder for FsScaffolder {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write_template(&self, path: &Path, content: &str) -> CoreResult<()> {
        create_parent_dirs(path)?;
        fs::write(path, content).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        log::debug!("Created {}", path.display());
        Ok(())
    }
}

fn create_parent_dirs(path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CoreError::IoWithPath {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
