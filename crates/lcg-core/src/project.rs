//! Project discovery and loading

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::paths::PathLayout;
use std::path::{Path, PathBuf};

/// A project directory together with its configuration
#[derive(Debug, Clone)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Project configuration
    pub config: Config,
}

impl Project {
    /// Load a project from a directory, reading lcg.yml when present
    pub fn load(path: &Path) -> CoreResult<Self> {
        let root = Self::resolve_root(path)?;
        let config = Config::load_from_dir(&root)?;
        Ok(Self { root, config })
    }

    /// Load a project from a directory with an explicit config file
    pub fn load_with_config(path: &Path, config_path: &Path) -> CoreResult<Self> {
        let root = Self::resolve_root(path)?;
        let config = Config::load(config_path)?;
        Ok(Self { root, config })
    }

    /// Build a project from an already loaded configuration
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    fn resolve_root(path: &Path) -> CoreResult<PathBuf> {
        let root = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if !root.is_dir() {
            return Err(CoreError::ProjectNotFound {
                path: root.display().to_string(),
            });
        }
        Ok(root)
    }

    /// Path of the master changelog
    pub fn changelog_path(&self) -> PathBuf {
        self.config.changelog_path(&self.root)
    }

    /// On-disk layout for release folders and SQL files
    pub fn layout(&self) -> PathLayout {
        self.config.layout(&self.root)
    }
}
