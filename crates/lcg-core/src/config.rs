//! Configuration types and parsing for lcg.yml

use crate::error::{CoreError, CoreResult};
use crate::paths::PathLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in a project directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["lcg.yml", "lcg.yaml"];

/// Project configuration from lcg.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the master changelog and the migrations folder
    #[serde(default = "default_root_path")]
    pub root_path: String,

    /// Master changelog file name, relative to `root_path`
    #[serde(default = "default_changelog_file")]
    pub changelog_file: String,

    /// Folder under `root_path` holding one folder per release
    #[serde(default = "default_migrations_folder")]
    pub migrations_folder: String,

    /// Author written into generated changesets
    #[serde(default = "default_author")]
    pub author: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            changelog_file: default_changelog_file(),
            migrations_folder: default_migrations_folder(),
            author: default_author(),
        }
    }
}

fn default_root_path() -> String {
    "db".to_string()
}

fn default_changelog_file() -> String {
    "changelog.yml".to_string()
}

fn default_migrations_folder() -> String {
    "migrations".to_string()
}

fn default_author() -> String {
    "FirstName LastName <firstname.lastname@example.com>".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::YamlParseWithPath {
                path: path.display().to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for lcg.yml or lcg.yaml and falls back to the defaults when
    /// neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
        {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No lcg.yml in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let required = [
            ("root_path", &self.root_path),
            ("changelog_file", &self.changelog_file),
            ("migrations_folder", &self.migrations_folder),
            ("author", &self.author),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'{field}' cannot be empty"),
                });
            }
        }

        if Path::new(&self.migrations_folder).is_absolute() {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "'migrations_folder' must be relative to root_path, got '{}'",
                    self.migrations_folder
                ),
            });
        }
        if Path::new(&self.changelog_file).is_absolute() {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "'changelog_file' must be relative to root_path, got '{}'",
                    self.changelog_file
                ),
            });
        }

        Ok(())
    }

    /// Absolute root directory for a project
    pub fn root_absolute(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.root_path)
    }

    /// Path of the master changelog for a project
    pub fn changelog_path(&self, project_dir: &Path) -> PathBuf {
        self.root_absolute(project_dir).join(&self.changelog_file)
    }

    /// Path layout rooted at the project's root directory
    pub fn layout(&self, project_dir: &Path) -> PathLayout {
        PathLayout::new(
            self.root_absolute(project_dir).display().to_string(),
            self.migrations_folder.clone(),
        )
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
