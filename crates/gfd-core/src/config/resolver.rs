//! Configuration resolution with layered merge

use std::fs;
use std::path::{Path, PathBuf};

use super::raw::RawSettings;
use crate::{Error, Result};

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "gitlab-file-downloader";

/// Branch used when no layer names one.
pub const DEFAULT_BRANCH: &str = "master";

/// Resolves settings by merging configuration layers
///
/// Layers, lowest precedence first:
/// 1. Global defaults (`<config_dir>/gitlab-file-downloader/config.toml`)
/// 2. Explicit configuration file, if one was given
/// 3. Overrides passed to [`ConfigResolver::resolve`]
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    config_file: Option<PathBuf>,

    /// Override for the global config directory (used for testing).
    /// When `None`, the platform-appropriate directory is used via `dirs::config_dir()`.
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver using the platform-appropriate global config directory:
    /// - Linux: `~/.config/gitlab-file-downloader/`
    /// - macOS: `~/Library/Application Support/gitlab-file-downloader/`
    /// - Windows: `%APPDATA%\gitlab-file-downloader\`
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit configuration file. Unlike the global file it must exist.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Use a custom global config directory instead of the platform one.
    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME))
    }

    /// Merge all layers with `overrides` on top.
    ///
    /// A missing global file is skipped. A missing explicit file is
    /// [`Error::ConfigNotFound`]; invalid TOML in any file is
    /// [`Error::ConfigParse`]. The branch defaults to [`DEFAULT_BRANCH`].
    pub fn resolve(&self, overrides: &RawSettings) -> Result<RawSettings> {
        let mut settings = RawSettings::default();

        // Layer 1 - Global defaults
        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            if global_config_path.is_file() {
                tracing::debug!(?global_config_path, "Loading global config (layer 1)");
                settings.merge(&load_layer(&global_config_path)?);
            } else {
                tracing::debug!(?global_config_path, "No global config found (layer 1), skipping");
            }
        }

        // Layer 2 - Explicit file
        if let Some(ref config_file) = self.config_file {
            if !config_file.is_file() {
                return Err(Error::ConfigNotFound {
                    path: config_file.clone(),
                });
            }
            tracing::debug!(?config_file, "Loading config file (layer 2)");
            settings.merge(&load_layer(config_file)?);
        }

        // Layer 3 - Environment and flags
        tracing::debug!(?overrides, "Applying overrides (layer 3)");
        settings.merge(overrides);

        if settings.branch.is_none() {
            settings.branch = Some(DEFAULT_BRANCH.to_string());
        }

        Ok(settings)
    }
}

fn load_layer(path: &Path) -> Result<RawSettings> {
    let content = fs::read_to_string(path)?;
    RawSettings::parse(&content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
