//! Validated, immutable run settings

use std::fmt;
use std::path::{Path, PathBuf};

use gfd_api::Endpoint;
use secrecy::SecretString;

use crate::mode::Mode;

/// Field names as they appear in configuration files and error messages.
pub mod field {
    pub const TOKEN: &str = "token";
    pub const URL: &str = "url";
    pub const BRANCH: &str = "branch";
    pub const PROJECT: &str = "projectNumber";
    pub const OUT_PATH: &str = "outPath";
    pub const REPO_FILE_PATH: &str = "repoFilePath";
    pub const OUT_FOLDER: &str = "outFolder";
    pub const REPO_FOLDER: &str = "repoFolder";
}

/// Every problem found while validating [`crate::RawSettings`], collected in
/// one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigError {
    /// Required fields with no usable value
    pub missing: Vec<&'static str>,
    /// File and folder fields that were set together
    pub conflicts: Vec<String>,
}

impl ConfigError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.conflicts.is_empty()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing {}", self.missing.join(", ")));
        }
        parts.extend(self.conflicts.iter().cloned());
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ConfigError {}

/// What a run writes, and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File {
        remote_path: String,
        output_path: PathBuf,
    },
    Folder {
        remote_folder: String,
        output_folder: PathBuf,
    },
}

/// Settings a [`crate::SyncEngine`] runs with.
///
/// Only produced by [`crate::RawSettings::validate`], so every field is
/// present and exactly one target kind is set.
#[derive(Debug, Clone)]
pub struct Settings {
    token: SecretString,
    api_url: String,
    project: String,
    branch: String,
    target: Target,
    verify_remote_digest: bool,
}

impl Settings {
    pub(crate) fn new(
        token: SecretString,
        api_url: String,
        project: String,
        branch: String,
        target: Target,
        verify_remote_digest: bool,
    ) -> Self {
        Self {
            token,
            api_url,
            project,
            branch,
            target,
            verify_remote_digest,
        }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Whether decoded content is re-hashed and checked against the server digest.
    pub fn verify_remote_digest(&self) -> bool {
        self.verify_remote_digest
    }

    pub fn mode(&self) -> Mode {
        match self.target {
            Target::File { .. } => Mode::File,
            Target::Folder { .. } => Mode::Folder,
        }
    }

    /// API endpoint these settings talk to.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(
            self.api_url.clone(),
            self.project.clone(),
            self.token.clone(),
        )
    }

    /// File-mode copy of these settings for one folder entry.
    ///
    /// Credentials, project, branch and verification carry over; only the
    /// target changes.
    pub fn for_entry(
        &self,
        remote_path: impl Into<String>,
        output_path: impl AsRef<Path>,
    ) -> Self {
        Self {
            target: Target::File {
                remote_path: remote_path.into(),
                output_path: output_path.as_ref().to_path_buf(),
            },
            ..self.clone()
        }
    }
}
