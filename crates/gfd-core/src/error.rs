//! Error types for gfd-core

use std::path::PathBuf;

use crate::mode::Mode;
use crate::settings::ConfigError;

/// Result type for gfd-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving settings or reconciling files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings are missing fields or combine file and folder targets
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// An explicitly requested configuration file does not exist
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// A configuration layer is not valid TOML for the settings shape
    #[error("Failed to parse configuration {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The directory that should receive the output file does not exist
    #[error("Target directory {dir} does not exist")]
    TargetMissing { dir: PathBuf },

    /// Decoded remote content does not hash to the digest the server reported
    #[error("Content of {path} hashes to {actual}, server reported {expected}")]
    IntegrityMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// An operation was given settings for the other target kind
    #[error("Expected {expected} settings, got {actual}")]
    ModeMismatch { expected: Mode, actual: Mode },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from gfd-fs
    #[error(transparent)]
    Fs(#[from] gfd_fs::Error),

    /// Repository API error from gfd-api
    #[error(transparent)]
    Api(#[from] gfd_api::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
