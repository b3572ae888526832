//! Local filesystem layer for GitLab File Downloader
//!
//! Provides the streaming SHA-256 digest of files already on disk and the
//! atomic write used when a remote file has changed.

pub mod checksum;
pub mod error;
pub mod io;

pub use checksum::{digest_bytes, digest_of_existing_file, digests_match};
pub use error::{Error, Result};
