//! SHA-256 digest utilities
//!
//! Digests are plain lowercase hex strings, the same format the GitLab files
//! API returns in `content_sha256`, so local and remote values compare
//! directly.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::{Error, Result};

/// Compute the hex SHA-256 digest of in-memory bytes.
pub fn digest_bytes(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Compute the digest of a file that may or may not exist yet.
///
/// Returns `Ok(None)` when nothing exists at `path`. The file is streamed
/// into the hasher so large tracked files are never held in memory.
///
/// # Errors
///
/// Returns [`Error::Io`] if the path exists but cannot be opened or read.
pub fn digest_of_existing_file(path: &Path) -> Result<Option<String>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No local copy");
            return Ok(None);
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| Error::io(path, e))?;

    Ok(Some(hex::encode(hasher.finalize())))
}

/// Compare two hex digests, ignoring ASCII case and surrounding whitespace.
pub fn digests_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
