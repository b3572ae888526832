//! Atomic writes and directory checks for synced files

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Directory a file at `path` would be written into.
///
/// A bare file name resolves to the current directory.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Check whether `path` exists and is a directory.
pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Create `path` as a directory if it is missing.
///
/// Only the last component is created; a missing grandparent is an error.
/// Returns `true` when the directory was created by this call.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir(path).map_err(|e| Error::io(path, e))?;
    tracing::debug!(path = %path.display(), "Created directory");
    Ok(true)
}

/// Write content atomically to a file with locking.
///
/// The content goes to a temporary sibling first and is renamed over `path`
/// only once fully flushed, so a failed write leaves any previous file
/// untouched. The parent directory must already exist.
///
/// An existing file keeps its permissions. When `path` is a symlink the file
/// it points to is replaced and the link itself is left in place.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let target = resolve_symlink(path);
    let temp_path = temp_path_for(&target);

    if let Err(e) = write_temp(&temp_path, &target, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = copy_permissions(&target, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, &target) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&target, e));
    }

    Ok(())
}

/// Final destination of `path` when it is a symlink, otherwise `path` itself.
///
/// A dangling link resolves to its destination relative to the link's
/// directory, so the write creates the file the link names.
fn resolve_symlink(path: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return path.to_path_buf();
    }

    let resolved = fs::canonicalize(path).or_else(|_| {
        fs::read_link(path).map(|dest| parent_dir(path).join(dest))
    });
    match resolved {
        Ok(real) => {
            tracing::debug!(link = %path.display(), target = %real.display(), "Writing through symlink");
            real
        }
        Err(_) => path.to_path_buf(),
    }
}

fn copy_permissions(target: &Path, temp_path: &Path) -> Result<()> {
    match fs::metadata(target) {
        Ok(meta) => fs::set_permissions(temp_path, meta.permissions())
            .map_err(|e| Error::io(temp_path, e)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(target, e)),
    }
}

// Same directory as the target so the rename never crosses filesystems.
fn temp_path_for(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

fn write_temp(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    Ok(())
}
