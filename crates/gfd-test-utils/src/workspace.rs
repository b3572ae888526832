//! [`TestWorkspace`] for sync scenarios that write to local disk.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary output directory with helpers for seeding and asserting
/// local files.
///
/// # Example
///
/// ```rust,no_run
/// use gfd_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write("out/settings.json", b"{}");
/// ws.assert_file_content("out/settings.json", b"{}");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the workspace.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Create a directory (and parents) inside the workspace.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let dir = self.path(relative);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Seed a local file, creating parent directories.
    pub fn write(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Read a file inside the workspace.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> Vec<u8> {
        let path = self.path(relative);
        fs::read(&path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Modification time of a file, used to prove a file was left alone.
    pub fn modified(&self, relative: &str) -> std::time::SystemTime {
        fs::metadata(self.path(relative))
            .and_then(|m| m.modified())
            .unwrap()
    }

    /// Assert the file at `relative` holds exactly `expected`.
    ///
    /// # Panics
    /// Panics if the file is missing or differs.
    pub fn assert_file_content(&self, relative: &str, expected: &[u8]) {
        let actual = self.read(relative);
        assert!(
            actual == expected,
            "File {} has unexpected content.\nExpected: {}\nActual: {}",
            self.path(relative).display(),
            String::from_utf8_lossy(expected),
            String::from_utf8_lossy(&actual)
        );
    }

    /// Assert that `relative` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Names of the entries directly inside `relative`, sorted.
    pub fn list(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(relative))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
