use gfd_fs::{digest_bytes, digest_of_existing_file, io};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[rstest]
#[case("settings.json", ".")]
#[case("out/settings.json", "out")]
#[case("/abs/out/settings.json", "/abs/out")]
#[case("./settings.json", ".")]
fn test_parent_dir(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(io::parent_dir(Path::new(input)), PathBuf::from(expected));
}

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.txt");

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    io::write_atomic(&file_path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_writes_binary_content() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("blob.bin");
    let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    io::write_atomic(&file_path, &content).unwrap();

    assert_eq!(fs::read(&file_path).unwrap(), content);
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("target.txt");

    io::write_atomic(&file_path, b"content").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["target.txt".to_string()]);
}

#[test]
fn test_ensure_dir_creates_single_level() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("out");

    assert!(io::ensure_dir(&dir).unwrap());
    assert!(dir.is_dir());
    // Second call is a no-op
    assert!(!io::ensure_dir(&dir).unwrap());
}

#[test]
fn test_dir_exists() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("file.txt");
    fs::write(&file_path, "x").unwrap();

    assert!(io::dir_exists(temp.path()));
    assert!(!io::dir_exists(&file_path));
    assert!(!io::dir_exists(&temp.path().join("missing")));
}

#[cfg(unix)]
#[test]
fn test_write_atomic_keeps_existing_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join(".env");
    fs::write(&file_path, "SECRET=old\n").unwrap();
    fs::set_permissions(&file_path, fs::Permissions::from_mode(0o600)).unwrap();

    io::write_atomic(&file_path, b"SECRET=new\n").unwrap();

    let mode = fs::metadata(&file_path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "SECRET=new\n");
}

#[cfg(unix)]
#[test]
fn test_write_atomic_updates_symlink_destination() {
    let temp = TempDir::new().unwrap();
    let real = temp.path().join("real.env");
    let link = temp.path().join("app.env");
    fs::write(&real, "OLD=1\n").unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    io::write_atomic(&link, b"NEW=2\n").unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(&real).unwrap(), "NEW=2\n");
    // The digest seen through the link now matches what was written
    assert_eq!(
        digest_of_existing_file(&link).unwrap(),
        Some(digest_bytes(b"NEW=2\n"))
    );
}

#[cfg(unix)]
#[test]
fn test_write_atomic_through_relative_dangling_symlink() {
    let temp = TempDir::new().unwrap();
    let link = temp.path().join("app.env");
    std::os::unix::fs::symlink("real.env", &link).unwrap();

    io::write_atomic(&link, b"FRESH=1\n").unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read_to_string(temp.path().join("real.env")).unwrap(),
        "FRESH=1\n"
    );
}
