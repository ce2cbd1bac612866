// tests/real_filesystem.rs

use std::fs;

use lessbatch::fs::{FileSystem, RealFileSystem};

#[test]
fn writable_directory_is_reported_writable_and_left_clean() {
    let dir = tempfile::tempdir().unwrap();

    assert!(RealFileSystem.can_write_dir(dir.path()));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_path_and_plain_file_are_not_writable_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("site.css");
    fs::write(&file, "a{}").unwrap();

    assert!(!RealFileSystem.can_write_dir(&dir.path().join("nope")));
    assert!(!RealFileSystem.can_write_dir(&file));
}

/// The answer must match what actually happens on write, whoever runs the
/// tests (root ignores the missing write bits).
#[cfg(unix)]
#[test]
fn read_only_mode_bits_agree_with_an_actual_write() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let reported = RealFileSystem.can_write_dir(&locked);
    let actual = fs::write(locked.join("out.css"), "a{}").is_ok();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(reported, actual);
}
