use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
    time::{Duration, SystemTime},
};

use rotate_files::rotator::{rotate, RotateError};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rotate-files-it-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

// Files named f0..f{count-1}, f0 being the oldest
fn fill(dir: &Path, count: u64) {
    for i in 0..count {
        let file = fs::File::create(dir.join(format!("f{i}"))).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(86_400 * (100 + i)))
            .unwrap();
    }
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn rotate_files(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_rotate-files"))
        .args(args)
        .env("RUST_LOG", "debug")
        .output()
        .unwrap()
}

#[test]
fn survivors_are_always_the_newest() {
    for keep in 0..=6 {
        let dir = scratch_dir(&format!("survivors-{keep}"));
        fill(&dir, 5);

        let deleted = rotate(&dir, keep).unwrap();
        let expected_deleted = 5usize.saturating_sub(keep);
        assert_eq!(deleted.len(), expected_deleted);
        let expected: Vec<String> = (expected_deleted as u64..5).map(|i| format!("f{i}")).collect();
        assert_eq!(names(&dir), expected);
        assert!(rotate(&dir, keep).unwrap().is_empty());
    }
}

#[test]
fn missing_directory_reports_access_error() {
    let dir = scratch_dir("missing").join("nope");
    assert!(matches!(
        rotate(&dir, 0),
        Err(RotateError::DirectoryAccess { .. })
    ));
}

#[test]
fn binary_rotates_logs_and_targets() {
    let logs = scratch_dir("bin-logs");
    let first = scratch_dir("bin-first");
    let second = scratch_dir("bin-second");
    fill(&logs, 3);
    fill(&first, 4);
    fill(&second, 2);

    let dirs = format!("{}, {} ,{}", first.display(), logs.join("absent").display(), second.display());
    let output = rotate_files(&[
        "--log-dir",
        logs.to_str().unwrap(),
        "--keep-logs",
        "1",
        "-d",
        &dirs,
        "-k",
        "3",
    ]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(names(&first), vec!["f1", "f2", "f3"]);
    assert_eq!(names(&second), vec!["f0", "f1"]);

    // only today's log file survives the log rotation
    let log_files = names(&logs);
    assert_eq!(log_files.len(), 1, "{log_files:?}");
    assert!(log_files[0].starts_with("rotate-files."));
    assert!(log_files[0].ends_with(".log"));
    let log = fs::read_to_string(logs.join(&log_files[0])).unwrap();
    assert!(log.contains("Program started"));
    assert!(log.contains("Failed to rotate directory"));
    assert!(log.contains("Program done"));
}

#[test]
fn binary_requires_target_dirs_but_rotates_logs_first() {
    let logs = scratch_dir("bin-no-dirs");
    fill(&logs, 4);

    let output = rotate_files(&["--log-dir", logs.to_str().unwrap(), "--keep-logs", "2", "-k", "1"]);

    assert_eq!(output.status.code(), Some(1));
    let log_files = names(&logs);
    assert_eq!(log_files.len(), 2, "{log_files:?}");
    assert!(log_files.contains(&"f3".to_owned()));
}

#[test]
fn binary_rejects_negative_keep() {
    let logs = scratch_dir("bin-negative");
    let target = scratch_dir("bin-negative-target");
    fill(&target, 2);

    let output = rotate_files(&[
        "--log-dir",
        logs.to_str().unwrap(),
        "-d",
        target.to_str().unwrap(),
        "-k",
        "-1",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(names(&target), vec!["f0", "f1"]);
}
