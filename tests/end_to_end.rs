// tests/end_to_end.rs
#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use lessbatch::batch::{BatchError, BatchExecutor};
use lessbatch::exec::ProcessRunner;
use lessbatch::fs::RealFileSystem;
use lessbatch::report::Severity;
use lessbatch::scan::{DEFAULT_INCLUDE, FileSelector, scan_candidates};
use lessbatch::types::OutputMode;
use lessbatch_test_utils::{BatchSettingsBuilder, RecordingSink, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

/// A stand-in compiler:
/// - `-v` prints a version line
/// - inputs containing `ERROR` fail with a message on stderr
/// - inputs containing `WARN` exit 0 but print to stderr
/// - otherwise the input is copied to the output (or to stdout when only
///   one file argument is given)
const FAKE_COMPILER: &str = r#"#!/bin/sh
if [ "$1" = "-v" ]; then
  echo "lessc v9.8.7"
  exit 0
fi
if grep -q ERROR "$1"; then
  echo "ParseError: unexpected token in $1" >&2
  exit 1
fi
if grep -q WARN "$1"; then
  echo "warning: deprecated syntax" >&2
fi
if [ -n "$2" ]; then
  cp "$1" "$2"
else
  cat "$1"
fi
"#;

fn install_compiler(dir: &Path, name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    fs::write(&path, FAKE_COMPILER)?;
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms)?;
    Ok(path)
}

fn set_mtime(path: &Path, time: SystemTime) -> Result<(), Box<dyn Error>> {
    let file = fs::OpenOptions::new().write(true).open(path)?;
    file.set_modified(time)?;
    Ok(())
}

fn executor(
    settings: lessbatch::batch::BatchSettings,
    sink: Arc<RecordingSink>,
) -> BatchExecutor {
    BatchExecutor::new(
        settings,
        Arc::new(ProcessRunner::new(Some(Duration::from_secs(10)))),
        Arc::new(RealFileSystem),
        sink,
    )
}

#[tokio::test]
async fn mixed_batch_against_a_real_compiler() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let src = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let compiler = install_compiler(tools.path(), "lessc")?;

    fs::write(src.path().join("a.less"), "a { color: red; }")?;
    fs::write(src.path().join("b.less"), "b { ERROR }")?;
    fs::write(src.path().join("c.less"), "c { color: blue; }")?;

    // c.css is newer than its input and must be left alone.
    let now = SystemTime::now();
    set_mtime(&src.path().join("c.less"), now - Duration::from_secs(3600))?;
    fs::write(out.path().join("c.css"), "stale but newer")?;
    set_mtime(&out.path().join("c.css"), now)?;

    let sink = Arc::new(RecordingSink::new());
    let settings = BatchSettingsBuilder::new(src.path())
        .dest_dir(out.path())
        .command(&compiler.to_string_lossy())
        .build();

    let err = executor(settings, sink.clone())
        .execute(&[
            "a.less".to_string(),
            "b.less".to_string(),
            "c.less".to_string(),
        ])
        .await
        .unwrap_err();

    let BatchError::Failed(failure) = err else {
        panic!("expected BatchFailure");
    };
    assert_eq!(failure.succeeded, 1);
    assert_eq!(failure.failed, 1);
    assert_eq!(failure.skipped, 1);

    assert_eq!(fs::read_to_string(out.path().join("a.css"))?, "a { color: red; }");
    assert!(!out.path().join("b.css").exists());
    assert_eq!(fs::read_to_string(out.path().join("c.css"))?, "stale but newer");

    assert!(sink.contains(Severity::Verbose, "version is \"9.8.7\""));
    assert!(sink.contains(Severity::Error, "ParseError: unexpected token"));
    assert!(sink.contains(Severity::Error, "Exit code 1."));
    assert!(sink.contains(Severity::Verbose, "Skipping \"c.less\" because output file is newer."));
    Ok(())
}

#[tokio::test]
async fn warnings_fail_only_in_strict_mode() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let src = tempfile::tempdir()?;
    let compiler = install_compiler(tools.path(), "lessc")?;
    fs::write(src.path().join("w.less"), "w { WARN }")?;
    let files = vec!["w.less".to_string()];

    let strict = BatchSettingsBuilder::new(src.path())
        .command(&compiler.to_string_lossy())
        .build();
    let result = executor(strict, Arc::new(RecordingSink::new()))
        .execute(&files)
        .await;
    assert!(matches!(result, Err(BatchError::Failed(_))));

    let lenient = BatchSettingsBuilder::new(src.path())
        .command(&compiler.to_string_lossy())
        .strict(false)
        .overwrite(true)
        .build();
    let outcome = executor(lenient, Arc::new(RecordingSink::new()))
        .execute(&files)
        .await?;
    assert_eq!(outcome.succeeded, 1);
    assert!(src.path().join("w.css").exists());
    Ok(())
}

#[tokio::test]
async fn stdout_mode_writes_captured_output() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let src = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let compiler = install_compiler(tools.path(), "plessc")?;
    fs::write(src.path().join("site.less"), "body { margin: 0; }")?;

    let settings = BatchSettingsBuilder::new(src.path())
        .dest_dir(out.path())
        .command(&compiler.to_string_lossy())
        .output_mode(OutputMode::Auto)
        .build();
    let outcome = executor(settings, Arc::new(RecordingSink::new()))
        .execute(&["site.less".to_string()])
        .await?;

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(
        fs::read_to_string(out.path().join("site.css"))?,
        "body { margin: 0; }"
    );
    Ok(())
}

#[tokio::test]
async fn missing_compiler_fails_every_file_but_finishes() -> TestResult {
    init_tracing();
    let src = tempfile::tempdir()?;
    fs::write(src.path().join("a.less"), "a{}")?;
    fs::write(src.path().join("b.less"), "b{}")?;
    let sink = Arc::new(RecordingSink::new());

    let settings = BatchSettingsBuilder::new(src.path())
        .command("/nonexistent/lessbatch-compiler")
        .build();
    let err = executor(settings, sink.clone())
        .execute(&["a.less".to_string(), "b.less".to_string()])
        .await
        .unwrap_err();

    let BatchError::Failed(failure) = err else {
        panic!("expected BatchFailure");
    };
    assert_eq!(failure.failed, 2);
    assert!(sink.contains(Severity::Notice, "Failed to determine command version"));
    assert_eq!(sink.at(Severity::Error).len(), 3);
    Ok(())
}

#[tokio::test]
async fn recursive_scan_with_colliding_outputs_fails_the_batch() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let src = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let compiler = install_compiler(tools.path(), "lessc")?;
    fs::create_dir_all(src.path().join("a"))?;
    fs::create_dir_all(src.path().join("b"))?;
    fs::write(src.path().join("a/x.less"), "A")?;
    fs::write(src.path().join("b/x.less"), "B")?;
    let settings = BatchSettingsBuilder::new(src.path())
        .dest_dir(out.path())
        .command(&compiler.to_string_lossy())
        .build();

    let top_level = FileSelector::new(&[DEFAULT_INCLUDE.to_string()], &[])?;
    assert!(scan_candidates(&RealFileSystem, src.path(), &top_level)?.is_empty());

    let recursive = FileSelector::new(&["**/*.less".to_string()], &[])?;
    let candidates = scan_candidates(&RealFileSystem, src.path(), &recursive)?;
    assert_eq!(candidates, vec!["a/x.less", "b/x.less"]);

    let sink = Arc::new(RecordingSink::new());
    let err = executor(settings, sink.clone())
        .execute(&candidates)
        .await
        .unwrap_err();

    let BatchError::Failed(failure) = err else {
        panic!("expected BatchFailure");
    };
    assert_eq!((failure.succeeded, failure.failed, failure.skipped), (1, 1, 0));
    assert_eq!(fs::read_to_string(out.path().join("x.css"))?, "A");
    assert!(sink.contains(Severity::Error, "is already produced by \"a/x.less\""));
    Ok(())
}
