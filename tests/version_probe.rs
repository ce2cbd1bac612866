// tests/version_probe.rs

use lessbatch::exec::{LaunchError, ProbeError, ProcessResult, VersionProbe, parse_version};
use lessbatch_test_utils::{FakeRunner, init_tracing};

#[test]
fn parse_version_strips_command_name_and_v_prefix() {
    assert_eq!(parse_version("lessc v2.3.1\n", "lessc"), "2.3.1");
    assert_eq!(parse_version("lessc 2.3.1", "lessc"), "2.3.1");
    assert_eq!(parse_version("v2.3.1", "lessc"), "2.3.1");
    assert_eq!(parse_version("  2.3.1  \n", "lessc"), "2.3.1");
}

#[test]
fn parse_version_uses_file_name_of_a_path_command() {
    assert_eq!(
        parse_version("plessc v0.9.4\n", "/usr/local/bin/plessc"),
        "0.9.4"
    );
    assert_eq!(
        parse_version("/usr/local/bin/plessc 0.9.4", "/usr/local/bin/plessc"),
        "0.9.4"
    );
}

#[test]
fn parse_version_leaves_unrecognised_output_trimmed() {
    assert_eq!(parse_version("Less compiler 3.0\n", "lessc"), "Less compiler 3.0");
    assert_eq!(parse_version("", "lessc"), "");
}

#[tokio::test]
async fn probe_runs_command_with_version_flag() {
    init_tracing();
    let runner = FakeRunner::new()
        .with_version(|| ProcessResult::completed(0, "lessc v2.3.1 (Less Compiler) [JavaScript]\n", ""));

    let version = VersionProbe::new(&runner).probe("lessc").await.unwrap();

    assert_eq!(version, "2.3.1 (Less Compiler) [JavaScript]");
    let calls = runner.invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, "lessc");
    assert_eq!(calls[0].args, vec!["-v".to_string()]);
    assert_eq!(calls[0].working_dir, None);
}

#[tokio::test]
async fn probe_reports_launch_failure() {
    init_tracing();
    let runner = FakeRunner::new().without_executable();

    let err = VersionProbe::new(&runner).probe("lessc").await.unwrap_err();

    match &err {
        ProbeError::Launch { command, source } => {
            assert_eq!(command, "lessc");
            assert!(matches!(source, LaunchError::Spawn { .. }));
        }
        other => panic!("expected Launch error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("failed to execute command \"lessc\""));
}

#[tokio::test]
async fn probe_reports_non_zero_exit_code() {
    init_tracing();
    let runner = FakeRunner::new().with_version(|| ProcessResult::completed(2, "", "unknown option"));

    let err = VersionProbe::new(&runner).probe("lessc").await.unwrap_err();

    match err {
        ProbeError::ExitCode { command, exit_code } => {
            assert_eq!(command, "lessc");
            assert_eq!(exit_code, 2);
        }
        other => panic!("expected ExitCode error, got {other:?}"),
    }
}
