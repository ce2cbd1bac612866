// tests/config_loading.rs

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tempfile::NamedTempFile;

use lessbatch::cli::CliArgs;
use lessbatch::config::{ConfigFile, RawConfigFile, load_and_validate, load_from_path, resolve};
use lessbatch::errors::LessbatchError;
use lessbatch::types::OutputMode;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn args(list: &[&str]) -> CliArgs {
    let mut argv = vec!["lessbatch"];
    argv.extend_from_slice(list);
    CliArgs::parse_from(argv)
}

fn expect_config_error(contents: &str, needle: &str) {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(LessbatchError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn empty_file_yields_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.compiler().command, "lessc");
    assert_eq!(cfg.compiler().timeout_ms, 60_000);
    assert_eq!(cfg.compiler().output_mode, OutputMode::Auto);
    assert!(cfg.compiler().strict);
    assert_eq!(cfg.files().include, vec!["*.less".to_string()]);
    assert!(cfg.files().exclude.is_empty());
    assert!(!cfg.files().overwrite);
    assert_eq!(cfg.files().source_suffix, ".less");
    assert_eq!(cfg.files().target_suffix, ".css");
    assert_eq!(cfg.base_dir(), file.path().parent());
}

#[test]
fn full_file_is_read() {
    let file = write_config(
        r#"
[compiler]
command = "/usr/local/bin/plessc"
timeout_ms = 1500
output_mode = "stdout"
strict = false

[files]
source_dir = "styles"
dest_dir = "public/css"
include = ["**/*.less"]
exclude = ["_*.less"]
overwrite = true
"#,
    );
    let raw = load_from_path(file.path()).unwrap();

    assert_eq!(raw.compiler.command, "/usr/local/bin/plessc");
    assert_eq!(raw.compiler.timeout_ms, 1500);
    assert_eq!(raw.compiler.output_mode, OutputMode::Stdout);
    assert!(!raw.compiler.strict);
    assert_eq!(raw.files.source_dir.as_deref(), Some(Path::new("styles")));
    assert_eq!(raw.files.dest_dir.as_deref(), Some(Path::new("public/css")));
    assert_eq!(raw.files.exclude, vec!["_*.less".to_string()]);
    assert!(raw.files.overwrite);
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("[compiler\ncommand = 1");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(LessbatchError::TomlError(_))
    ));
}

#[test]
fn unknown_output_mode_is_rejected() {
    let file = write_config("[compiler]\noutput_mode = \"pipe\"\n");
    assert!(matches!(
        load_from_path(file.path()),
        Err(LessbatchError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_and_validate(dir.path().join("nope.toml")),
        Err(LessbatchError::IoError(_))
    ));
}

#[test]
fn empty_command_is_rejected() {
    expect_config_error("[compiler]\ncommand = \"  \"\n", "command must not be empty");
}

#[test]
fn suffix_without_dot_is_rejected() {
    expect_config_error("[files]\nsource_suffix = \"less\"\n", "source_suffix");
}

#[test]
fn identical_suffixes_are_rejected() {
    expect_config_error(
        "[files]\nsource_suffix = \".less\"\ntarget_suffix = \".LESS\"\n",
        "output would overwrite input",
    );
}

#[test]
fn empty_include_list_is_rejected() {
    expect_config_error("[files]\ninclude = []\n", "at least one pattern");
}

#[test]
fn invalid_glob_is_rejected() {
    expect_config_error("[files]\nexclude = [\"a[\"]\n", "[files].exclude");
}

#[test]
fn file_values_resolve_against_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Lessbatch.toml");
    std::fs::write(
        &path,
        "[compiler]\ntimeout_ms = 2500\n[files]\nsource_dir = \"styles\"\ndest_dir = \"css\"\n",
    )
    .unwrap();
    let cfg = load_and_validate(&path).unwrap();

    let resolved = resolve(&cfg, &args(&[])).unwrap();

    assert_eq!(resolved.settings.source_dir, dir.path().join("styles"));
    assert_eq!(resolved.settings.dest_dir, dir.path().join("css"));
    assert_eq!(resolved.timeout, Some(Duration::from_millis(2500)));
    assert_eq!(resolved.settings.command, "lessc");
    assert!(resolved.settings.strict);
    assert!(!resolved.settings.overwrite);
}

#[test]
fn hidden_files_are_opt_in_from_file_or_flag() {
    let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
    let resolved = resolve(&cfg, &args(&[])).unwrap();
    assert!(!resolved.selector.matches(".#site.less"));
    assert!(resolved.selector.matches("site.less"));

    let resolved = resolve(&cfg, &args(&["--hidden"])).unwrap();
    assert!(resolved.selector.matches(".#site.less"));

    let file = write_config("[files]\nhidden = true\n");
    let cfg = load_and_validate(file.path()).unwrap();
    let resolved = resolve(&cfg, &args(&[])).unwrap();
    assert!(resolved.selector.matches(".#site.less"));
}

#[test]
fn dest_dir_defaults_to_source_dir() {
    let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
    let src = tempfile::tempdir().unwrap();
    let src_arg = src.path().to_string_lossy().into_owned();

    let resolved = resolve(&cfg, &args(&["--source-dir", &src_arg])).unwrap();

    assert_eq!(resolved.settings.source_dir, src.path());
    assert_eq!(resolved.settings.dest_dir, src.path());
}

#[test]
fn cli_flags_override_file_values() {
    let file = write_config(
        r#"
[compiler]
command = "lessc"
timeout_ms = 1000
output_mode = "argument"

[files]
include = ["*.less"]
exclude = ["vendor/*"]
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();

    let resolved = resolve(
        &cfg,
        &args(&[
            "--command",
            "plessc",
            "--timeout-ms",
            "-1",
            "--output-mode",
            "stdout",
            "--include",
            "main.less",
            "--exclude",
            "_*.less",
            "--overwrite",
            "--lenient",
        ]),
    )
    .unwrap();

    assert_eq!(resolved.settings.command, "plessc");
    assert_eq!(resolved.timeout, None);
    assert_eq!(resolved.settings.output_mode, OutputMode::Stdout);
    assert!(resolved.settings.captures_stdout());
    assert!(resolved.settings.overwrite);
    assert!(!resolved.settings.strict);
    assert_eq!(resolved.includes, vec!["main.less".to_string()]);
    assert_eq!(
        resolved.excludes,
        vec!["vendor/*".to_string(), "_*.less".to_string()]
    );
    assert!(resolved.selector.matches("main.less"));
    assert!(!resolved.selector.matches("other.less"));
}

#[test]
fn empty_cli_command_is_rejected() {
    let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
    assert!(matches!(
        resolve(&cfg, &args(&["--command", ""])),
        Err(LessbatchError::ConfigError(_))
    ));
}

#[test]
fn auto_mode_follows_the_command_name() {
    assert!(OutputMode::Auto.captures_stdout("/opt/bin/plessc"));
    assert!(!OutputMode::Auto.captures_stdout("lessc"));
    assert!(OutputMode::Stdout.captures_stdout("lessc"));
    assert!(!OutputMode::Argument.captures_stdout("plessc"));
    assert_eq!("ARG".parse::<OutputMode>(), Ok(OutputMode::Argument));
    assert!("pipe".parse::<OutputMode>().is_err());
}
