use clap::Parser;
use std::fs;
use tempfile::tempdir;
use textdupe::cli::Cli;
use textdupe::error::ExitCode;

use super::support::lock_env;

const SETUP: &str = "Install the toolchain with the installer.\n\
Run the setup command from a new terminal.\n\
Restart your shell when it finishes.\n";

fn app(argv: &[&str]) -> anyhow::Result<ExitCode> {
    let mut full = vec!["textdupe"];
    full.extend_from_slice(argv);
    textdupe::run_app(Cli::try_parse_from(full).unwrap())
}

/// Run the app quietly with a clean environment and no user config file.
fn run(argv: &[&str]) -> anyhow::Result<ExitCode> {
    let _env = lock_env();
    let mut full = vec!["-q"];
    full.extend_from_slice(argv);
    if argv.first() == Some(&"check") {
        full.push("--no-user-config");
    }
    app(&full)
}

#[test]
fn test_check_passes_without_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "Alpha\n\nnothing shared here\n").unwrap();
    fs::write(dir.path().join("b.md"), "Beta\n\nentirely different\n").unwrap();

    let code = run(&["check", dir.path().to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::Passed);
}

#[test]
fn test_check_fails_below_threshold() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), SETUP).unwrap();
    fs::write(dir.path().join("b.md"), SETUP).unwrap();

    let root = dir.path().to_str().unwrap();
    let code = run(&["check", root, "--line-counting", "newlines"]).unwrap();
    assert_eq!(code, ExitCode::Failed);

    // Every line is duplicated, so only a zero threshold passes.
    let code = run(&[
        "check",
        root,
        "--line-counting",
        "newlines",
        "--failure-threshold",
        "0",
    ])
    .unwrap();
    assert_eq!(code, ExitCode::Passed);
}

#[test]
fn test_check_json_and_csv_outputs_complete() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), SETUP).unwrap();
    let root = dir.path().to_str().unwrap();

    assert_eq!(
        run(&["check", root, "-o", "json"]).unwrap(),
        ExitCode::Passed
    );
    assert_eq!(
        run(&["check", root, "-o", "csv"]).unwrap(),
        ExitCode::Passed
    );
}

#[test]
fn test_check_project_config_is_honoured() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), SETUP).unwrap();
    fs::write(dir.path().join("b.md"), SETUP).unwrap();
    fs::write(
        dir.path().join(".textdupe.toml"),
        "failure_threshold = 0.0\nline_counting = \"newlines\"\n",
    )
    .unwrap();

    let code = run(&["check", dir.path().to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::Passed);
}

#[test]
fn test_missing_explicit_config_is_config_error() {
    let dir = tempdir().unwrap();
    let root = dir.path().to_str().unwrap();
    let missing = dir.path().join("missing.toml");

    let err = run(&["check", root, "--config", missing.to_str().unwrap()]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[cfg(target_os = "linux")]
#[test]
fn test_user_config_layer_can_be_skipped() {
    let _env = lock_env();
    let home = tempdir().unwrap();
    fs::create_dir_all(home.path().join("textdupe")).unwrap();
    fs::write(
        home.path().join("textdupe/config.toml"),
        "failure_threshold = 0.0\nline_counting = \"newlines\"\n",
    )
    .unwrap();

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), SETUP).unwrap();
    fs::write(dir.path().join("b.md"), SETUP).unwrap();
    let root = dir.path().to_str().unwrap();

    let saved = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", home.path());
    let with_user = app(&["-q", "check", root]);
    let without_user = app(&["-q", "check", root, "--no-user-config"]);
    match saved {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(with_user.unwrap(), ExitCode::Passed);
    assert_eq!(without_user.unwrap(), ExitCode::Failed);
}

#[test]
fn test_no_color_env_values() {
    let _env = lock_env();
    for (value, expected) in [
        ("1", true),
        ("yes", true),
        ("true", true),
        ("0", false),
        ("false", false),
    ] {
        std::env::set_var("NO_COLOR", value);
        let parsed = Cli::try_parse_from(["textdupe", "check", "."]);
        std::env::remove_var("NO_COLOR");
        assert_eq!(parsed.unwrap().no_color, expected, "NO_COLOR={value:?}");
    }

    let cli = Cli::try_parse_from(["textdupe", "--no-color", "check"]).unwrap();
    assert!(cli.no_color);
}

#[test]
fn test_invalid_config_value_is_config_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".textdupe.toml"), "io_threads = 0\n").unwrap();

    let err = run(&["check", dir.path().to_str().unwrap()]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_missing_root_is_general_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = run(&["check", missing.to_str().unwrap()]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
}

#[test]
fn test_root_must_be_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.md");
    fs::write(&file, SETUP).unwrap();

    let err = run(&["check", file.to_str().unwrap()]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(err.to_string().contains("Not a directory"));
}

#[test]
fn test_init_writes_and_protects_config() {
    let dir = tempdir().unwrap();
    let root = dir.path().to_str().unwrap();

    assert_eq!(run(&["init", root]).unwrap(), ExitCode::Passed);
    let written = fs::read_to_string(dir.path().join(".textdupe.toml")).unwrap();
    assert!(written.contains("failure_threshold = 90.0"));

    let err = run(&["init", root]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);

    assert_eq!(run(&["init", root, "--force"]).unwrap(), ExitCode::Passed);
}
