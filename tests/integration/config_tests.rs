//! Integration tests for the layered configuration stack.
//!
//! These tests cover defaults, user/project/explicit TOML files,
//! `TEXTDUPE_*` environment overrides, CLI flag overrides, and validation.

use clap::Parser;
use std::fs;
use tempfile::tempdir;
use textdupe::cli::{Cli, Commands};
use textdupe::config::{Config, ConfigError};
use textdupe::duplicates::LineCounting;

use super::support::{clear_env, lock_env};

fn check_args(argv: &[&str]) -> textdupe::cli::CheckArgs {
    let mut full = vec!["textdupe", "check", "--no-user-config"];
    full.extend_from_slice(argv);
    match Cli::try_parse_from(full).unwrap().command {
        Commands::Check(args) => args,
        Commands::Init(_) => panic!("Expected Check command"),
    }
}

#[test]
fn test_defaults_without_files() {
    let _env = lock_env();
    let dir = tempdir().unwrap();

    let config = Config::load_layers(None, dir.path(), None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_project_file_overrides_user_file() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    let user = dir.path().join("user.toml");
    fs::write(&user, "min_lines = 5\nmin_chars = 10\n").unwrap();
    fs::write(dir.path().join(".textdupe.toml"), "min_lines = 4\n").unwrap();

    let config = Config::load_layers(Some(&user), dir.path(), None).unwrap();
    assert_eq!(config.min_lines, 4);
    assert_eq!(config.min_chars, 10);
    assert_eq!(config.failure_threshold, 90.0);
}

#[test]
fn test_explicit_file_overrides_project_file() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("textdupe.toml"), "failure_threshold = 70.0\n").unwrap();
    let explicit = dir.path().join("ci.toml");
    fs::write(
        &explicit,
        "failure_threshold = 95\nline_counting = \"newlines\"\n",
    )
    .unwrap();

    let config = Config::load_layers(None, dir.path(), Some(&explicit)).unwrap();
    assert_eq!(config.failure_threshold, 95.0);
    assert_eq!(config.line_counting, LineCounting::Newlines);
}

#[test]
fn test_env_overrides_files() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".textdupe.toml"), "io_threads = 2\n").unwrap();

    std::env::set_var("TEXTDUPE_IO_THREADS", "6");
    std::env::set_var("TEXTDUPE_FOLLOW_SYMLINKS", "true");
    let config = Config::load_layers(None, dir.path(), None);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.io_threads, 6);
    assert!(config.follow_symlinks);
}

#[test]
fn test_cli_overrides_everything() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".textdupe.toml"),
        "min_lines = 4\nignore = [\"drafts/\"]\n",
    )
    .unwrap();
    std::env::set_var("TEXTDUPE_MIN_LINES", "6");

    let root = dir.path().to_str().unwrap();
    let args = check_args(&[root, "--min-lines", "2", "-i", "archive/"]);
    let config = Config::resolve(&args);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.min_lines, 2);
    assert_eq!(config.ignore, vec!["drafts/", "archive/"]);
}

#[test]
fn test_missing_explicit_file_is_load_error() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = Config::load_layers(None, dir.path(), Some(&missing));
    match result {
        Err(ConfigError::Load(e)) => assert!(e.to_string().contains("nope.toml")),
        other => panic!("Expected Load error, got {:?}", other),
    }
}

#[test]
fn test_wrong_types_are_load_errors() {
    let _env = lock_env();

    for content in [
        "min_chars = -1\n",
        "failure_threshold = \"high\"\n",
        "line_counting = \"words\"\n",
        "min_lines = [\n",
    ] {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".textdupe.toml"), content).unwrap();
        let result = Config::load_layers(None, dir.path(), None);
        assert!(
            matches!(result, Err(ConfigError::Load(_))),
            "expected load error for {content:?}, got {result:?}"
        );
    }
}

#[test]
fn test_out_of_range_values_are_invalid() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".textdupe.toml"), "min_lines = 0\n").unwrap();

    let root = dir.path().to_str().unwrap();
    let result = Config::resolve(&check_args(&[root]));
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            field: "min_lines",
            ..
        })
    ));

    // A CLI value can repair an invalid file value before validation runs.
    let config = Config::resolve(&check_args(&[root, "--min-lines", "3"])).unwrap();
    assert_eq!(config.min_lines, 3);
}

#[test]
fn test_unknown_keys_do_not_fail_load() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".textdupe.toml"),
        "min_line = 7\nmin_chars = 12\n",
    )
    .unwrap();

    let config = Config::load_layers(None, dir.path(), None).unwrap();
    assert_eq!(config.min_lines, 3);
    assert_eq!(config.min_chars, 12);

    let unknown = textdupe::config::unknown_keys(&dir.path().join(".textdupe.toml"));
    assert_eq!(unknown, vec![("min_line".to_string(), Some("min_lines"))]);
}

#[test]
fn test_written_default_round_trips_through_loader() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    Config::write_default(&dir.path().join(".textdupe.toml"), false).unwrap();

    let config = Config::load_layers(None, dir.path(), None).unwrap();
    assert_eq!(config, Config::default());
}
