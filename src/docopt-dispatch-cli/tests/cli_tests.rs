//! End-to-end tests for the `docopt-dispatch` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = match Command::cargo_bin("docopt-dispatch") {
        Ok(cmd) => cmd,
        Err(e) => panic!("binary not built: {e}"),
    };
    cmd.env_remove("RUST_LOG")
        .env_remove("DOCOPT_DISPATCH_LOG_LEVEL")
        .env_remove("DOCOPT_DISPATCH_JOBS")
        .env_remove("DOCOPT_DISPATCH_PROFILE");
    cmd
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_no_arguments_prints_root_help() {
    cli()
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Demonstrates recursive command dispatch."))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("build   Build a target"));
}

#[test]
fn test_help_flag_prints_root_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("docopt-dispatch [options] [COMMAND] [ARGS...]"));
}

#[test]
fn test_help_for_leaf_command() {
    cli()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Build a target."))
        .stdout(predicate::str::contains("--jobs=<n>"));
}

#[test]
fn test_nested_class_without_command_prints_its_help() {
    cli()
        .arg("remote")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage remotes."));
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_build_prints_options_as_json() {
    cli()
        .args(["build", "--release", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""command": "build""#))
        .stdout(predicate::str::contains(r#""--release": true"#))
        .stdout(predicate::str::contains(r#""<target>": "app""#));
}

#[test]
fn test_root_options_reach_the_handler() {
    cli()
        .args(["--verbose", "config", "core.editor", "vim"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""--verbose": true"#))
        .stdout(predicate::str::contains(r#""<value>": "vim""#));
}

#[test]
fn test_nested_remote_add() {
    cli()
        .args(["remote", "add", "origin", "https://example.com/repo.git"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""command": "remote add""#))
        .stdout(predicate::str::contains(r#""<name>": "origin""#))
        .stdout(predicate::str::contains(
            r#""<url>": "https://example.com/repo.git""#,
        ));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unknown_command_lists_commands() {
    cli()
        .arg("frobnicate")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No such command: frobnicate"))
        .stderr(predicate::str::contains("remote  Manage remotes"));
}

#[test]
fn test_unknown_nested_command() {
    cli()
        .args(["remote", "frob"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No such command: frob"))
        .stderr(predicate::str::contains("list    List remotes"));
}

#[test]
fn test_undocumented_method_is_unknown() {
    cli()
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No such command: self-check"));
}

#[test]
fn test_usage_mismatch_exits_with_failure() {
    cli()
        .args(["build", "--bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("build [options] [<target>]"));
}

#[test]
fn test_handler_error_exits_with_failure() {
    cli()
        .args(["config", "--unset"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--unset needs a <key>"));
}

// ============================================================================
// Environment
// ============================================================================

#[test]
fn test_environment_fills_unset_option() {
    cli()
        .args(["build", "app"])
        .env("DOCOPT_DISPATCH_JOBS", "4")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""--jobs": "4""#));
}

#[test]
fn test_command_line_beats_environment() {
    cli()
        .args(["build", "--jobs=2", "app"])
        .env("DOCOPT_DISPATCH_JOBS", "4")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""--jobs": "2""#));
}

#[test]
fn test_environment_replaces_default() {
    cli()
        .arg("build")
        .env("DOCOPT_DISPATCH_PROFILE", "release")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""--profile": "release""#));
}

#[test]
fn test_default_applies_without_environment() {
    cli()
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""--profile": "dev""#));
}
