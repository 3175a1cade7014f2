//! Tests for failure exits.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_malformed_directive_exits_1_without_running() {
    let t = Test::new().env("BAD", "secretfrom:aws_ssm");

    let output = t.sh("echo ran");
    assert_exit_code(&output, 1);
    assert!(!stdout(&output).contains("ran"));
    assert_stderr_contains(&output, "invalid secret directive in BAD");
}

#[test]
fn test_unknown_command_exits_1() {
    Test::new()
        .cmd()
        .arg("secretfrom-no-such-program")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("command not found"));
}

#[test]
fn test_missing_command_is_usage_error() {
    let output = Test::new().run(&[]);
    assert_failure(&output);
}

#[test]
fn test_invalid_timeout_is_rejected() {
    Test::new()
        .cmd()
        .args(["--timeout", "soon", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timeout"));
}

#[test]
fn test_timeout_from_env() {
    let t = Test::new().env("SECRETFROM_TIMEOUT", "30");
    let output = t.run(&["true"]);
    assert_success(&output);
}
