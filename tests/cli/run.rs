//! Tests for running a command under `secretfrom`.

use crate::support::*;

#[test]
fn test_run_passes_plain_env_through() {
    let t = Test::new().env("PLAIN", "hello");

    let output = t.sh(r#"printf '%s' "$PLAIN""#);
    assert_success(&output);
    assert_eq!(stdout(&output), "hello");
}

#[test]
fn test_run_unresolved_directive_is_empty_but_defined() {
    let t = Test::new().env("X", "secretfrom:nowhere:thing");

    let output = t.sh(r#"printf '[%s]' "${X-unset}""#);
    assert_success(&output);
    assert_eq!(stdout(&output), "[]");
    assert_stderr_contains(&output, "env not resolved");
}

#[test]
fn test_run_exit_code_passthrough() {
    let output = Test::new().sh("exit 42");
    assert_exit_code(&output, 42);
}

#[test]
fn test_run_forwards_hyphenated_args() {
    let output = Test::new().run(&["sh", "-c", r#"printf '%s' "$1""#, "sh", "--flag"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "--flag");
}

#[test]
fn test_run_with_no_directives_is_quiet() {
    let output = Test::new().run(&["echo", "hello"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "hello");
    assert_stderr_excludes(&output, "WARN");
}
