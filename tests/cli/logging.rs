//! Logging and verbosity tests.

use crate::support::*;

#[test]
fn test_unknown_log_level_warns() {
    let t = Test::new().env("LOG_LEVEL", "chatty");

    let output = t.run(&["true"]);
    assert_success(&output);
    assert_stderr_contains(&output, "unknown log level, defaulting to info");
}

#[test]
fn test_error_level_hides_unresolved_warning() {
    let t = Test::new()
        .env("LOG_LEVEL", "error")
        .env("X", "secretfrom:nowhere:thing");

    let output = t.run(&["true"]);
    assert_success(&output);
    assert_stderr_excludes(&output, "env not resolved");
}

#[test]
fn test_verbose_flag_shows_debug_output() {
    let output = Test::new().run(&["--verbose", "true"]);
    assert_success(&output);
    assert_stderr_contains(&output, "loading");
}

#[test]
fn test_debug_level_from_env() {
    let t = Test::new().env("LOG_LEVEL", "debug");

    let output = t.run(&["true"]);
    assert_success(&output);
    assert_stderr_contains(&output, "loading");
}

#[test]
fn test_default_has_no_debug_output() {
    let output = Test::new().run(&["true"]);
    assert_success(&output);
    assert_stderr_excludes(&output, "DEBUG");
}

#[test]
fn test_successful_load_is_silent() {
    let t = Test::new().env("PLAIN", "value");

    let output = t.run(&["true"]);
    assert_success(&output);
    assert!(stderr(&output).is_empty(), "unexpected stderr: {}", stderr(&output));
}

#[test]
fn test_verbose_reports_summary() {
    let output = Test::new().run(&["--verbose", "true"]);
    assert_success(&output);
    assert_stderr_contains(&output, "secrets loaded");
}

#[test]
fn test_json_log_format() {
    let t = Test::new()
        .env("SECRETFROM_LOG_FORMAT", "json")
        .env("X", "secretfrom:nowhere:thing");

    let output = t.run(&["true"]);
    assert_success(&output);
    assert_stderr_contains(&output, r#""message":"env not resolved""#);
}

#[test]
fn test_log_filter_override() {
    let t = Test::new()
        .env("SECRETFROM_LOG", "off")
        .env("X", "secretfrom:nowhere:thing");

    let output = t.run(&["true"]);
    assert_success(&output);
    assert!(stderr(&output).is_empty());
}
