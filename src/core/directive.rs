//! Secret directives.
//!
//! A directive is an environment entry whose value reads
//! `secretfrom:<backend type>:<args>`. Directives are parsed once per load
//! pass, filled in by exactly one resolver, then written back by the loader.

use std::fmt;

use zeroize::Zeroizing;

use crate::core::constants::{DIRECTIVE_PREFIX, DIRECTIVE_SEPARATOR, NESTED_SEPARATOR};
use crate::core::types::{BackendType, EnvKey, Identifier};
use crate::error::DirectiveError;

/// A parsed placeholder awaiting resolution.
#[derive(Clone, PartialEq, Eq)]
pub struct Directive {
    key: EnvKey,
    backend: BackendType,
    args: Identifier,
    value: Zeroizing<String>,
    resolved: bool,
}

impl Directive {
    /// Create an unresolved directive.
    pub fn new(
        key: impl Into<EnvKey>,
        backend: impl Into<BackendType>,
        args: impl Into<Identifier>,
    ) -> Self {
        Self {
            key: key.into(),
            backend: backend.into(),
            args: args.into(),
            value: Zeroizing::new(String::new()),
            resolved: false,
        }
    }

    /// Target environment variable name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backend type tag used for routing.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Backend-specific locator, including any nested key path.
    pub fn args(&self) -> &str {
        &self.args
    }

    /// Locator up to the first `.`.
    pub fn base_identifier(&self) -> &str {
        base_identifier(&self.args)
    }

    /// Locator after the first `.`, if any.
    pub fn nested_key(&self) -> Option<&str> {
        self.args
            .split_once(NESTED_SEPARATOR)
            .map(|(_, nested)| nested)
    }

    /// Resolved value, empty until a resolver assigns one.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether a resolver assigned a value.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Assign the fetched value and mark the directive resolved.
    pub fn resolve(&mut self, value: impl Into<String>) {
        self.value = Zeroizing::new(value.into());
        self.resolved = true;
    }
}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directive")
            .field("key", &self.key)
            .field("backend", &self.backend)
            .field("args", &self.args)
            .field("value", &"<redacted>")
            .field("resolved", &self.resolved)
            .finish()
    }
}

/// Locator up to the first `.`, or the whole locator.
pub fn base_identifier(args: &str) -> &str {
    args.split_once(NESTED_SEPARATOR)
        .map_or(args, |(base, _)| base)
}

/// Extract directives from raw `KEY=VALUE` entries, in encounter order.
///
/// Entries whose value does not start with `secretfrom` are ordinary
/// variables and produce nothing.
///
/// # Errors
///
/// `MalformedEnvEntry` if an entry has no `=`, `MalformedSecretDirective` if
/// a prefixed value has fewer than three `:`-separated parts.
pub fn parse_envs<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Directive>, DirectiveError> {
    let mut directives = Vec::new();

    for entry in entries {
        let entry = entry.as_ref();
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| DirectiveError::MalformedEnvEntry(entry.to_string()))?;

        if !is_directive(value) {
            continue;
        }

        let mut parts = value.splitn(3, DIRECTIVE_SEPARATOR);
        let (Some(_prefix), Some(backend), Some(args)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(DirectiveError::MalformedSecretDirective {
                key: key.to_string(),
            });
        };

        directives.push(Directive::new(key, backend, args));
    }

    Ok(directives)
}

/// Whether a value starts with the reserved `secretfrom` token.
///
/// The token alone is enough: `secretfrom` and `secretfromX` are claimed as
/// directives and then rejected by the part count.
pub fn is_directive(value: &str) -> bool {
    value.starts_with(DIRECTIVE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_directive() {
        let directives = parse_envs(&["X=secretfrom:aws_ssm:/app/db"]).unwrap();

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].key(), "X");
        assert_eq!(directives[0].backend(), "aws_ssm");
        assert_eq!(directives[0].args(), "/app/db");
        assert_eq!(directives[0].value(), "");
        assert!(!directives[0].is_resolved());
    }

    #[test]
    fn test_parse_skips_plain_values() {
        let directives = parse_envs(&["HOME=/root", "PATH=/usr/bin:/bin", "EMPTY="]).unwrap();
        assert!(directives.is_empty());
    }

    #[test]
    fn test_parse_keeps_encounter_order() {
        let directives = parse_envs(&[
            "B=secretfrom:kv:second",
            "PLAIN=value",
            "A=secretfrom:kv:first",
        ])
        .unwrap();

        let keys: Vec<_> = directives.iter().map(Directive::key).collect();
        assert_eq!(keys, vec!["B", "A"]);
    }

    #[test]
    fn test_parse_args_may_contain_colons() {
        let directives =
            parse_envs(&["URL=secretfrom:aws_s3:s3://bucket/path/config.json"]).unwrap();
        assert_eq!(directives[0].args(), "s3://bucket/path/config.json");
    }

    #[test]
    fn test_parse_value_may_contain_equals() {
        let directives = parse_envs(&["K=secretfrom:kv:a=b"]).unwrap();
        assert_eq!(directives[0].key(), "K");
        assert_eq!(directives[0].args(), "a=b");
    }

    #[test]
    fn test_parse_missing_equals() {
        let err = parse_envs(&["NOEQUALS"]).unwrap_err();
        assert_eq!(err, DirectiveError::MalformedEnvEntry("NOEQUALS".to_string()));
    }

    #[test]
    fn test_parse_too_few_parts() {
        let err = parse_envs(&["X=secretfrom:aws_ssm"]).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::MalformedSecretDirective {
                key: "X".to_string()
            }
        );
    }

    #[test]
    fn test_parse_malformed_aborts_whole_batch() {
        let result = parse_envs(&["GOOD=secretfrom:kv:id", "BAD=secretfrom:kv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_prefix_token_alone_is_directive() {
        assert!(is_directive("secretfrom:kv:x"));
        assert!(is_directive("secretfrom"));
        assert!(is_directive("secretfromage"));
        assert!(!is_directive("prefix secretfrom:kv:x"));
        assert!(!is_directive("SECRETFROM:kv:x"));
    }

    #[test]
    fn test_bare_prefix_is_malformed() {
        let err = parse_envs(&["X=secretfrom"]).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::MalformedSecretDirective {
                key: "X".to_string()
            }
        );
    }

    #[test]
    fn test_prefix_without_separator_is_malformed() {
        let err = parse_envs(&["X=secretfromage"]).unwrap_err();
        assert!(matches!(err, DirectiveError::MalformedSecretDirective { .. }));
    }

    #[test]
    fn test_glued_prefix_still_splits_on_colons() {
        let directives = parse_envs(&["X=secretfromaws:aws_ssm:/p"]).unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].backend(), "aws_ssm");
        assert_eq!(directives[0].args(), "/p");
    }

    #[test]
    fn test_empty_backend_and_args_are_kept() {
        let directives = parse_envs(&["X=secretfrom::"]).unwrap();
        assert_eq!(directives[0].backend(), "");
        assert_eq!(directives[0].args(), "");
    }

    #[test]
    fn test_base_identifier_and_nested_key() {
        let directive = Directive::new("Y", "kv", "mysecret.inner.deep");
        assert_eq!(directive.base_identifier(), "mysecret");
        assert_eq!(directive.nested_key(), Some("inner.deep"));

        let plain = Directive::new("Z", "kv", "mysecret");
        assert_eq!(plain.base_identifier(), "mysecret");
        assert_eq!(plain.nested_key(), None);
    }

    #[test]
    fn test_resolve_sets_value_and_flag() {
        let mut directive = Directive::new("X", "kv", "id");
        directive.resolve("hello");
        assert!(directive.is_resolved());
        assert_eq!(directive.value(), "hello");
    }

    #[test]
    fn test_debug_redacts_value() {
        let mut directive = Directive::new("X", "kv", "id");
        directive.resolve("hunter2");
        let debug = format!("{:?}", directive);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
