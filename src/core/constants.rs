//! Constants used throughout secretfrom.
//!
//! Centralizes magic strings and configuration values.

/// Token that marks an environment value as a secret reference.
///
/// Full form: `secretfrom:<backend type>:<args>`.
pub const DIRECTIVE_PREFIX: &str = "secretfrom";

/// Separator between the prefix, backend type and args.
pub const DIRECTIVE_SEPARATOR: char = ':';

/// Separator between a base identifier and a nested key path.
pub const NESTED_SEPARATOR: char = '.';

/// Backend type tag for AWS Secrets Manager.
pub const AWS_SECRETS_MANAGER: &str = "aws_secretsmanager";

/// Backend type tag for AWS Systems Manager Parameter Store.
pub const AWS_SSM: &str = "aws_ssm";

/// Backend type tag for AWS S3 objects.
pub const AWS_S3: &str = "aws_s3";

/// Backend type tag for Google Cloud Secret Manager.
pub const GOOGLE_SECRET_MANAGER: &str = "google_secretmanager";

/// Log verbosity (debug, info, warn, error).
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Full `EnvFilter` directive override.
pub const LOG_FILTER_VAR: &str = "SECRETFROM_LOG";

/// Log output format (`json` or anything else for plain text).
pub const LOG_FORMAT_VAR: &str = "SECRETFROM_LOG_FORMAT";

/// Load deadline in whole seconds.
pub const TIMEOUT_VAR: &str = "SECRETFROM_TIMEOUT";
