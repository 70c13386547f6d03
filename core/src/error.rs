//! Error types for command parsing and dispatch.
//!
//! Parsing can fail in two distinct ways. A [`UsageError`] is a mistake in
//! the user's input (an unrecognised switch) and carries enough context for
//! the caller to print help. A malformed switch is a lower-level failure and
//! gets its own variant rather than being folded into usage errors.

use std::fmt;

use thiserror::Error;

/// A user-facing input mistake detected while parsing.
///
/// Carries the name and rendered help of the command that raised it, so a
/// caller can print a message followed by usage without holding on to the
/// command instance itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError {
    message: String,
    command: String,
    help: String,
}

impl UsageError {
    pub fn new(
        message: impl Into<String>,
        command: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            command: command.into(),
            help: help.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the command that raised the error.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Help text of the command that raised the error.
    pub fn help(&self) -> &str {
        &self.help
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for UsageError {}

/// Errors that can occur while declaring, parsing or running a command.
#[derive(Debug, Error)]
pub enum Error {
    /// The user supplied input the command can't accept.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// A token starting with `-` that is neither `--` nor a switch.
    #[error("can't handle {0}")]
    MalformedSwitch(String),

    /// The command does not implement `execute`.
    #[error("{0}: you need to define execute")]
    NotImplemented(String),

    /// File I/O failure while loading or saving a definition.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Definition file extension is not one of `json`, `yaml` or `yml`.
    #[error("unsupported definition format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Returns the usage error, if this is one.
    pub fn as_usage(&self) -> Option<&UsageError> {
        match self {
            Self::Usage(usage) => Some(usage),
            _ => None,
        }
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_displays_message_only() {
        let err = Error::from(UsageError::new(
            "Unrecognised option '--bogus'",
            "demo",
            "Usage:\n    demo\n",
        ));
        assert_eq!(err.to_string(), "Unrecognised option '--bogus'");
        let usage = err.as_usage().unwrap();
        assert_eq!(usage.command(), "demo");
        assert!(usage.help().starts_with("Usage:"));
    }

    #[test]
    fn test_malformed_switch_is_not_a_usage_error() {
        let err = Error::MalformedSwitch("-=".into());
        assert!(err.as_usage().is_none());
        assert_eq!(err.to_string(), "can't handle -=");
    }
}
