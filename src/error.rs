use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which key ended an interactive session early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Escape,
    Interrupt,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Escape => write!(f, "escape key"),
            CancelReason::Interrupt => write!(f, "interrupt"),
        }
    }
}

/// Unified error type for dist-publish operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version format: '{0}'")]
    InvalidVersionFormat(String),

    #[error("Source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Manifest unreadable at {}: {reason}", .path.display())]
    ManifestUnreadable { path: PathBuf, reason: String },

    #[error("Command `{command}` failed with exit code {exit_code}")]
    CommandFailed { exit_code: i32, command: String },

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Cancelled by user ({0})")]
    UserCancelled(CancelReason),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in dist-publish
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a manifest error for the given path
    pub fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ReleaseError::ManifestUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a version format error
    pub fn version(raw: impl Into<String>) -> Self {
        ReleaseError::InvalidVersionFormat(raw.into())
    }

    /// Returns the cancel reason when this error is a user abort.
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            ReleaseError::UserCancelled(reason) => Some(*reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_command_failed_names_command() {
        let err = ReleaseError::CommandFailed {
            exit_code: 2,
            command: "npm publish".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command `npm publish` failed with exit code 2"
        );
    }

    #[test]
    fn test_source_missing_shows_path() {
        let err = ReleaseError::SourceMissing(PathBuf::from("/tmp/project/dist"));
        assert!(err.to_string().contains("/tmp/project/dist"));
    }

    #[test]
    fn test_cancel_reason() {
        let err = ReleaseError::UserCancelled(CancelReason::Interrupt);
        assert_eq!(err.cancel_reason(), Some(CancelReason::Interrupt));
        assert!(err.to_string().contains("interrupt"));
        assert_eq!(ReleaseError::version("x").cancel_reason(), None);
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::version("x"), "Invalid version format"),
            (ReleaseError::manifest("package.json", "x"), "Manifest unreadable"),
            (ReleaseError::CommandNotFound("npm".into()), "Command not found"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
