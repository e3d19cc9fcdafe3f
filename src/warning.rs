use std::fmt;
use std::path::PathBuf;

/// Secondary problems that happen while recovering from, or finishing, a
/// release. They are reported but never replace the primary outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// The persisted manifest could not be restored to its original version
    RevertFailed { version: String, reason: String },
    /// The staging directory could not be removed
    CleanupFailed { path: PathBuf, reason: String },
    /// A one-time password was requested but none was entered
    EmptyOtp,
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::RevertFailed { version, reason } => write!(
                f,
                "Could not restore manifest version to '{}': {}",
                version, reason
            ),
            ReleaseWarning::CleanupFailed { path, reason } => write!(
                f,
                "Could not remove staging directory '{}': {}",
                path.display(),
                reason
            ),
            ReleaseWarning::EmptyOtp => {
                write!(f, "No one-time password entered, publishing without one")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_failed_message() {
        let w = ReleaseWarning::RevertFailed {
            version: "1.2.3".into(),
            reason: "permission denied".into(),
        };
        assert_eq!(
            w.to_string(),
            "Could not restore manifest version to '1.2.3': permission denied"
        );
    }

    #[test]
    fn test_cleanup_failed_shows_path() {
        let w = ReleaseWarning::CleanupFailed {
            path: PathBuf::from("/p/.publish"),
            reason: "busy".into(),
        };
        assert!(w.to_string().contains("/p/.publish"));
    }
}
