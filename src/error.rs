//! Error taxonomy for a status run.
//!
//! None of these originate in the aggregation engine itself: records that
//! cannot be classified are simply dropped.

/// Failures a status run can report.
#[derive(Debug)]
pub enum StatusError {
    /// The index for a repository could not be downloaded or opened.
    Fetch { repository: String, message: String },
    /// The index archive for a repository is malformed.
    Decode { repository: String, message: String },
    /// A `--regex` query is not a valid regular expression.
    InvalidPattern { pattern: String, message: String },
    /// A non-public repository is configured but no credential was given.
    AuthRequired,
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusError::Fetch {
                repository,
                message,
            } => {
                write!(f, "failed to fetch {} index: {}", repository, message)
            }
            StatusError::Decode {
                repository,
                message,
            } => {
                write!(
                    f,
                    "failed to read {} index archive: {}",
                    repository, message
                )
            }
            StatusError::InvalidPattern { pattern, message } => {
                write!(
                    f,
                    "failed to parse regexp from input query {}: {}",
                    pattern, message
                )
            }
            StatusError::AuthRequired => {
                write!(
                    f,
                    "An auth token is required for non public repositories. \
                     Use `chainctl auth token --audience apk.cgr.dev` to get one and pass it \
                     via --auth-token or the HTTP_AUTH environment variable."
                )
            }
        }
    }
}

impl std::error::Error for StatusError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = StatusError::Fetch {
            repository: "wolfi".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch wolfi index: connection refused"
        );

        let err = StatusError::Decode {
            repository: "local".to_string(),
            message: "invalid gzip header".to_string(),
        };
        assert!(err.to_string().contains("local index archive"));

        let err = StatusError::InvalidPattern {
            pattern: "python-(".to_string(),
            message: "unclosed group".to_string(),
        };
        assert!(err.to_string().contains("python-("));

        assert!(StatusError::AuthRequired.to_string().contains("HTTP_AUTH"));
    }

    #[test]
    fn test_status_error_downcast_through_anyhow() {
        let err = anyhow::Error::from(StatusError::AuthRequired);
        assert!(matches!(
            err.downcast_ref::<StatusError>(),
            Some(StatusError::AuthRequired)
        ));
    }
}
