//! Error types for gfd-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from gfd-core
    #[error(transparent)]
    Core(#[from] gfd_core::Error),

    /// Report serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

impl From<gfd_core::ConfigError> for CliError {
    fn from(err: gfd_core::ConfigError) -> Self {
        Self::Core(err.into())
    }
}

impl From<gfd_api::Error> for CliError {
    fn from(err: gfd_api::Error) -> Self {
        Self::Core(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_error_keeps_core_message() {
        let err: CliError = gfd_core::ConfigError {
            missing: vec!["token"],
            conflicts: Vec::new(),
        }
        .into();
        assert!(matches!(err, CliError::Core(_)));
        assert_eq!(err.to_string(), "Invalid configuration: missing token");
    }

    #[test]
    fn user_error_is_displayed_verbatim() {
        assert_eq!(
            CliError::user("2 of 5 items failed").to_string(),
            "2 of 5 items failed"
        );
    }
}
