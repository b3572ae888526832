//! Error types for gfd-api

/// Result type for gfd-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the repository API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, TLS or timeout failure before a response arrived
    #[error("Transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status
    #[error(
        "API call to {url} failed: {status_code} {status_text}{}",
        .message.as_deref().map(|m| format!(" ({m})")).unwrap_or_default()
    )]
    Api {
        url: String,
        status_code: u16,
        status_text: String,
        /// `message` field of the server's JSON error body, when present
        message: Option<String>,
    },

    /// Response body or file content was not in the expected shape
    #[error("Failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    /// The request could not be built from the given inputs
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl Error {
    pub fn transport(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn decode(what: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            message: message.to_string(),
        }
    }
}
