//! API client error types

use thiserror::Error;

/// Errors that can occur when talking to the Uyuni server API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The connection settings are unusable before any request is made
    #[error("Invalid connection settings: {0}")]
    Configuration(String),

    /// The `auth/login` handshake was rejected or failed
    #[error("Login to {server} failed: {message}")]
    Login { server: String, message: String },

    /// The request never produced a usable response
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an error status or a failure envelope
    #[error("Server rejected {path}: {message}")]
    Server { path: String, message: String },

    /// The response body did not match the expected result type
    #[error("Could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn transport(path: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            path: path.into(),
            source,
        }
    }

    pub fn server(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn decode(path: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
