//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The API answered 401 or 403. Callers must not retry.
    #[error("Authentication required")]
    AuthRequired,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation already in progress: {0}")]
    InFlight(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text shown to the user on the notifier.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired => {
                "Authentication required. You will be redirected to the login page.".to_string()
            }
            Self::Http { message, .. } => message.clone(),
            Self::Network(_) => "Could not communicate with the server.".to_string(),
            Self::Validation(message) | Self::NotFound(message) | Self::InFlight(message) => {
                message.clone()
            }
            Self::Serialization(_) => "The server sent an unreadable response.".to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}
