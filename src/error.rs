//! Error types for the sync layer.

use thiserror::Error;

/// Message shown when the server gives no usable explanation.
pub const GENERIC_FAILURE: &str = "The operation could not be completed. Please try again.";

/// Why an authenticated request was refused before or during flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No token stored, or the stored token was rejected by the pre-flight probe.
    NoSession,
    /// The server answered 401 to a request made with a token that had just
    /// been validated.
    SessionExpired,
}

impl AuthFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSession => "no session",
            Self::SessionExpired => "session expired",
        }
    }
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the key/value storage that backs the credential store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("could not determine a data directory for session storage")]
    NoDataDir,
}

/// Sync layer errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("authentication required: {0}")]
    Authentication(AuthFailure),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Application {
        /// HTTP status, when the failure came with one.
        status: Option<u16>,
        message: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SyncError {
    pub fn application(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Application {
            status,
            message: message.into(),
        }
    }

    /// Whether the host should send the operator back to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Text suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(_) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Transport(_) => GENERIC_FAILURE.to_string(),
            Self::Application { message, .. } => message.clone(),
            Self::Storage(e) => format!("Could not access session storage: {}", e),
        }
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
