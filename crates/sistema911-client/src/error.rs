//! Error taxonomy shared by the fetch wrapper, the API client and the stores

use crate::session::IdentityError;

/// Errors returned by every client operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No session credential; raised before any network call
    #[error("No hay usuario autenticado")]
    Unauthenticated,

    /// Non-2xx response
    #[error("{message}")]
    Http { status: u16, message: String },

    /// `{"success": false}` envelope, whatever the status
    #[error("{0}")]
    Application(String),

    #[error("error de red: {0}")]
    Transport(String),

    #[error("respuesta inesperada del servidor: {0}")]
    Decode(String),

    /// Local input validation; nothing was sent
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("configuración inválida: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status, when the server answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message to show, or `fallback` when the error carries none
    pub fn display_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
