//! Error types raised by management API clients
//!
//! These never cross the accessor boundary: `exec` converts every
//! [`ArmError`] into a [`crate::Failure`] before a reconciler sees it.

use thiserror::Error;

/// Errors produced while talking to the management API
#[derive(Error, Debug)]
pub enum ArmError {
    #[error("Connection information must be specified via acct or connection_auth dictionary!")]
    MissingCredentials,

    #[error("Invalid connection_auth: {0}")]
    InvalidCredentials(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Azure Error: {code}\nMessage: {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("The object model could not be built. ({0})")]
    RequestBuild(String),

    #[error("The object model could not be parsed. ({0})")]
    Serialization(String),

    #[error("Long-running operation did not finish: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArmError {
    pub fn rejected(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        ArmError::Rejected {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn request_build(reason: impl Into<String>) -> Self {
        ArmError::RequestBuild(reason.into())
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            ArmError::NotFound(_) => true,
            ArmError::Rejected { status, .. } => *status == 404,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArmError>;
