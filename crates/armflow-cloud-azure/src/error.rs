//! Azure REST client error types

use armflow_cloud::ArmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzureError {
    #[error("token request failed: {0}")]
    TokenRequest(String),

    #[error("{code} ({status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("polling {0} did not finish in time")]
    PollTimeout(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AzureError> for ArmError {
    fn from(err: AzureError) -> Self {
        match err {
            AzureError::TokenRequest(message) => ArmError::AuthenticationFailed(message),
            AzureError::Api {
                status,
                code,
                message,
            } => ArmError::rejected(status, code, message),
            AzureError::InvalidResponse(message) => ArmError::Serialization(message),
            AzureError::PollTimeout(url) => ArmError::Timeout(url),
            AzureError::Http(e) => ArmError::Http(e.to_string()),
            AzureError::Json(e) => ArmError::Json(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AzureError>;
