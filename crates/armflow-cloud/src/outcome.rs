//! Normalized outcome of a single accessor call
//!
//! Every accessor returns either the provider model or a [`Failure`], which
//! serializes as `{"error": "<message>"}`. Not-found, remote rejection and
//! request-build failures share that shape; [`FailureKind`] is kept only for
//! logging and diagnostics.

use crate::error::ArmError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

pub type Outcome<T> = std::result::Result<T, Failure>;

/// Where a failure originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No usable credentials were supplied
    Configuration,
    /// The remote side reported that the resource does not exist
    NotFound,
    /// The remote side rejected the call (or the transport failed)
    RemoteRejection,
    /// The request model could not be built locally
    RequestBuild,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Configuration => write!(f, "configuration"),
            FailureKind::NotFound => write!(f, "not-found"),
            FailureKind::RemoteRejection => write!(f, "remote-rejection"),
            FailureKind::RequestBuild => write!(f, "request-build"),
        }
    }
}

/// The `{error}` half of a normalized outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FailureKind::NotFound
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {}

impl From<ArmError> for Failure {
    fn from(err: ArmError) -> Self {
        let kind = match &err {
            ArmError::MissingCredentials | ArmError::InvalidCredentials(_) => {
                FailureKind::Configuration
            }
            ArmError::RequestBuild(_) => FailureKind::RequestBuild,
            e if e.is_not_found() => FailureKind::NotFound,
            _ => FailureKind::RemoteRejection,
        };
        Failure::new(kind, err.to_string())
    }
}

impl Serialize for Failure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("error", &self.message)?;
        map.end()
    }
}

/// Render an outcome the way callers see it: the model itself, or `{error}`
pub fn to_value<T: Serialize>(outcome: &Outcome<T>) -> serde_json::Value {
    let rendered = match outcome {
        Ok(value) => serde_json::to_value(value),
        Err(failure) => serde_json::to_value(failure),
    };
    rendered.unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
}
