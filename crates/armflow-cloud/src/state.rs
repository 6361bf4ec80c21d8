//! Reconciliation results
//!
//! A [`StateResult`] is produced fresh by every `present`/`absent` call and
//! serializes as `{name, result, comment, changes}` where `result` is
//! `true`, `false` or `null` (dry-run preview) and `changes` is either `{}`
//! or `{old, new}`.

use crate::diff::Change;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state verdict of a reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Verdict {
    /// Converged, either already in the desired state or changed into it
    Success,
    /// A remote call or the configuration failed
    Failure,
    /// Dry-run preview; nothing was mutated
    Pending,
}

impl From<Verdict> for Option<bool> {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Success => Some(true),
            Verdict::Failure => Some(false),
            Verdict::Pending => None,
        }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Verdict::Success,
            Some(false) => Verdict::Failure,
            None => Verdict::Pending,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Success => write!(f, "True"),
            Verdict::Failure => write!(f, "False"),
            Verdict::Pending => write!(f, "None"),
        }
    }
}

/// Result of one `present`/`absent` invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateResult {
    pub name: String,
    pub result: Verdict,
    pub comment: String,
    #[serde(with = "changes_serde")]
    pub changes: Option<Change>,
}

impl StateResult {
    /// A fresh result; failure until proven otherwise
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: Verdict::Failure,
            comment: String::new(),
            changes: None,
        }
    }

    pub fn succeed(mut self, comment: impl Into<String>) -> Self {
        self.result = Verdict::Success;
        self.comment = comment.into();
        self
    }

    pub fn fail(mut self, comment: impl Into<String>) -> Self {
        self.result = Verdict::Failure;
        self.comment = comment.into();
        self
    }

    pub fn preview(mut self, comment: impl Into<String>) -> Self {
        self.result = Verdict::Pending;
        self.comment = comment.into();
        self
    }

    pub fn with_changes(mut self, change: Change) -> Self {
        self.changes = Some(change);
        self
    }

    pub fn without_changes(mut self) -> Self {
        self.changes = None;
        self
    }

    pub fn is_success(&self) -> bool {
        self.result == Verdict::Success
    }

    pub fn is_failure(&self) -> bool {
        self.result == Verdict::Failure
    }
}

mod changes_serde {
    use crate::diff::Change;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        changes: &Option<Change>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match changes {
            Some(change) => change.serialize(serializer),
            None => serde_json::Map::new().serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Change>, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Object(ref map) if map.is_empty() => Ok(None),
            serde_json::Value::Null => Ok(None),
            other => serde_json::from_value(other)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
