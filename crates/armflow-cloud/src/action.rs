//! Planned actions for a single reconciliation

use serde::{Deserialize, Serialize};

/// What a reconciler is about to do to one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
    /// No changes needed
    NoOp,
}

impl ActionType {
    /// Action that converges toward "present"
    ///
    /// `exists` is whether the fetch succeeded, `differs` whether the fetched
    /// state differs from the desired one.
    pub fn for_present(exists: bool, differs: bool) -> Self {
        match (exists, differs) {
            (false, _) => ActionType::Create,
            (true, true) => ActionType::Update,
            (true, false) => ActionType::NoOp,
        }
    }

    /// Action that converges toward "absent"
    pub fn for_absent(exists: bool) -> Self {
        if exists {
            ActionType::Delete
        } else {
            ActionType::NoOp
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, ActionType::NoOp)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}
