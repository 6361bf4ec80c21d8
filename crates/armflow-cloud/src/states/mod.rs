//! Reconcilers
//!
//! `present` converges a resource toward its declaration, `absent` removes
//! it. Both fetch live state first and only mutate when it differs; with
//! [`crate::Context::test`] set they stop before any mutating call and report
//! the intended change with a `null` result.
//!
//! Reconcilers never see provider errors as errors: accessors hand back
//! [`crate::Outcome`] values and the reconciler only inspects their shape.

pub mod resource_group;
pub mod storage_container;

use crate::action::ActionType;
use crate::model::Tags;
use serde::Serialize;
use serde_json::Value;

/// Tags/metadata as a JSON mapping; unset is the empty mapping
pub(crate) fn tags_value(tags: Option<&Tags>) -> Value {
    tags.map(to_json).unwrap_or_else(|| Value::Object(Default::default()))
}

/// Models always serialize; a failure is logged and reported as `null`
pub(crate) fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not serialize model for changes");
        Value::Null
    })
}

/// Empty mapping, the `{}` side of a change
pub(crate) fn empty() -> Value {
    Value::Object(Default::default())
}

pub(crate) fn log_plan(kind: &str, name: &str, action: ActionType, test: bool) {
    if action.is_mutation() {
        tracing::info!(kind, name, %action, test, "Reconciling");
    } else {
        tracing::debug!(kind, name, %action, test, "Already converged");
    }
}
