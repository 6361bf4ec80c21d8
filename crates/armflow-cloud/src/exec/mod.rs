//! Resource accessors
//!
//! One function per remote operation. Each validates its typed request,
//! performs exactly one call on the [`crate::ManagementClient`] and
//! normalizes the result: the model on success, a [`crate::Failure`]
//! otherwise. Nothing here panics or lets a provider error escape.

pub mod postgresql_server;
pub mod resource_group;
pub mod storage_container;
pub mod vm_extension;

use crate::error::Result;
use crate::outcome::{Failure, Outcome};
use std::collections::BTreeMap;

/// Convert a client result into an outcome, logging failures
pub(crate) fn normalize<T>(service: &str, operation: &str, result: Result<T>) -> Outcome<T> {
    result.map_err(|err| {
        let failure = Failure::from(err);
        log_failure(service, operation, &failure);
        failure
    })
}

/// Boolean-returning operations (deletes, restarts)
pub(crate) fn succeeded<T>(service: &str, operation: &str, result: Result<T>) -> bool {
    normalize(service, operation, result).is_ok()
}

/// Reject a request before dispatch
pub(crate) fn check(service: &str, operation: &str, validation: Result<()>) -> Outcome<()> {
    normalize(service, operation, validation)
}

/// `list` results keyed by resource name
pub(crate) fn keyed<T>(items: Vec<T>, name: impl Fn(&T) -> &str) -> BTreeMap<String, T> {
    items
        .into_iter()
        .map(|item| (name(&item).to_string(), item))
        .collect()
}

/// Not-found is expected during reconciliation, so it is logged quietly
fn log_failure(service: &str, operation: &str, failure: &Failure) {
    if failure.is_not_found() {
        tracing::info!(service, operation, kind = %failure.kind, "{}", failure.message);
    } else {
        tracing::error!(service, operation, kind = %failure.kind, "{}", failure.message);
    }
}
