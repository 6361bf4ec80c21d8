//! Provider models and typed request parameters
//!
//! Models are the "field mapping" view of a remote object: snake_case keys
//! with the ARM `properties` envelope flattened away. Request parameter
//! types validate themselves before anything is dispatched.

pub mod compute;
pub mod postgresql;
pub mod resource_group;
pub mod storage;

use crate::error::{ArmError, Result};
use std::collections::BTreeMap;

pub use compute::{VirtualMachineExtension, VmExtensionParams, VmExtensionRef};
pub use postgresql::{
    CreateMode, Enablement, PostgresServer, PostgresServerCreate, PostgresServerUpdate,
    ServerRef, ServerVersion, Sku, StorageProfile,
};
pub use resource_group::{ResourceGroup, ResourceGroupParams, ResourceGroupProperties};
pub use storage::{
    BlobContainer, ContainerParams, ContainerRef, ImmutabilityPolicy, ImmutabilityPolicyParams,
    LeaseAction, LeaseContainerResponse, LeaseRequest, LegalHold, LegalHoldTags, PublicAccess,
};

/// Resource tags / container metadata
pub type Tags = BTreeMap<String, String>;

/// Build a request-build error for a field
pub(crate) fn invalid(field: &str, reason: impl std::fmt::Display) -> ArmError {
    ArmError::request_build(format!("{}: {}", field, reason))
}

/// Require a non-blank string value
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Require a length within `min..=max` characters
pub(crate) fn require_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(invalid(
            field,
            format!("'{}' must be between {} and {} characters", value, min, max),
        ));
    }
    Ok(())
}
