//! Blob container accessors

use super::{check, keyed, normalize, succeeded};
use crate::model::storage::{require_if_match, validate_account};
use crate::model::{
    BlobContainer, ContainerParams, ContainerRef, ImmutabilityPolicy, ImmutabilityPolicyParams,
    LeaseContainerResponse, LeaseRequest, LegalHold, LegalHoldTags,
};
use crate::outcome::Outcome;
use crate::provider::ManagementClient;
use std::collections::BTreeMap;

const SERVICE: &str = "storage";

/// Create a container; the resource includes metadata and properties but
/// not the blobs inside it
pub async fn create(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    params: &ContainerParams,
) -> Outcome<BlobContainer> {
    check(SERVICE, "create", container.validate())?;
    normalize(
        SERVICE,
        "create",
        client.blob_containers().create(container, params).await,
    )
}

/// Update container properties; unspecified properties are left alone and
/// the container must already exist
pub async fn update(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    params: &ContainerParams,
) -> Outcome<BlobContainer> {
    check(SERVICE, "update", container.validate())?;
    normalize(
        SERVICE,
        "update",
        client.blob_containers().update(container, params).await,
    )
}

pub async fn get(client: &dyn ManagementClient, container: &ContainerRef) -> Outcome<BlobContainer> {
    check(SERVICE, "get", container.validate())?;
    normalize(SERVICE, "get", client.blob_containers().get(container).await)
}

pub async fn delete(client: &dyn ManagementClient, container: &ContainerRef) -> bool {
    if check(SERVICE, "delete", container.validate()).is_err() {
        return false;
    }
    succeeded(SERVICE, "delete", client.blob_containers().delete(container).await)
}

/// All containers in an account, keyed by name
pub async fn list(
    client: &dyn ManagementClient,
    account: &str,
    resource_group: &str,
) -> Outcome<BTreeMap<String, BlobContainer>> {
    check(SERVICE, "list", validate_account(account, resource_group))?;
    let containers = normalize(
        SERVICE,
        "list",
        client.blob_containers().list(account, resource_group).await,
    )?;
    Ok(keyed(containers, |c| c.name.as_str()))
}

pub async fn get_immutability_policy(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    if_match: Option<&str>,
) -> Outcome<ImmutabilityPolicy> {
    check(SERVICE, "get_immutability_policy", container.validate())?;
    normalize(
        SERVICE,
        "get_immutability_policy",
        client
            .blob_containers()
            .get_immutability_policy(container, if_match)
            .await,
    )
}

/// Create or update an unlocked immutability policy
pub async fn create_or_update_immutability_policy(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    params: &ImmutabilityPolicyParams,
) -> Outcome<ImmutabilityPolicy> {
    let operation = "create_or_update_immutability_policy";
    check(SERVICE, operation, container.validate())?;
    check(SERVICE, operation, params.validate())?;
    normalize(
        SERVICE,
        operation,
        client
            .blob_containers()
            .create_or_update_immutability_policy(container, params)
            .await,
    )
}

/// Abort an unlocked immutability policy; locked policies cannot be deleted
pub async fn delete_immutability_policy(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    if_match: &str,
) -> bool {
    let operation = "delete_immutability_policy";
    if check(SERVICE, operation, container.validate()).is_err()
        || check(SERVICE, operation, require_if_match(if_match)).is_err()
    {
        return false;
    }
    succeeded(
        SERVICE,
        operation,
        client
            .blob_containers()
            .delete_immutability_policy(container, if_match)
            .await,
    )
}

/// Lock an immutability policy; after this only `extend` is allowed
pub async fn lock_immutability_policy(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    if_match: &str,
) -> Outcome<ImmutabilityPolicy> {
    let operation = "lock_immutability_policy";
    check(SERVICE, operation, container.validate())?;
    check(SERVICE, operation, require_if_match(if_match))?;
    normalize(
        SERVICE,
        operation,
        client
            .blob_containers()
            .lock_immutability_policy(container, if_match)
            .await,
    )
}

/// Extend the period of a locked immutability policy
pub async fn extend_immutability_policy(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    days: u32,
    if_match: &str,
) -> Outcome<ImmutabilityPolicy> {
    let operation = "extend_immutability_policy";
    check(SERVICE, operation, container.validate())?;
    check(
        SERVICE,
        operation,
        ImmutabilityPolicyParams::new(days, Some(if_match.to_string())).validate(),
    )?;
    check(SERVICE, operation, require_if_match(if_match))?;
    normalize(
        SERVICE,
        operation,
        client
            .blob_containers()
            .extend_immutability_policy(container, days, if_match)
            .await,
    )
}

/// Append legal hold tags; existing tags not named here are kept
pub async fn set_legal_hold(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    tags: &[String],
) -> Outcome<LegalHold> {
    check(SERVICE, "set_legal_hold", container.validate())?;
    let tags = normalize(SERVICE, "set_legal_hold", LegalHoldTags::new(tags))?;
    normalize(
        SERVICE,
        "set_legal_hold",
        client.blob_containers().set_legal_hold(container, &tags).await,
    )
}

/// Clear only the named legal hold tags
pub async fn clear_legal_hold(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    tags: &[String],
) -> Outcome<LegalHold> {
    check(SERVICE, "clear_legal_hold", container.validate())?;
    let tags = normalize(SERVICE, "clear_legal_hold", LegalHoldTags::new(tags))?;
    normalize(
        SERVICE,
        "clear_legal_hold",
        client
            .blob_containers()
            .clear_legal_hold(container, &tags)
            .await,
    )
}

/// Establish or manage a delete lock on a container
///
/// Returns the model produced by the lease operation itself.
pub async fn lease(
    client: &dyn ManagementClient,
    container: &ContainerRef,
    request: &LeaseRequest,
) -> Outcome<LeaseContainerResponse> {
    check(SERVICE, "lease", container.validate())?;
    check(SERVICE, "lease", request.validate())?;
    normalize(
        SERVICE,
        "lease",
        client.blob_containers().lease(container, request).await,
    )
}
