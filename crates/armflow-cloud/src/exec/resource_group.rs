//! Resource group accessors

use super::{check, keyed, normalize, succeeded};
use crate::model::resource_group::validate_group_name;
use crate::model::{ResourceGroup, ResourceGroupParams};
use crate::outcome::Outcome;
use crate::provider::ManagementClient;
use std::collections::BTreeMap;

const SERVICE: &str = "resource";

/// Get a resource group by name
pub async fn get(client: &dyn ManagementClient, name: &str) -> Outcome<ResourceGroup> {
    check(SERVICE, "get", validate_group_name(name))?;
    normalize(SERVICE, "get", client.resource_groups().get(name).await)
}

/// Whether a resource group exists
pub async fn check_existence(client: &dyn ManagementClient, name: &str) -> Outcome<bool> {
    check(SERVICE, "check_existence", validate_group_name(name))?;
    normalize(
        SERVICE,
        "check_existence",
        client.resource_groups().check_existence(name).await,
    )
}

/// Create a resource group, or update the tags of an existing one
pub async fn create_or_update(
    client: &dyn ManagementClient,
    params: &ResourceGroupParams,
) -> Outcome<ResourceGroup> {
    check(SERVICE, "create_or_update", params.validate())?;
    normalize(
        SERVICE,
        "create_or_update",
        client.resource_groups().create_or_update(params).await,
    )
}

/// Delete a resource group and everything in it
pub async fn delete(client: &dyn ManagementClient, name: &str) -> bool {
    if check(SERVICE, "delete", validate_group_name(name)).is_err() {
        return false;
    }
    succeeded(SERVICE, "delete", client.resource_groups().delete(name).await)
}

/// All resource groups in the subscription, keyed by name
pub async fn list(client: &dyn ManagementClient) -> Outcome<BTreeMap<String, ResourceGroup>> {
    let groups = normalize(SERVICE, "list", client.resource_groups().list().await)?;
    Ok(keyed(groups, |g| g.name.as_str()))
}
