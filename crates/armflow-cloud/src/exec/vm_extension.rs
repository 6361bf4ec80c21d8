//! Virtual machine extension accessors

use super::{check, keyed, normalize, succeeded};
use crate::model::resource_group::validate_group_name;
use crate::model::{VirtualMachineExtension, VmExtensionParams, VmExtensionRef};
use crate::outcome::Outcome;
use crate::provider::ManagementClient;
use std::collections::BTreeMap;

const SERVICE: &str = "compute";

pub async fn create_or_update(
    client: &dyn ManagementClient,
    params: &VmExtensionParams,
) -> Outcome<VirtualMachineExtension> {
    check(SERVICE, "create_or_update", params.validate())?;
    normalize(
        SERVICE,
        "create_or_update",
        client.vm_extensions().create_or_update(params).await,
    )
}

pub async fn delete(client: &dyn ManagementClient, extension: &VmExtensionRef) -> bool {
    if check(SERVICE, "delete", extension.validate()).is_err() {
        return false;
    }
    succeeded(SERVICE, "delete", client.vm_extensions().delete(extension).await)
}

pub async fn get(
    client: &dyn ManagementClient,
    extension: &VmExtensionRef,
) -> Outcome<VirtualMachineExtension> {
    check(SERVICE, "get", extension.validate())?;
    normalize(SERVICE, "get", client.vm_extensions().get(extension).await)
}

/// All extensions on one virtual machine, keyed by name
pub async fn list(
    client: &dyn ManagementClient,
    vm_name: &str,
    resource_group: &str,
) -> Outcome<BTreeMap<String, VirtualMachineExtension>> {
    check(SERVICE, "list", validate_group_name(resource_group))?;
    let extensions = normalize(
        SERVICE,
        "list",
        client.vm_extensions().list(vm_name, resource_group).await,
    )?;
    Ok(keyed(extensions, |e| e.name.as_str()))
}
