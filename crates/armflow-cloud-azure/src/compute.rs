//! Virtual machine extension operations (Microsoft.Compute)

use crate::client::ArmClient;
use armflow_cloud::model::{Tags, VirtualMachineExtension, VmExtensionParams, VmExtensionRef};
use armflow_cloud::{Result, VmExtensionOperations};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const API_VERSION: &str = "2019-07-01";

pub struct VmExtensions {
    client: Arc<ArmClient>,
}

impl VmExtensions {
    pub fn new(client: Arc<ArmClient>) -> Self {
        Self { client }
    }

    fn extensions_url(&self, vm_name: &str, resource_group: &str) -> String {
        self.client.resource_group_url(
            resource_group,
            &format!(
                "/providers/Microsoft.Compute/virtualMachines/{}/extensions",
                vm_name
            ),
        )
    }

    fn url(&self, extension: &VmExtensionRef) -> String {
        format!(
            "{}/{}",
            self.extensions_url(&extension.vm_name, &extension.resource_group),
            extension.name
        )
    }
}

#[async_trait]
impl VmExtensionOperations for VmExtensions {
    async fn create_or_update(
        &self,
        params: &VmExtensionParams,
    ) -> Result<VirtualMachineExtension> {
        let body = serde_json::to_value(ApiExtensionBody::from(params))?;
        let extension: ApiExtension = self
            .client
            .upsert(Method::PUT, &self.url(&params.extension), API_VERSION, body, None)
            .await?;
        tracing::info!(
            name = %params.extension.name,
            vm = %params.extension.vm_name,
            "VM extension saved"
        );
        Ok(extension.into())
    }

    async fn delete(&self, extension: &VmExtensionRef) -> Result<()> {
        self.client.delete(&self.url(extension), API_VERSION).await?;
        tracing::info!(name = %extension.name, vm = %extension.vm_name, "VM extension deleted");
        Ok(())
    }

    async fn get(&self, extension: &VmExtensionRef) -> Result<VirtualMachineExtension> {
        let found: ApiExtension = self
            .client
            .get(&self.url(extension), API_VERSION, None)
            .await?;
        Ok(found.into())
    }

    async fn list(
        &self,
        vm_name: &str,
        resource_group: &str,
    ) -> Result<Vec<VirtualMachineExtension>> {
        let url = self.extensions_url(vm_name, resource_group);
        let extensions: Vec<ApiExtension> = self.client.list(&url, API_VERSION).await?;
        Ok(extensions
            .into_iter()
            .map(VirtualMachineExtension::from)
            .collect())
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiExtension {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(rename = "type", default)]
    resource_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    tags: Option<Tags>,
    #[serde(default)]
    properties: Option<ApiExtensionProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiExtensionProperties {
    #[serde(default)]
    publisher: Option<String>,
    #[serde(rename = "type", default)]
    extension_type: Option<String>,
    #[serde(default)]
    type_handler_version: Option<String>,
    #[serde(default)]
    auto_upgrade_minor_version: Option<bool>,
    #[serde(default)]
    settings: Option<serde_json::Value>,
    #[serde(default)]
    provisioning_state: Option<String>,
}

impl From<ApiExtension> for VirtualMachineExtension {
    fn from(e: ApiExtension) -> Self {
        let p = e.properties.unwrap_or_default();
        VirtualMachineExtension {
            id: e.id,
            name: e.name,
            resource_type: e.resource_type,
            location: e.location,
            tags: e.tags.unwrap_or_default(),
            publisher: p.publisher,
            virtual_machine_extension_type: p.extension_type,
            type_handler_version: p.type_handler_version,
            auto_upgrade_minor_version: p.auto_upgrade_minor_version,
            settings: p.settings,
            provisioning_state: p.provisioning_state,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiExtensionBody<'a> {
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a Tags>,
    properties: ApiExtensionBodyProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiExtensionBodyProperties<'a> {
    publisher: &'a str,
    #[serde(rename = "type")]
    extension_type: &'a str,
    type_handler_version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_upgrade_minor_version: Option<bool>,
    settings: &'a serde_json::Value,
}

impl<'a> From<&'a VmExtensionParams> for ApiExtensionBody<'a> {
    fn from(p: &'a VmExtensionParams) -> Self {
        ApiExtensionBody {
            location: &p.location,
            tags: p.tags.as_ref(),
            properties: ApiExtensionBodyProperties {
                publisher: &p.publisher,
                extension_type: &p.extension_type,
                type_handler_version: &p.version,
                auto_upgrade_minor_version: p.auto_upgrade_minor_version,
                settings: &p.settings,
            },
        }
    }
}
