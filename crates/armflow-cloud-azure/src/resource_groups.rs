//! Resource group operations (Microsoft.Resources)

use crate::client::ArmClient;
use armflow_cloud::model::{ResourceGroup, ResourceGroupParams, ResourceGroupProperties, Tags};
use armflow_cloud::{ResourceGroupOperations, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const API_VERSION: &str = "2019-10-01";

pub struct ResourceGroups {
    client: Arc<ArmClient>,
}

impl ResourceGroups {
    pub fn new(client: Arc<ArmClient>) -> Self {
        Self { client }
    }

    fn url(&self, name: &str) -> String {
        self.client
            .subscription_url(&format!("/resourcegroups/{}", name))
    }
}

#[async_trait]
impl ResourceGroupOperations for ResourceGroups {
    async fn get(&self, name: &str) -> Result<ResourceGroup> {
        let group: ApiResourceGroup = self.client.get(&self.url(name), API_VERSION, None).await?;
        Ok(group.into())
    }

    async fn check_existence(&self, name: &str) -> Result<bool> {
        Ok(self.client.exists(&self.url(name), API_VERSION).await?)
    }

    async fn create_or_update(&self, params: &ResourceGroupParams) -> Result<ResourceGroup> {
        let body = serde_json::to_value(ApiResourceGroupBody::from(params))?;
        let group: ApiResourceGroup = self
            .client
            .upsert(Method::PUT, &self.url(&params.name), API_VERSION, body, None)
            .await?;
        tracing::info!(name = %params.name, location = %params.location, "Resource group saved");
        Ok(group.into())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.client.delete(&self.url(name), API_VERSION).await?;
        tracing::info!(name, "Resource group deleted");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ResourceGroup>> {
        let url = self.client.subscription_url("/resourcegroups");
        let groups: Vec<ApiResourceGroup> = self.client.list(&url, API_VERSION).await?;
        Ok(groups.into_iter().map(ResourceGroup::from).collect())
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResourceGroup {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(rename = "type", default)]
    resource_type: Option<String>,
    location: String,
    #[serde(default)]
    managed_by: Option<String>,
    #[serde(default)]
    tags: Option<Tags>,
    #[serde(default)]
    properties: Option<ApiResourceGroupProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResourceGroupProperties {
    #[serde(default)]
    provisioning_state: Option<String>,
}

impl From<ApiResourceGroup> for ResourceGroup {
    fn from(g: ApiResourceGroup) -> Self {
        ResourceGroup {
            id: g.id,
            name: g.name,
            resource_type: g.resource_type,
            location: g.location,
            managed_by: g.managed_by,
            tags: g.tags.unwrap_or_default(),
            properties: g.properties.map(|p| ResourceGroupProperties {
                provisioning_state: p.provisioning_state,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiResourceGroupBody<'a> {
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    managed_by: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a Tags>,
}

impl<'a> From<&'a ResourceGroupParams> for ApiResourceGroupBody<'a> {
    fn from(params: &'a ResourceGroupParams) -> Self {
        Self {
            location: &params.location,
            managed_by: params.managed_by.as_deref(),
            tags: params.tags.as_ref(),
        }
    }
}
