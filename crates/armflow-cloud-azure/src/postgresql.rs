//! PostgreSQL server operations (Microsoft.DBforPostgreSQL)

use crate::client::ArmClient;
use armflow_cloud::model::{
    CreateMode, Enablement, PostgresServer, PostgresServerCreate, PostgresServerUpdate,
    ServerRef, Sku, StorageProfile, Tags,
};
use armflow_cloud::{PostgresServerOperations, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const API_VERSION: &str = "2017-12-01";

const PROVIDER_PATH: &str = "/providers/Microsoft.DBforPostgreSQL/servers";

pub struct PostgresServers {
    client: Arc<ArmClient>,
}

impl PostgresServers {
    pub fn new(client: Arc<ArmClient>) -> Self {
        Self { client }
    }

    fn url(&self, server: &ServerRef) -> String {
        self.client.resource_group_url(
            &server.resource_group,
            &format!("{}/{}", PROVIDER_PATH, server.name),
        )
    }
}

#[async_trait]
impl PostgresServerOperations for PostgresServers {
    async fn create(&self, params: &PostgresServerCreate) -> Result<PostgresServer> {
        let body = serde_json::to_value(ApiServerCreate::from(params))?;
        let server: ApiServer = self
            .client
            .upsert(Method::PUT, &self.url(&params.server), API_VERSION, body, None)
            .await?;
        tracing::info!(name = %params.server.name, "PostgreSQL server created");
        Ok(server.into())
    }

    async fn update(&self, params: &PostgresServerUpdate) -> Result<PostgresServer> {
        let body = serde_json::to_value(ApiServerUpdate::from(params))?;
        let server: ApiServer = self
            .client
            .upsert(Method::PATCH, &self.url(&params.server), API_VERSION, body, None)
            .await?;
        tracing::info!(name = %params.server.name, "PostgreSQL server updated");
        Ok(server.into())
    }

    async fn delete(&self, server: &ServerRef) -> Result<()> {
        self.client.delete(&self.url(server), API_VERSION).await?;
        tracing::info!(name = %server.name, "PostgreSQL server deleted");
        Ok(())
    }

    async fn get(&self, server: &ServerRef) -> Result<PostgresServer> {
        let found: ApiServer = self.client.get(&self.url(server), API_VERSION, None).await?;
        Ok(found.into())
    }

    async fn list(&self) -> Result<Vec<PostgresServer>> {
        let url = self.client.subscription_url(PROVIDER_PATH);
        let servers: Vec<ApiServer> = self.client.list(&url, API_VERSION).await?;
        Ok(servers.into_iter().map(PostgresServer::from).collect())
    }

    async fn list_by_resource_group(&self, resource_group: &str) -> Result<Vec<PostgresServer>> {
        let url = self.client.resource_group_url(resource_group, PROVIDER_PATH);
        let servers: Vec<ApiServer> = self.client.list(&url, API_VERSION).await?;
        Ok(servers.into_iter().map(PostgresServer::from).collect())
    }

    async fn restart(&self, server: &ServerRef) -> Result<()> {
        let url = format!("{}/restart", self.url(server));
        self.client.post_and_wait(&url, API_VERSION).await?;
        tracing::info!(name = %server.name, "PostgreSQL server restarted");
        Ok(())
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiServer {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(rename = "type", default)]
    resource_type: Option<String>,
    location: String,
    #[serde(default)]
    tags: Option<Tags>,
    #[serde(default)]
    sku: Option<Sku>,
    #[serde(default)]
    properties: Option<ApiServerProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiServerProperties {
    #[serde(default)]
    administrator_login: Option<String>,
    /// Kept loose so unknown versions still parse
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    ssl_enforcement: Option<Enablement>,
    #[serde(default)]
    user_visible_state: Option<String>,
    #[serde(default)]
    fully_qualified_domain_name: Option<String>,
    #[serde(default)]
    earliest_restore_date: Option<DateTime<Utc>>,
    #[serde(default)]
    storage_profile: Option<ApiStorageProfile>,
}

impl From<ApiServer> for PostgresServer {
    fn from(s: ApiServer) -> Self {
        let p = s.properties.unwrap_or_default();
        PostgresServer {
            id: s.id,
            name: s.name,
            resource_type: s.resource_type,
            location: s.location,
            tags: s.tags.unwrap_or_default(),
            sku: s.sku,
            administrator_login: p.administrator_login,
            version: p.version.and_then(|v| v.parse().ok()),
            ssl_enforcement: p.ssl_enforcement,
            user_visible_state: p.user_visible_state,
            fully_qualified_domain_name: p.fully_qualified_domain_name,
            earliest_restore_date: p.earliest_restore_date,
            storage_profile: p.storage_profile.map(StorageProfile::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiStorageProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backup_retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geo_redundant_backup: Option<Enablement>,
    #[serde(rename = "storageMB", default, skip_serializing_if = "Option::is_none")]
    storage_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_autogrow: Option<Enablement>,
}

impl From<ApiStorageProfile> for StorageProfile {
    fn from(p: ApiStorageProfile) -> Self {
        StorageProfile {
            backup_retention_days: p.backup_retention_days,
            geo_redundant_backup: p.geo_redundant_backup,
            storage_mb: p.storage_mb,
            storage_autogrow: p.storage_autogrow,
        }
    }
}

impl From<&StorageProfile> for ApiStorageProfile {
    fn from(p: &StorageProfile) -> Self {
        ApiStorageProfile {
            backup_retention_days: p.backup_retention_days,
            geo_redundant_backup: p.geo_redundant_backup,
            storage_mb: p.storage_mb,
            storage_autogrow: p.storage_autogrow,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiServerCreate<'a> {
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sku: Option<&'a Sku>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a Tags>,
    properties: ApiServerCreateProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiServerCreateProperties<'a> {
    create_mode: CreateMode,
    administrator_login: &'a str,
    administrator_login_password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssl_enforcement: Option<Enablement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_profile: Option<ApiStorageProfile>,
}

impl<'a> From<&'a PostgresServerCreate> for ApiServerCreate<'a> {
    fn from(p: &'a PostgresServerCreate) -> Self {
        ApiServerCreate {
            location: &p.location,
            sku: p.sku.as_ref(),
            tags: p.tags.as_ref(),
            properties: ApiServerCreateProperties {
                create_mode: p.create_mode,
                administrator_login: &p.login,
                administrator_login_password: &p.login_password,
                version: p.version.map(|v| v.as_str()),
                ssl_enforcement: p.ssl_enforcement,
                storage_profile: p.storage_profile.as_ref().map(ApiStorageProfile::from),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiServerUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sku: Option<&'a Sku>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a Tags>,
    properties: ApiServerUpdateProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiServerUpdateProperties<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssl_enforcement: Option<Enablement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_profile: Option<ApiStorageProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    administrator_login_password: Option<&'a str>,
}

impl<'a> From<&'a PostgresServerUpdate> for ApiServerUpdate<'a> {
    fn from(p: &'a PostgresServerUpdate) -> Self {
        ApiServerUpdate {
            sku: p.sku.as_ref(),
            tags: p.tags.as_ref(),
            properties: ApiServerUpdateProperties {
                version: p.version.map(|v| v.as_str()),
                ssl_enforcement: p.ssl_enforcement,
                storage_profile: p.storage_profile.as_ref().map(ApiStorageProfile::from),
                administrator_login_password: p.login_password.as_deref(),
            },
        }
    }
}
