//! Client factory for the Azure Resource Manager REST API

use crate::auth::TokenProvider;
use crate::blob_containers::BlobContainers;
use crate::client::ArmClient;
use crate::compute::VmExtensions;
use crate::error::AzureError;
use crate::postgresql::PostgresServers;
use crate::resource_groups::ResourceGroups;
use armflow_cloud::{
    BlobContainerOperations, ClientFactory, Credentials, ManagementClient,
    PostgresServerOperations, ResourceGroupOperations, Result, VmExtensionOperations,
};
use std::sync::Arc;
use std::time::Duration;

/// Knobs for the REST client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Overrides the cloud environment's Resource Manager URL
    pub management_endpoint: Option<String>,
    /// Overrides the cloud environment's Active Directory authority
    pub authority_endpoint: Option<String>,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            management_endpoint: None,
            authority_endpoint: None,
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(1800),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Builds [`AzureManagementClient`]s over reqwest
#[derive(Debug, Clone, Default)]
pub struct AzureClientFactory {
    options: ClientOptions,
}

impl AzureClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ClientOptions) -> Self {
        Self { options }
    }
}

impl ClientFactory for AzureClientFactory {
    fn name(&self) -> &str {
        "azure-rest"
    }

    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn ManagementClient>> {
        let endpoints = credentials.cloud_environment.endpoints();
        let management = self
            .options
            .management_endpoint
            .as_deref()
            .unwrap_or(endpoints.management);
        let authority = self
            .options
            .authority_endpoint
            .as_deref()
            .unwrap_or(endpoints.active_directory);

        let http = reqwest::Client::builder()
            .user_agent(concat!("armflow/", env!("CARGO_PKG_VERSION")))
            .timeout(self.options.request_timeout)
            .build()
            .map_err(AzureError::from)?;

        let tokens = TokenProvider::new(
            http.clone(),
            authority,
            endpoints.token_resource,
            credentials.mode.clone(),
        );
        let client = ArmClient::new(http, management, &credentials.subscription_id, tokens)
            .with_polling(self.options.poll_interval, self.options.poll_timeout);

        tracing::debug!(
            endpoint = management,
            subscription = %credentials.subscription_id,
            "Built Resource Manager client"
        );
        Ok(Arc::new(AzureManagementClient::new(client)))
    }
}

/// One subscription, one sign-in, one shared HTTP client
pub struct AzureManagementClient {
    subscription_id: String,
    resource_groups: ResourceGroups,
    blob_containers: BlobContainers,
    postgresql_servers: PostgresServers,
    vm_extensions: VmExtensions,
}

impl AzureManagementClient {
    pub fn new(client: ArmClient) -> Self {
        let subscription_id = client.subscription_id().to_string();
        let client = Arc::new(client);
        Self {
            subscription_id,
            resource_groups: ResourceGroups::new(client.clone()),
            blob_containers: BlobContainers::new(client.clone()),
            postgresql_servers: PostgresServers::new(client.clone()),
            vm_extensions: VmExtensions::new(client),
        }
    }
}

impl ManagementClient for AzureManagementClient {
    fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    fn resource_groups(&self) -> &dyn ResourceGroupOperations {
        &self.resource_groups
    }

    fn blob_containers(&self) -> &dyn BlobContainerOperations {
        &self.blob_containers
    }

    fn postgresql_servers(&self) -> &dyn PostgresServerOperations {
        &self.postgresql_servers
    }

    fn vm_extensions(&self) -> &dyn VmExtensionOperations {
        &self.vm_extensions
    }
}
