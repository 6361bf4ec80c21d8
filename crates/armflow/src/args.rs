//! Argument groups shared across subcommands

use armflow_cloud::ConnectionAuth;
use armflow_cloud::model::{ContainerRef, ServerRef, Tags, VmExtensionRef};
use clap::Args;

/// Explicit credentials; these win over the acct profile when any is set
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    #[arg(long, global = true, env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    /// Service principal tenant
    #[arg(long, global = true, env = "AZURE_TENANT_ID")]
    pub tenant: Option<String>,

    /// Service principal application id
    #[arg(long, global = true, env = "AZURE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Service principal secret
    #[arg(long, global = true, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[arg(long, global = true, env = "AZURE_USERNAME")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "AZURE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// AZURE_PUBLIC_CLOUD, AZURE_CHINA_CLOUD, AZURE_US_GOV_CLOUD or AZURE_GERMAN_CLOUD
    #[arg(long, global = true, env = "AZURE_CLOUD_ENVIRONMENT")]
    pub cloud_environment: Option<String>,
}

impl CredentialArgs {
    pub fn connection_auth(&self) -> Option<ConnectionAuth> {
        let auth = ConnectionAuth {
            subscription_id: self.subscription_id.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            tenant: self.tenant.clone(),
            client_id: self.client_id.clone(),
            secret: self.secret.clone(),
            cloud_environment: self.cloud_environment.clone(),
        };
        (!auth.is_empty()).then_some(auth)
    }
}

/// Endpoint overrides for private or emulated clouds
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointArgs {
    #[arg(long, global = true, env = "ARMFLOW_MANAGEMENT_ENDPOINT", hide = true)]
    pub management_endpoint: Option<String>,

    #[arg(long, global = true, env = "ARMFLOW_AUTHORITY_ENDPOINT", hide = true)]
    pub authority_endpoint: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ContainerArgs {
    /// Container name
    #[arg(long)]
    pub name: String,

    /// Storage account name
    #[arg(long)]
    pub account: String,

    #[arg(short = 'g', long)]
    pub resource_group: String,
}

impl ContainerArgs {
    pub fn container_ref(&self) -> ContainerRef {
        ContainerRef::new(&self.name, &self.account, &self.resource_group)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Server name
    #[arg(long)]
    pub name: String,

    #[arg(short = 'g', long)]
    pub resource_group: String,
}

impl ServerArgs {
    pub fn server_ref(&self) -> ServerRef {
        ServerRef::new(&self.name, &self.resource_group)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtensionArgs {
    /// Extension name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub vm_name: String,

    #[arg(short = 'g', long)]
    pub resource_group: String,
}

impl ExtensionArgs {
    pub fn extension_ref(&self) -> VmExtensionRef {
        VmExtensionRef::new(&self.name, &self.vm_name, &self.resource_group)
    }
}

/// `key=value`
pub fn parse_tag(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

/// A JSON document given inline
pub fn parse_json(s: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(s).map_err(|e| e.to_string())
}

/// Repeated `--tag` flags; `None` when none were given
pub fn tags(pairs: &[(String, String)]) -> Option<Tags> {
    (!pairs.is_empty()).then(|| pairs.iter().cloned().collect())
}
