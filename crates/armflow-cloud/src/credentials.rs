//! Connection credentials and their resolution
//!
//! Callers hand in a loose [`ConnectionAuth`] mapping (from flags, an acct
//! profile or a state declaration). [`resolve_credentials`] picks the explicit
//! mapping over the ambient one and validates it into a typed
//! [`Credentials`] value exactly once per invocation.

use crate::error::{ArmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Azure CLI public client id, used for username/password sign-in
pub const PUBLIC_CLIENT_ID: &str = "04b07795-8ddb-461a-bbee-02f9e1bf7b46";

/// Target cloud
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudEnvironment {
    #[default]
    AzurePublicCloud,
    AzureChinaCloud,
    AzureUsGovCloud,
    AzureGermanCloud,
}

/// Endpoints for one cloud environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudEndpoints {
    /// Resource Manager base URL
    pub management: &'static str,
    /// Active Directory authority
    pub active_directory: &'static str,
    /// Resource (audience) requested when acquiring tokens
    pub token_resource: &'static str,
}

impl CloudEnvironment {
    pub fn endpoints(&self) -> CloudEndpoints {
        match self {
            CloudEnvironment::AzurePublicCloud => CloudEndpoints {
                management: "https://management.azure.com",
                active_directory: "https://login.microsoftonline.com",
                token_resource: "https://management.core.windows.net/",
            },
            CloudEnvironment::AzureChinaCloud => CloudEndpoints {
                management: "https://management.chinacloudapi.cn",
                active_directory: "https://login.chinacloudapi.cn",
                token_resource: "https://management.core.chinacloudapi.cn/",
            },
            CloudEnvironment::AzureUsGovCloud => CloudEndpoints {
                management: "https://management.usgovcloudapi.net",
                active_directory: "https://login.microsoftonline.us",
                token_resource: "https://management.core.usgovcloudapi.net/",
            },
            CloudEnvironment::AzureGermanCloud => CloudEndpoints {
                management: "https://management.microsoftazure.de",
                active_directory: "https://login.microsoftonline.de",
                token_resource: "https://management.core.cloudapi.de/",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudEnvironment::AzurePublicCloud => "AZURE_PUBLIC_CLOUD",
            CloudEnvironment::AzureChinaCloud => "AZURE_CHINA_CLOUD",
            CloudEnvironment::AzureUsGovCloud => "AZURE_US_GOV_CLOUD",
            CloudEnvironment::AzureGermanCloud => "AZURE_GERMAN_CLOUD",
        }
    }
}

impl fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudEnvironment {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AZURE_PUBLIC_CLOUD" => Ok(CloudEnvironment::AzurePublicCloud),
            "AZURE_CHINA_CLOUD" => Ok(CloudEnvironment::AzureChinaCloud),
            "AZURE_US_GOV_CLOUD" => Ok(CloudEnvironment::AzureUsGovCloud),
            "AZURE_GERMAN_CLOUD" => Ok(CloudEnvironment::AzureGermanCloud),
            other => Err(ArmError::InvalidCredentials(format!(
                "unknown cloud_environment '{}'",
                other
            ))),
        }
    }
}

/// Loose credential mapping as supplied by a caller or profile
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_environment: Option<String>,
}

impl ConnectionAuth {
    /// True when no field at all has been provided
    pub fn is_empty(&self) -> bool {
        self.subscription_id.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.tenant.is_none()
            && self.client_id.is_none()
            && self.secret.is_none()
            && self.cloud_environment.is_none()
    }
}

impl fmt::Debug for ConnectionAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionAuth")
            .field("subscription_id", &self.subscription_id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tenant", &self.tenant)
            .field("client_id", &self.client_id)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("cloud_environment", &self.cloud_environment)
            .finish()
    }
}

/// How the client signs in
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    Password {
        username: String,
        password: String,
    },
    ServicePrincipal {
        tenant: String,
        client_id: String,
        secret: String,
    },
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            AuthMode::ServicePrincipal {
                tenant, client_id, ..
            } => f
                .debug_struct("ServicePrincipal")
                .field("tenant", tenant)
                .field("client_id", client_id)
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}

/// Validated credentials for one subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub subscription_id: String,
    pub mode: AuthMode,
    pub cloud_environment: CloudEnvironment,
}

impl TryFrom<&ConnectionAuth> for Credentials {
    type Error = ArmError;

    fn try_from(auth: &ConnectionAuth) -> Result<Self> {
        let subscription_id = non_empty(&auth.subscription_id).ok_or_else(|| {
            ArmError::InvalidCredentials("subscription_id is required".to_string())
        })?;

        let cloud_environment = match non_empty(&auth.cloud_environment) {
            Some(env) => env.parse()?,
            None => CloudEnvironment::default(),
        };

        let principal = (
            non_empty(&auth.tenant),
            non_empty(&auth.client_id),
            non_empty(&auth.secret),
        );
        let password = (non_empty(&auth.username), non_empty(&auth.password));

        let mode = match (principal, password) {
            ((Some(tenant), Some(client_id), Some(secret)), _) => AuthMode::ServicePrincipal {
                tenant,
                client_id,
                secret,
            },
            (_, (Some(username), Some(password))) => AuthMode::Password { username, password },
            _ => {
                return Err(ArmError::InvalidCredentials(
                    "expected either username/password or tenant/client_id/secret".to_string(),
                ));
            }
        };

        Ok(Self {
            subscription_id,
            mode,
            cloud_environment,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Pick explicit credentials over ambient ones and validate the winner
///
/// An explicit mapping that is present but empty counts as absent, so the
/// ambient profile still applies.
pub fn resolve_credentials(
    explicit: Option<&ConnectionAuth>,
    ambient: Option<&ConnectionAuth>,
) -> Result<Credentials> {
    let chosen = explicit
        .filter(|auth| !auth.is_empty())
        .or(ambient.filter(|auth| !auth.is_empty()))
        .ok_or(ArmError::MissingCredentials)?;

    Credentials::try_from(chosen)
}
