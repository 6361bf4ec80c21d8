//! Azure Database for PostgreSQL server models

use super::{Tags, invalid, require};
use crate::error::{ArmError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRef {
    pub name: String,
    pub resource_group: String,
}

impl ServerRef {
    pub fn new(name: impl Into<String>, resource_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_group: resource_group.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        super::resource_group::validate_group_name(&self.resource_group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerVersion {
    #[serde(rename = "9.5")]
    V9_5,
    #[serde(rename = "9.6")]
    V9_6,
    #[serde(rename = "10")]
    V10,
    #[serde(rename = "10.0")]
    V10_0,
    #[serde(rename = "10.2")]
    V10_2,
    #[serde(rename = "11")]
    V11,
}

impl ServerVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerVersion::V9_5 => "9.5",
            ServerVersion::V9_6 => "9.6",
            ServerVersion::V10 => "10",
            ServerVersion::V10_0 => "10.0",
            ServerVersion::V10_2 => "10.2",
            ServerVersion::V11 => "11",
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerVersion {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "9.5" => Ok(ServerVersion::V9_5),
            "9.6" => Ok(ServerVersion::V9_6),
            "10" => Ok(ServerVersion::V10),
            "10.0" => Ok(ServerVersion::V10_0),
            "10.2" => Ok(ServerVersion::V10_2),
            "11" => Ok(ServerVersion::V11),
            other => Err(invalid(
                "version",
                format!("'{}' is not one of 9.5, 9.6, 10, 10.0, 10.2, 11", other),
            )),
        }
    }
}

/// `Enabled` / `Disabled` switches (ssl enforcement, geo backup, autogrow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enablement {
    Enabled,
    Disabled,
}

impl FromStr for Enablement {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "enabled" => Ok(Enablement::Enabled),
            "disabled" => Ok(Enablement::Disabled),
            other => Err(invalid(
                "enablement",
                format!("'{}' is not one of Enabled, Disabled", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateMode {
    #[default]
    Default,
}

/// Pricing tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

impl Sku {
    fn validate(&self) -> Result<()> {
        require("sku.name", &self.name)?;
        if let Some(tier) = &self.tier
            && !matches!(tier.as_str(), "Basic" | "GeneralPurpose" | "MemoryOptimized")
        {
            return Err(invalid(
                "sku.tier",
                format!(
                    "'{}' is not one of Basic, GeneralPurpose, MemoryOptimized",
                    tier
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_redundant_backup: Option<Enablement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_autogrow: Option<Enablement>,
}

/// A PostgreSQL server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostgresServer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrator_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ServerVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_enforcement: Option<Enablement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_visible_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_qualified_domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_restore_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfile>,
}

/// Parameters for creating (or overwriting) a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresServerCreate {
    pub server: ServerRef,
    pub location: String,
    pub sku: Option<Sku>,
    pub version: Option<ServerVersion>,
    pub ssl_enforcement: Option<Enablement>,
    pub storage_profile: Option<StorageProfile>,
    pub login: String,
    pub login_password: String,
    pub create_mode: CreateMode,
    pub tags: Option<Tags>,
}

impl PostgresServerCreate {
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        require("location", &self.location)?;
        require("login", &self.login)?;
        require("login_password", &self.login_password)?;
        if let Some(sku) = &self.sku {
            sku.validate()?;
        }
        Ok(())
    }
}

/// Parameters for updating an existing server; unset fields are unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresServerUpdate {
    pub server: ServerRef,
    pub sku: Option<Sku>,
    pub version: Option<ServerVersion>,
    pub ssl_enforcement: Option<Enablement>,
    pub storage_profile: Option<StorageProfile>,
    pub login_password: Option<String>,
    pub tags: Option<Tags>,
}

impl PostgresServerUpdate {
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        if let Some(sku) = &self.sku {
            sku.validate()?;
        }
        if let Some(password) = &self.login_password {
            require("login_password", password)?;
        }
        Ok(())
    }
}
