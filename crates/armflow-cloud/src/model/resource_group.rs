//! Resource group model

use super::{Tags, invalid, require, require_len};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A resource group as returned by the management API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,

    #[serde(default)]
    pub tags: Tags,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ResourceGroupProperties>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroupProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// Parameters for `create_or_update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroupParams {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub managed_by: Option<String>,
    #[serde(default)]
    pub tags: Option<Tags>,
}

impl ResourceGroupParams {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            managed_by: None,
            tags: None,
        }
    }

    pub fn with_managed_by(mut self, managed_by: Option<String>) -> Self {
        self.managed_by = managed_by;
        self
    }

    pub fn with_tags(mut self, tags: Option<Tags>) -> Self {
        self.tags = tags;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_group_name(&self.name)?;
        require("location", &self.location)
    }
}

/// Resource group names: 1-90 characters of alphanumerics, underscores,
/// parentheses, hyphens and periods, not ending in a period.
pub fn validate_group_name(name: &str) -> Result<()> {
    require_len("resource_group", name, 1, 90)?;
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '_' | '(' | ')' | '-' | '.');
    if !name.chars().all(allowed) {
        return Err(invalid(
            "resource_group",
            format!("'{}' contains characters that are not allowed", name),
        ));
    }
    if name.ends_with('.') {
        return Err(invalid(
            "resource_group",
            format!("'{}' must not end with a period", name),
        ));
    }
    Ok(())
}
