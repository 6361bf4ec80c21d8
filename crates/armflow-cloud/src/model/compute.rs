//! Virtual machine extension models

use super::{Tags, invalid, require};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Identifies one extension on a virtual machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmExtensionRef {
    pub name: String,
    pub vm_name: String,
    pub resource_group: String,
}

impl VmExtensionRef {
    pub fn new(
        name: impl Into<String>,
        vm_name: impl Into<String>,
        resource_group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vm_name: vm_name.into(),
            resource_group: resource_group.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("vm_name", &self.vm_name)?;
        super::resource_group::validate_group_name(&self.resource_group)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualMachineExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_machine_extension_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_handler_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_upgrade_minor_version: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// Parameters for `create_or_update`
#[derive(Debug, Clone, PartialEq)]
pub struct VmExtensionParams {
    pub extension: VmExtensionRef,
    pub location: String,
    pub publisher: String,
    pub extension_type: String,
    pub version: String,
    /// Public settings, sent to the handler as JSON
    pub settings: serde_json::Value,
    pub auto_upgrade_minor_version: Option<bool>,
    pub tags: Option<Tags>,
}

impl VmExtensionParams {
    pub fn validate(&self) -> Result<()> {
        self.extension.validate()?;
        require("location", &self.location)?;
        require("publisher", &self.publisher)?;
        require("extension_type", &self.extension_type)?;
        require("version", &self.version)?;
        if !self.settings.is_object() {
            return Err(invalid("settings", "must be a mapping"));
        }
        Ok(())
    }
}
