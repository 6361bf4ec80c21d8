//! Blob container models and request parameters

use super::{Tags, invalid, require_len};
use crate::error::{ArmError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest immutability period ARM accepts, in days
pub const MAX_IMMUTABILITY_DAYS: u32 = 146_000;

/// Public access level of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicAccess {
    Container,
    Blob,
    None,
}

impl fmt::Display for PublicAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicAccess::Container => write!(f, "Container"),
            PublicAccess::Blob => write!(f, "Blob"),
            PublicAccess::None => write!(f, "None"),
        }
    }
}

impl FromStr for PublicAccess {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "container" => Ok(PublicAccess::Container),
            "blob" => Ok(PublicAccess::Blob),
            "none" => Ok(PublicAccess::None),
            other => Err(invalid(
                "public_access",
                format!("'{}' is not one of Container, Blob, None", other),
            )),
        }
    }
}

/// Identifies one container inside a storage account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    pub name: String,
    pub account: String,
    pub resource_group: String,
}

impl ContainerRef {
    pub fn new(
        name: impl Into<String>,
        account: impl Into<String>,
        resource_group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            account: account.into(),
            resource_group: resource_group.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_container_name(&self.name)?;
        validate_account(&self.account, &self.resource_group)
    }
}

/// Validate the storage account and its resource group
pub fn validate_account(account: &str, resource_group: &str) -> Result<()> {
    validate_account_name(account)?;
    super::resource_group::validate_group_name(resource_group)
}

/// Service-managed containers outside the usual naming rules
pub const RESERVED_CONTAINERS: [&str; 2] = ["$root", "$web"];

/// 3-63 characters of lower-case letters, digits and dashes; every dash sits
/// between two alphanumerics. The reserved `$root` and `$web` also pass.
pub fn validate_container_name(name: &str) -> Result<()> {
    if RESERVED_CONTAINERS.contains(&name) {
        return Ok(());
    }
    require_len("name", name, 3, 63)?;
    let lower_alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    if !name.chars().all(|c| lower_alnum(c) || c == '-') {
        return Err(invalid(
            "name",
            format!(
                "'{}' may only contain lower-case letters, numbers and dashes",
                name
            ),
        ));
    }
    if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
        return Err(invalid(
            "name",
            format!(
                "'{}' must have every dash preceded and followed by a letter or number",
                name
            ),
        ));
    }
    Ok(())
}

/// 3-24 characters of lower-case letters and digits
pub fn validate_account_name(account: &str) -> Result<()> {
    require_len("account", account, 3, 24)?;
    if !account
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(invalid(
            "account",
            format!(
                "'{}' may only contain lower-case letters and numbers",
                account
            ),
        ));
    }
    Ok(())
}

/// A blob container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobContainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access: Option<PublicAccess>,
    #[serde(default)]
    pub metadata: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_immutability_policy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_legal_hold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutability_policy: Option<ImmutabilityPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_hold: Option<LegalHold>,
}

/// Properties set on create/update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerParams {
    #[serde(default)]
    pub public_access: Option<PublicAccess>,
    #[serde(default)]
    pub metadata: Option<Tags>,
}

/// An immutability policy (also embedded in container properties)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutabilityPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutability_period_since_creation_in_days: Option<u32>,
    /// `Locked` or `Unlocked`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Parameters for creating or extending an immutability policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutabilityPolicyParams {
    pub immutability_period_since_creation_in_days: u32,
    /// ETag guard; `*` applies only if a policy already exists
    #[serde(default)]
    pub if_match: Option<String>,
}

impl ImmutabilityPolicyParams {
    pub fn new(days: u32, if_match: Option<String>) -> Self {
        Self {
            immutability_period_since_creation_in_days: days,
            if_match,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let days = self.immutability_period_since_creation_in_days;
        if days == 0 || days > MAX_IMMUTABILITY_DAYS {
            return Err(invalid(
                "immutability_period_since_creation_in_days",
                format!("{} is outside 1..={}", days, MAX_IMMUTABILITY_DAYS),
            ));
        }
        Ok(())
    }
}

/// Require an ETag for operations that only act on an existing policy
pub fn require_if_match(if_match: &str) -> Result<()> {
    if if_match.trim().is_empty() {
        return Err(invalid("if_match", "an ETag is required for this operation"));
    }
    Ok(())
}

/// Legal hold state of a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalHold {
    #[serde(default)]
    pub has_legal_hold: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Normalized legal hold tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalHoldTags(Vec<String>);

impl LegalHoldTags {
    /// Each tag is 3-23 alphanumerics; tags are lower-cased like the service does
    pub fn new<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            require_len("tags", tag, 3, 23)?;
            if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid(
                    "tags",
                    format!("'{}' may only contain letters and numbers", tag),
                ));
            }
            let tag = tag.to_ascii_lowercase();
            if !normalized.contains(&tag) {
                normalized.push(tag);
            }
        }
        if normalized.is_empty() {
            return Err(invalid("tags", "at least one tag is required"));
        }
        Ok(Self(normalized))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Lease actions on a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseAction {
    Acquire,
    Renew,
    Change,
    Release,
    Break,
}

impl fmt::Display for LeaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaseAction::Acquire => write!(f, "Acquire"),
            LeaseAction::Renew => write!(f, "Renew"),
            LeaseAction::Change => write!(f, "Change"),
            LeaseAction::Release => write!(f, "Release"),
            LeaseAction::Break => write!(f, "Break"),
        }
    }
}

impl FromStr for LeaseAction {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "acquire" => Ok(LeaseAction::Acquire),
            "renew" => Ok(LeaseAction::Renew),
            "change" => Ok(LeaseAction::Change),
            "release" => Ok(LeaseAction::Release),
            "break" => Ok(LeaseAction::Break),
            other => Err(invalid(
                "action",
                format!(
                    "'{}' is not one of Acquire, Renew, Change, Release, Break",
                    other
                ),
            )),
        }
    }
}

/// A validated lease request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseRequest {
    pub action: LeaseAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_lease_id: Option<String>,
}

impl LeaseRequest {
    pub fn new(action: LeaseAction) -> Self {
        Self {
            action,
            lease_id: None,
            break_period: None,
            lease_duration: None,
            proposed_lease_id: None,
        }
    }

    pub fn with_lease_id(mut self, lease_id: Option<String>) -> Self {
        self.lease_id = lease_id;
        self
    }

    pub fn with_break_period(mut self, break_period: Option<u32>) -> Self {
        self.break_period = break_period;
        self
    }

    pub fn with_lease_duration(mut self, lease_duration: Option<i32>) -> Self {
        self.lease_duration = lease_duration;
        self
    }

    pub fn with_proposed_lease_id(mut self, proposed_lease_id: Option<String>) -> Self {
        self.proposed_lease_id = proposed_lease_id;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        match self.action {
            LeaseAction::Acquire => match self.lease_duration {
                Some(-1) | Some(15..=60) => {}
                Some(other) => {
                    return Err(invalid(
                        "lease_duration",
                        format!("{} must be -1 (infinite) or between 15 and 60 seconds", other),
                    ));
                }
                None => return Err(invalid("lease_duration", "required for Acquire")),
            },
            LeaseAction::Renew | LeaseAction::Release => {
                if !has(&self.lease_id) {
                    return Err(invalid("lease_id", format!("required for {}", self.action)));
                }
            }
            LeaseAction::Change => {
                if !has(&self.lease_id) {
                    return Err(invalid("lease_id", "required for Change"));
                }
                if !has(&self.proposed_lease_id) {
                    return Err(invalid("proposed_lease_id", "required for Change"));
                }
            }
            LeaseAction::Break => {
                if let Some(period) = self.break_period
                    && period > 60
                {
                    return Err(invalid(
                        "break_period",
                        format!("{} must be between 0 and 60 seconds", period),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Result of a lease operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseContainerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_time_seconds: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_name_rules() {
        assert!(validate_container_name("logs").is_ok());
        assert!(validate_container_name("app-logs-2024").is_ok());
        assert!(validate_container_name("ab").is_err());
        assert!(validate_container_name("Logs").is_err());
        assert!(validate_container_name("-logs").is_err());
        assert!(validate_container_name("logs-").is_err());
        assert!(validate_container_name("app--logs").is_err());
        assert!(validate_container_name("app_logs").is_err());
    }

    #[test]
    fn test_reserved_container_names() {
        assert!(validate_container_name("$root").is_ok());
        assert!(validate_container_name("$web").is_ok());
        assert!(validate_container_name("$logs2").is_err());
        assert!(ContainerRef::new("$web", "acct1", "rg1").validate().is_ok());
    }

    #[test]
    fn test_account_name_rules() {
        assert!(validate_account_name("mystorage01").is_ok());
        assert!(validate_account_name("my-storage").is_err());
        assert!(validate_account_name("MyStorage").is_err());
        assert!(validate_account_name(&"a".repeat(25)).is_err());
    }

    #[test]
    fn test_public_access_parse() {
        assert_eq!("blob".parse::<PublicAccess>().unwrap(), PublicAccess::Blob);
        assert_eq!(
            "Container".parse::<PublicAccess>().unwrap(),
            PublicAccess::Container
        );
        assert!("private".parse::<PublicAccess>().is_err());
    }

    #[test]
    fn test_legal_hold_tags_normalized() {
        let tags = LegalHoldTags::new(["CaseA123", "casea123", "audit"]).unwrap();
        assert_eq!(tags.as_slice(), &["casea123".to_string(), "audit".to_string()]);

        assert!(LegalHoldTags::new(["ab"]).is_err());
        assert!(LegalHoldTags::new(["has space"]).is_err());
        assert!(LegalHoldTags::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_immutability_period_bounds() {
        assert!(ImmutabilityPolicyParams::new(1, None).validate().is_ok());
        assert!(
            ImmutabilityPolicyParams::new(MAX_IMMUTABILITY_DAYS, Some("*".into()))
                .validate()
                .is_ok()
        );
        assert!(ImmutabilityPolicyParams::new(0, None).validate().is_err());
        assert!(
            ImmutabilityPolicyParams::new(MAX_IMMUTABILITY_DAYS + 1, None)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_lease_request_rules() {
        assert!("steal".parse::<LeaseAction>().is_err());

        let acquire = LeaseRequest::new(LeaseAction::Acquire);
        assert!(acquire.validate().is_err());
        assert!(acquire.clone().with_lease_duration(Some(-1)).validate().is_ok());
        assert!(acquire.clone().with_lease_duration(Some(30)).validate().is_ok());
        assert!(acquire.with_lease_duration(Some(10)).validate().is_err());

        let renew = LeaseRequest::new(LeaseAction::Renew);
        assert!(renew.validate().is_err());
        assert!(renew.with_lease_id(Some("abc".into())).validate().is_ok());

        let change = LeaseRequest::new(LeaseAction::Change).with_lease_id(Some("abc".into()));
        assert!(change.validate().is_err());
        assert!(
            change
                .with_proposed_lease_id(Some("def".into()))
                .validate()
                .is_ok()
        );

        let brk = LeaseRequest::new(LeaseAction::Break);
        assert!(brk.validate().is_ok());
        assert!(brk.clone().with_break_period(Some(60)).validate().is_ok());
        assert!(brk.with_break_period(Some(61)).validate().is_err());
    }
}
