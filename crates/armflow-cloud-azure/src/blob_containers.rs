//! Blob container operations (Microsoft.Storage)

use crate::client::ArmClient;
use armflow_cloud::model::{
    BlobContainer, ContainerParams, ContainerRef, ImmutabilityPolicy, ImmutabilityPolicyParams,
    LeaseAction, LeaseContainerResponse, LeaseRequest, LegalHold, LegalHoldTags, PublicAccess,
    Tags,
};
use armflow_cloud::{BlobContainerOperations, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const API_VERSION: &str = "2019-06-01";

pub struct BlobContainers {
    client: Arc<ArmClient>,
}

impl BlobContainers {
    pub fn new(client: Arc<ArmClient>) -> Self {
        Self { client }
    }

    fn containers_url(&self, account: &str, resource_group: &str) -> String {
        self.client.resource_group_url(
            resource_group,
            &format!(
                "/providers/Microsoft.Storage/storageAccounts/{}/blobServices/default/containers",
                account
            ),
        )
    }

    fn url(&self, container: &ContainerRef) -> String {
        format!(
            "{}/{}",
            self.containers_url(&container.account, &container.resource_group),
            container.name
        )
    }

    fn policy_url(&self, container: &ContainerRef, action: &str) -> String {
        format!("{}/immutabilityPolicies/default{}", self.url(container), action)
    }
}

#[async_trait]
impl BlobContainerOperations for BlobContainers {
    async fn create(
        &self,
        container: &ContainerRef,
        params: &ContainerParams,
    ) -> Result<BlobContainer> {
        let body = container_body(params)?;
        let created: ApiBlobContainer = self
            .client
            .upsert(Method::PUT, &self.url(container), API_VERSION, body, None)
            .await?;
        tracing::info!(name = %container.name, account = %container.account, "Blob container created");
        Ok(created.into())
    }

    async fn update(
        &self,
        container: &ContainerRef,
        params: &ContainerParams,
    ) -> Result<BlobContainer> {
        let body = container_body(params)?;
        let updated: ApiBlobContainer = self
            .client
            .upsert(Method::PATCH, &self.url(container), API_VERSION, body, None)
            .await?;
        tracing::info!(name = %container.name, account = %container.account, "Blob container updated");
        Ok(updated.into())
    }

    async fn get(&self, container: &ContainerRef) -> Result<BlobContainer> {
        let found: ApiBlobContainer = self
            .client
            .get(&self.url(container), API_VERSION, None)
            .await?;
        Ok(found.into())
    }

    async fn delete(&self, container: &ContainerRef) -> Result<()> {
        self.client
            .delete(&self.url(container), API_VERSION)
            .await?;
        tracing::info!(name = %container.name, account = %container.account, "Blob container deleted");
        Ok(())
    }

    async fn list(&self, account: &str, resource_group: &str) -> Result<Vec<BlobContainer>> {
        let url = self.containers_url(account, resource_group);
        let containers: Vec<ApiBlobContainer> = self.client.list(&url, API_VERSION).await?;
        Ok(containers.into_iter().map(BlobContainer::from).collect())
    }

    async fn get_immutability_policy(
        &self,
        container: &ContainerRef,
        if_match: Option<&str>,
    ) -> Result<ImmutabilityPolicy> {
        let policy: ApiImmutabilityPolicy = self
            .client
            .get(&self.policy_url(container, ""), API_VERSION, if_match)
            .await?;
        Ok(policy.into())
    }

    async fn create_or_update_immutability_policy(
        &self,
        container: &ContainerRef,
        params: &ImmutabilityPolicyParams,
    ) -> Result<ImmutabilityPolicy> {
        let body = policy_body(params.immutability_period_since_creation_in_days);
        let policy: ApiImmutabilityPolicy = self
            .client
            .upsert(
                Method::PUT,
                &self.policy_url(container, ""),
                API_VERSION,
                body,
                params.if_match.as_deref(),
            )
            .await?;
        Ok(policy.into())
    }

    async fn delete_immutability_policy(
        &self,
        container: &ContainerRef,
        if_match: &str,
    ) -> Result<ImmutabilityPolicy> {
        let policy: ApiImmutabilityPolicy = self
            .client
            .delete_returning(&self.policy_url(container, ""), API_VERSION, Some(if_match))
            .await?;
        Ok(policy.into())
    }

    async fn lock_immutability_policy(
        &self,
        container: &ContainerRef,
        if_match: &str,
    ) -> Result<ImmutabilityPolicy> {
        let policy: ApiImmutabilityPolicy = self
            .client
            .post(
                &self.policy_url(container, "/lock"),
                API_VERSION,
                None,
                Some(if_match),
            )
            .await?;
        tracing::info!(name = %container.name, "Immutability policy locked");
        Ok(policy.into())
    }

    async fn extend_immutability_policy(
        &self,
        container: &ContainerRef,
        days: u32,
        if_match: &str,
    ) -> Result<ImmutabilityPolicy> {
        let policy: ApiImmutabilityPolicy = self
            .client
            .post(
                &self.policy_url(container, "/extend"),
                API_VERSION,
                Some(policy_body(days)),
                Some(if_match),
            )
            .await?;
        Ok(policy.into())
    }

    async fn set_legal_hold(
        &self,
        container: &ContainerRef,
        tags: &LegalHoldTags,
    ) -> Result<LegalHold> {
        let url = format!("{}/setLegalHold", self.url(container));
        let hold: ApiLegalHold = self
            .client
            .post(&url, API_VERSION, Some(json!({ "tags": tags.as_slice() })), None)
            .await?;
        Ok(hold.into())
    }

    async fn clear_legal_hold(
        &self,
        container: &ContainerRef,
        tags: &LegalHoldTags,
    ) -> Result<LegalHold> {
        let url = format!("{}/clearLegalHold", self.url(container));
        let hold: ApiLegalHold = self
            .client
            .post(&url, API_VERSION, Some(json!({ "tags": tags.as_slice() })), None)
            .await?;
        Ok(hold.into())
    }

    async fn lease(
        &self,
        container: &ContainerRef,
        request: &LeaseRequest,
    ) -> Result<LeaseContainerResponse> {
        let url = format!("{}/lease", self.url(container));
        let body = serde_json::to_value(ApiLeaseRequest::from(request))?;
        let lease: ApiLeaseResponse = self
            .client
            .post(&url, API_VERSION, Some(body), None)
            .await?;
        Ok(lease.into())
    }
}

fn container_body(params: &ContainerParams) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(ApiContainerBody {
        properties: ApiContainerBodyProperties {
            public_access: params.public_access,
            metadata: params.metadata.as_ref(),
        },
    })
}

fn policy_body(days: u32) -> serde_json::Value {
    json!({ "properties": { "immutabilityPeriodSinceCreationInDays": days } })
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiBlobContainer {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(rename = "type", default)]
    resource_type: Option<String>,
    #[serde(default)]
    etag: Option<String>,
    #[serde(default)]
    properties: Option<ApiContainerProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiContainerProperties {
    #[serde(default)]
    public_access: Option<PublicAccess>,
    #[serde(default)]
    metadata: Option<Tags>,
    #[serde(default)]
    last_modified_time: Option<DateTime<Utc>>,
    #[serde(default)]
    lease_status: Option<String>,
    #[serde(default)]
    lease_state: Option<String>,
    #[serde(default)]
    lease_duration: Option<String>,
    #[serde(default)]
    has_immutability_policy: Option<bool>,
    #[serde(default)]
    has_legal_hold: Option<bool>,
    #[serde(default)]
    immutability_policy: Option<ApiImmutabilityPolicy>,
    #[serde(default)]
    legal_hold: Option<ApiLegalHoldProperties>,
}

impl From<ApiBlobContainer> for BlobContainer {
    fn from(c: ApiBlobContainer) -> Self {
        let p = c.properties.unwrap_or_default();
        BlobContainer {
            id: c.id,
            name: c.name,
            resource_type: c.resource_type,
            etag: c.etag,
            public_access: p.public_access,
            metadata: p.metadata.unwrap_or_default(),
            last_modified_time: p.last_modified_time,
            lease_status: p.lease_status,
            lease_state: p.lease_state,
            lease_duration: p.lease_duration,
            has_immutability_policy: p.has_immutability_policy,
            has_legal_hold: p.has_legal_hold,
            immutability_policy: p.immutability_policy.map(ImmutabilityPolicy::from),
            legal_hold: p.legal_hold.map(LegalHold::from),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiImmutabilityPolicy {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    etag: Option<String>,
    #[serde(default)]
    properties: Option<ApiImmutabilityPolicyProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiImmutabilityPolicyProperties {
    #[serde(default)]
    immutability_period_since_creation_in_days: Option<u32>,
    #[serde(default)]
    state: Option<String>,
}

impl From<ApiImmutabilityPolicy> for ImmutabilityPolicy {
    fn from(p: ApiImmutabilityPolicy) -> Self {
        let props = p.properties.unwrap_or_default();
        ImmutabilityPolicy {
            id: p.id,
            name: p.name,
            etag: p.etag,
            immutability_period_since_creation_in_days: props
                .immutability_period_since_creation_in_days,
            state: props.state,
        }
    }
}

/// Legal hold as embedded in container properties
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiLegalHoldProperties {
    #[serde(default)]
    has_legal_hold: bool,
    #[serde(default)]
    tags: Vec<ApiTagProperty>,
}

#[derive(Debug, Deserialize)]
struct ApiTagProperty {
    tag: String,
}

impl From<ApiLegalHoldProperties> for LegalHold {
    fn from(h: ApiLegalHoldProperties) -> Self {
        LegalHold {
            has_legal_hold: h.has_legal_hold,
            tags: h.tags.into_iter().map(|t| t.tag).collect(),
        }
    }
}

/// Legal hold as returned by set/clear
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiLegalHold {
    #[serde(default)]
    has_legal_hold: bool,
    #[serde(default)]
    tags: Vec<String>,
}

impl From<ApiLegalHold> for LegalHold {
    fn from(h: ApiLegalHold) -> Self {
        LegalHold {
            has_legal_hold: h.has_legal_hold,
            tags: h.tags,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiContainerBody<'a> {
    properties: ApiContainerBodyProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiContainerBodyProperties<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    public_access: Option<PublicAccess>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Tags>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiLeaseRequest<'a> {
    action: LeaseAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    lease_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    break_period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lease_duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proposed_lease_id: Option<&'a str>,
}

impl<'a> From<&'a LeaseRequest> for ApiLeaseRequest<'a> {
    fn from(r: &'a LeaseRequest) -> Self {
        Self {
            action: r.action,
            lease_id: r.lease_id.as_deref(),
            break_period: r.break_period,
            lease_duration: r.lease_duration,
            proposed_lease_id: r.proposed_lease_id.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiLeaseResponse {
    #[serde(default)]
    lease_id: Option<String>,
    #[serde(default)]
    lease_time_seconds: Option<String>,
}

impl From<ApiLeaseResponse> for LeaseContainerResponse {
    fn from(r: ApiLeaseResponse) -> Self {
        LeaseContainerResponse {
            lease_id: r.lease_id,
            lease_time_seconds: r.lease_time_seconds,
        }
    }
}
