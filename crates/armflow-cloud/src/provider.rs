//! Management API client traits
//!
//! The external collaborator is reached through these traits. A
//! [`ClientFactory`] turns validated [`Credentials`] into a
//! [`ManagementClient`], which exposes one operations trait per resource
//! kind. Every method maps to exactly one remote call and may fail with an
//! [`crate::ArmError`]; accessors in [`crate::exec`] normalize those failures.

use crate::credentials::Credentials;
use crate::error::Result;
use crate::model::{
    BlobContainer, ContainerParams, ContainerRef, ImmutabilityPolicy, ImmutabilityPolicyParams,
    LeaseContainerResponse, LeaseRequest, LegalHold, LegalHoldTags, PostgresServer,
    PostgresServerCreate, PostgresServerUpdate, ResourceGroup, ResourceGroupParams, ServerRef,
    VirtualMachineExtension, VmExtensionParams, VmExtensionRef,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Builds credential-scoped clients
pub trait ClientFactory: Send + Sync {
    /// Returns the factory name (e.g., "azure-rest")
    fn name(&self) -> &str;

    /// Create a client bound to one subscription and sign-in
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn ManagementClient>>;
}

/// A client bound to one subscription
pub trait ManagementClient: Send + Sync {
    fn subscription_id(&self) -> &str;

    fn resource_groups(&self) -> &dyn ResourceGroupOperations;

    fn blob_containers(&self) -> &dyn BlobContainerOperations;

    fn postgresql_servers(&self) -> &dyn PostgresServerOperations;

    fn vm_extensions(&self) -> &dyn VmExtensionOperations;
}

#[async_trait]
pub trait ResourceGroupOperations: Send + Sync {
    async fn get(&self, name: &str) -> Result<ResourceGroup>;

    async fn check_existence(&self, name: &str) -> Result<bool>;

    async fn create_or_update(&self, params: &ResourceGroupParams) -> Result<ResourceGroup>;

    /// Delete and wait for the operation to finish
    async fn delete(&self, name: &str) -> Result<()>;

    async fn list(&self) -> Result<Vec<ResourceGroup>>;
}

#[async_trait]
pub trait BlobContainerOperations: Send + Sync {
    async fn create(&self, container: &ContainerRef, params: &ContainerParams)
    -> Result<BlobContainer>;

    async fn update(&self, container: &ContainerRef, params: &ContainerParams)
    -> Result<BlobContainer>;

    async fn get(&self, container: &ContainerRef) -> Result<BlobContainer>;

    async fn delete(&self, container: &ContainerRef) -> Result<()>;

    async fn list(&self, account: &str, resource_group: &str) -> Result<Vec<BlobContainer>>;

    async fn get_immutability_policy(
        &self,
        container: &ContainerRef,
        if_match: Option<&str>,
    ) -> Result<ImmutabilityPolicy>;

    async fn create_or_update_immutability_policy(
        &self,
        container: &ContainerRef,
        params: &ImmutabilityPolicyParams,
    ) -> Result<ImmutabilityPolicy>;

    async fn delete_immutability_policy(
        &self,
        container: &ContainerRef,
        if_match: &str,
    ) -> Result<ImmutabilityPolicy>;

    async fn lock_immutability_policy(
        &self,
        container: &ContainerRef,
        if_match: &str,
    ) -> Result<ImmutabilityPolicy>;

    async fn extend_immutability_policy(
        &self,
        container: &ContainerRef,
        days: u32,
        if_match: &str,
    ) -> Result<ImmutabilityPolicy>;

    async fn set_legal_hold(&self, container: &ContainerRef, tags: &LegalHoldTags)
    -> Result<LegalHold>;

    async fn clear_legal_hold(
        &self,
        container: &ContainerRef,
        tags: &LegalHoldTags,
    ) -> Result<LegalHold>;

    async fn lease(
        &self,
        container: &ContainerRef,
        request: &LeaseRequest,
    ) -> Result<LeaseContainerResponse>;
}

#[async_trait]
pub trait PostgresServerOperations: Send + Sync {
    async fn create(&self, params: &PostgresServerCreate) -> Result<PostgresServer>;

    async fn update(&self, params: &PostgresServerUpdate) -> Result<PostgresServer>;

    async fn delete(&self, server: &ServerRef) -> Result<()>;

    async fn get(&self, server: &ServerRef) -> Result<PostgresServer>;

    async fn list(&self) -> Result<Vec<PostgresServer>>;

    async fn list_by_resource_group(&self, resource_group: &str) -> Result<Vec<PostgresServer>>;

    async fn restart(&self, server: &ServerRef) -> Result<()>;
}

#[async_trait]
pub trait VmExtensionOperations: Send + Sync {
    async fn create_or_update(&self, params: &VmExtensionParams)
    -> Result<VirtualMachineExtension>;

    async fn delete(&self, extension: &VmExtensionRef) -> Result<()>;

    async fn get(&self, extension: &VmExtensionRef) -> Result<VirtualMachineExtension>;

    async fn list(&self, vm_name: &str, resource_group: &str)
    -> Result<Vec<VirtualMachineExtension>>;
}
