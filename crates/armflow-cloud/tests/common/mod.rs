use armflow_cloud::model::{
    BlobContainer, ContainerParams, ContainerRef, ImmutabilityPolicy, ImmutabilityPolicyParams,
    LeaseAction, LeaseContainerResponse, LeaseRequest, LegalHold, LegalHoldTags, PostgresServer,
    PostgresServerCreate, PostgresServerUpdate, ResourceGroup, ResourceGroupParams, ServerRef,
    Tags, VirtualMachineExtension, VmExtensionParams, VmExtensionRef,
};
use armflow_cloud::{
    ArmError, BlobContainerOperations, ClientFactory, ConnectionAuth, Context, Credentials,
    ManagementClient, PostgresServerOperations, ResourceGroupOperations, Result,
    VmExtensionOperations,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Operations that change remote state
const MUTATIONS: &[&str] = &[
    "create",
    "update",
    "create_or_update",
    "delete",
    "restart",
    "create_or_update_immutability_policy",
    "delete_immutability_policy",
    "lock_immutability_policy",
    "extend_immutability_policy",
    "set_legal_hold",
    "clear_legal_hold",
    "lease",
];

#[derive(Default)]
struct Inner {
    groups: BTreeMap<String, ResourceGroup>,
    containers: BTreeMap<String, BlobContainer>,
    policies: BTreeMap<String, ImmutabilityPolicy>,
    servers: BTreeMap<String, PostgresServer>,
    extensions: BTreeMap<String, VirtualMachineExtension>,
    calls: Vec<String>,
    connected: Vec<String>,
    reject_writes: Option<(u16, String, String)>,
    reject_reads: Option<(u16, String, String)>,
}

/// In-memory management API that records every call
#[derive(Clone, Default)]
pub struct FakeArm {
    inner: Arc<Mutex<Inner>>,
}

#[allow(dead_code)]
impl FakeArm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Context {
        Context::new(Arc::new(self.clone())).with_acct(Some(acct()))
    }

    pub fn with_group(self, name: &str, location: &str, tags: &[(&str, &str)]) -> Self {
        let group = ResourceGroup {
            id: Some(format!("/subscriptions/sub-1/resourceGroups/{}", name)),
            name: name.to_string(),
            resource_type: Some("Microsoft.Resources/resourceGroups".to_string()),
            location: location.to_string(),
            managed_by: None,
            tags: tag_map(tags),
            properties: None,
        };
        self.lock().groups.insert(name.to_string(), group);
        self
    }

    pub fn with_container(self, container: &ContainerRef, params: &ContainerParams) -> Self {
        let model = container_model(container, params);
        self.lock().containers.insert(container_key(container), model);
        self
    }

    pub fn with_server(self, name: &str, resource_group: &str) -> Self {
        let server = PostgresServer {
            id: None,
            name: name.to_string(),
            resource_type: None,
            location: "eastus".to_string(),
            tags: Tags::new(),
            sku: None,
            administrator_login: Some("pgadmin".to_string()),
            version: None,
            ssl_enforcement: None,
            user_visible_state: Some("Ready".to_string()),
            fully_qualified_domain_name: None,
            earliest_restore_date: None,
            storage_profile: None,
        };
        self.lock()
            .servers
            .insert(format!("{}/{}", resource_group, name), server);
        self
    }

    /// Every write fails with the given ARM error
    pub fn rejecting_writes(self, status: u16, code: &str, message: &str) -> Self {
        self.lock().reject_writes = Some((status, code.to_string(), message.to_string()));
        self
    }

    /// Every read fails with the given ARM error
    pub fn rejecting_reads(self, status: u16, code: &str, message: &str) -> Self {
        self.lock().reject_reads = Some((status, code.to_string(), message.to_string()));
        self
    }

    pub fn group(&self, name: &str) -> Option<ResourceGroup> {
        self.lock().groups.get(name).cloned()
    }

    pub fn container(&self, container: &ContainerRef) -> Option<BlobContainer> {
        self.lock().containers.get(&container_key(container)).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Calls that would change remote state
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| {
                call.split_once('.')
                    .is_some_and(|(_, op)| MUTATIONS.contains(&op))
            })
            .collect()
    }

    /// Subscriptions of every client handed out
    pub fn connected(&self) -> Vec<String> {
        self.lock().connected.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn record(&self, call: &str) {
        self.lock().calls.push(call.to_string());
    }

    fn read(&self, call: &str) -> Result<()> {
        self.record(call);
        match &self.lock().reject_reads {
            Some((status, code, message)) => Err(ArmError::rejected(*status, code, message)),
            None => Ok(()),
        }
    }

    fn write(&self, call: &str) -> Result<()> {
        self.record(call);
        match &self.lock().reject_writes {
            Some((status, code, message)) => Err(ArmError::rejected(*status, code, message)),
            None => Ok(()),
        }
    }
}

pub fn acct() -> ConnectionAuth {
    ConnectionAuth {
        subscription_id: Some("sub-1".to_string()),
        tenant: Some("tenant-1".to_string()),
        client_id: Some("client-1".to_string()),
        secret: Some("s3cret".to_string()),
        ..Default::default()
    }
}

pub fn tag_map(tags: &[(&str, &str)]) -> Tags {
    tags.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn not_found(what: &str) -> ArmError {
    ArmError::rejected(404, "ResourceNotFound", format!("{} was not found.", what))
}

fn container_key(container: &ContainerRef) -> String {
    format!(
        "{}/{}/{}",
        container.resource_group, container.account, container.name
    )
}

fn container_model(container: &ContainerRef, params: &ContainerParams) -> BlobContainer {
    BlobContainer {
        id: Some(format!(
            "/subscriptions/sub-1/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}/blobServices/default/containers/{}",
            container.resource_group, container.account, container.name
        )),
        name: container.name.clone(),
        resource_type: None,
        etag: Some("\"0x1\"".to_string()),
        public_access: params.public_access,
        metadata: params.metadata.clone().unwrap_or_default(),
        last_modified_time: None,
        lease_status: Some("Unlocked".to_string()),
        lease_state: Some("Available".to_string()),
        lease_duration: None,
        has_immutability_policy: Some(false),
        has_legal_hold: Some(false),
        immutability_policy: None,
        legal_hold: None,
    }
}

impl ClientFactory for FakeArm {
    fn name(&self) -> &str {
        "fake"
    }

    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn ManagementClient>> {
        self.lock()
            .connected
            .push(credentials.subscription_id.clone());
        Ok(Arc::new(self.clone()))
    }
}

impl ManagementClient for FakeArm {
    fn subscription_id(&self) -> &str {
        "sub-1"
    }

    fn resource_groups(&self) -> &dyn ResourceGroupOperations {
        self
    }

    fn blob_containers(&self) -> &dyn BlobContainerOperations {
        self
    }

    fn postgresql_servers(&self) -> &dyn PostgresServerOperations {
        self
    }

    fn vm_extensions(&self) -> &dyn VmExtensionOperations {
        self
    }
}

#[async_trait]
impl ResourceGroupOperations for FakeArm {
    async fn get(&self, name: &str) -> Result<ResourceGroup> {
        self.read("resource_groups.get")?;
        self.group(name)
            .ok_or_else(|| not_found(&format!("Resource group '{}'", name)))
    }

    async fn check_existence(&self, name: &str) -> Result<bool> {
        self.read("resource_groups.check_existence")?;
        Ok(self.group(name).is_some())
    }

    async fn create_or_update(&self, params: &ResourceGroupParams) -> Result<ResourceGroup> {
        self.write("resource_groups.create_or_update")?;
        let group = ResourceGroup {
            id: Some(format!("/subscriptions/sub-1/resourceGroups/{}", params.name)),
            name: params.name.clone(),
            resource_type: Some("Microsoft.Resources/resourceGroups".to_string()),
            location: params.location.clone(),
            managed_by: params.managed_by.clone(),
            tags: params.tags.clone().unwrap_or_default(),
            properties: None,
        };
        self.lock().groups.insert(params.name.clone(), group.clone());
        Ok(group)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.write("resource_groups.delete")?;
        self.lock()
            .groups
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(&format!("Resource group '{}'", name)))
    }

    async fn list(&self) -> Result<Vec<ResourceGroup>> {
        self.read("resource_groups.list")?;
        Ok(self.lock().groups.values().cloned().collect())
    }
}

#[async_trait]
impl BlobContainerOperations for FakeArm {
    async fn create(
        &self,
        container: &ContainerRef,
        params: &ContainerParams,
    ) -> Result<BlobContainer> {
        self.write("blob_containers.create")?;
        let model = container_model(container, params);
        self.lock()
            .containers
            .insert(container_key(container), model.clone());
        Ok(model)
    }

    async fn update(
        &self,
        container: &ContainerRef,
        params: &ContainerParams,
    ) -> Result<BlobContainer> {
        self.write("blob_containers.update")?;
        let mut inner = self.lock();
        let existing = inner
            .containers
            .get_mut(&container_key(container))
            .ok_or_else(|| not_found("The specified container"))?;
        if let Some(access) = params.public_access {
            existing.public_access = Some(access);
        }
        if let Some(metadata) = &params.metadata {
            existing.metadata = metadata.clone();
        }
        Ok(existing.clone())
    }

    async fn get(&self, container: &ContainerRef) -> Result<BlobContainer> {
        self.read("blob_containers.get")?;
        self.container(container)
            .ok_or_else(|| not_found("The specified container"))
    }

    async fn delete(&self, container: &ContainerRef) -> Result<()> {
        self.write("blob_containers.delete")?;
        self.lock()
            .containers
            .remove(&container_key(container))
            .map(|_| ())
            .ok_or_else(|| not_found("The specified container"))
    }

    async fn list(&self, account: &str, resource_group: &str) -> Result<Vec<BlobContainer>> {
        self.read("blob_containers.list")?;
        let prefix = format!("{}/{}/", resource_group, account);
        Ok(self
            .lock()
            .containers
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn get_immutability_policy(
        &self,
        container: &ContainerRef,
        _if_match: Option<&str>,
    ) -> Result<ImmutabilityPolicy> {
        self.read("blob_containers.get_immutability_policy")?;
        self.lock()
            .policies
            .get(&container_key(container))
            .cloned()
            .ok_or_else(|| not_found("Immutability policy"))
    }

    async fn create_or_update_immutability_policy(
        &self,
        container: &ContainerRef,
        params: &ImmutabilityPolicyParams,
    ) -> Result<ImmutabilityPolicy> {
        self.write("blob_containers.create_or_update_immutability_policy")?;
        let policy = ImmutabilityPolicy {
            id: None,
            name: Some("default".to_string()),
            etag: Some("\"8d0\"".to_string()),
            immutability_period_since_creation_in_days: Some(
                params.immutability_period_since_creation_in_days,
            ),
            state: Some("Unlocked".to_string()),
        };
        self.lock()
            .policies
            .insert(container_key(container), policy.clone());
        Ok(policy)
    }

    async fn delete_immutability_policy(
        &self,
        container: &ContainerRef,
        _if_match: &str,
    ) -> Result<ImmutabilityPolicy> {
        self.write("blob_containers.delete_immutability_policy")?;
        self.lock()
            .policies
            .remove(&container_key(container))
            .ok_or_else(|| not_found("Immutability policy"))
    }

    async fn lock_immutability_policy(
        &self,
        container: &ContainerRef,
        _if_match: &str,
    ) -> Result<ImmutabilityPolicy> {
        self.write("blob_containers.lock_immutability_policy")?;
        let mut inner = self.lock();
        let policy = inner
            .policies
            .get_mut(&container_key(container))
            .ok_or_else(|| not_found("Immutability policy"))?;
        policy.state = Some("Locked".to_string());
        Ok(policy.clone())
    }

    async fn extend_immutability_policy(
        &self,
        container: &ContainerRef,
        days: u32,
        _if_match: &str,
    ) -> Result<ImmutabilityPolicy> {
        self.write("blob_containers.extend_immutability_policy")?;
        let mut inner = self.lock();
        let policy = inner
            .policies
            .get_mut(&container_key(container))
            .ok_or_else(|| not_found("Immutability policy"))?;
        policy.immutability_period_since_creation_in_days = Some(days);
        Ok(policy.clone())
    }

    async fn set_legal_hold(
        &self,
        _container: &ContainerRef,
        tags: &LegalHoldTags,
    ) -> Result<LegalHold> {
        self.write("blob_containers.set_legal_hold")?;
        Ok(LegalHold {
            has_legal_hold: true,
            tags: tags.as_slice().to_vec(),
        })
    }

    async fn clear_legal_hold(
        &self,
        _container: &ContainerRef,
        _tags: &LegalHoldTags,
    ) -> Result<LegalHold> {
        self.write("blob_containers.clear_legal_hold")?;
        Ok(LegalHold {
            has_legal_hold: false,
            tags: Vec::new(),
        })
    }

    async fn lease(
        &self,
        _container: &ContainerRef,
        request: &LeaseRequest,
    ) -> Result<LeaseContainerResponse> {
        self.write("blob_containers.lease")?;
        let lease_id = match request.action {
            LeaseAction::Acquire => Some("lease-1".to_string()),
            LeaseAction::Change => request.proposed_lease_id.clone(),
            LeaseAction::Renew => request.lease_id.clone(),
            LeaseAction::Release | LeaseAction::Break => None,
        };
        Ok(LeaseContainerResponse {
            lease_id,
            lease_time_seconds: request.break_period.map(|p| p.to_string()),
        })
    }
}

#[async_trait]
impl PostgresServerOperations for FakeArm {
    async fn create(&self, params: &PostgresServerCreate) -> Result<PostgresServer> {
        self.write("postgresql_servers.create")?;
        let server = PostgresServer {
            id: None,
            name: params.server.name.clone(),
            resource_type: None,
            location: params.location.clone(),
            tags: params.tags.clone().unwrap_or_default(),
            sku: params.sku.clone(),
            administrator_login: Some(params.login.clone()),
            version: params.version,
            ssl_enforcement: params.ssl_enforcement,
            user_visible_state: Some("Ready".to_string()),
            fully_qualified_domain_name: None,
            earliest_restore_date: None,
            storage_profile: params.storage_profile.clone(),
        };
        self.lock().servers.insert(
            format!("{}/{}", params.server.resource_group, params.server.name),
            server.clone(),
        );
        Ok(server)
    }

    async fn update(&self, params: &PostgresServerUpdate) -> Result<PostgresServer> {
        self.write("postgresql_servers.update")?;
        let mut inner = self.lock();
        let server = inner
            .servers
            .get_mut(&format!(
                "{}/{}",
                params.server.resource_group, params.server.name
            ))
            .ok_or_else(|| not_found("Server"))?;
        if let Some(tags) = &params.tags {
            server.tags = tags.clone();
        }
        if let Some(sku) = &params.sku {
            server.sku = Some(sku.clone());
        }
        Ok(server.clone())
    }

    async fn delete(&self, server: &ServerRef) -> Result<()> {
        self.write("postgresql_servers.delete")?;
        self.lock()
            .servers
            .remove(&format!("{}/{}", server.resource_group, server.name))
            .map(|_| ())
            .ok_or_else(|| not_found("Server"))
    }

    async fn get(&self, server: &ServerRef) -> Result<PostgresServer> {
        self.read("postgresql_servers.get")?;
        self.lock()
            .servers
            .get(&format!("{}/{}", server.resource_group, server.name))
            .cloned()
            .ok_or_else(|| not_found("Server"))
    }

    async fn list(&self) -> Result<Vec<PostgresServer>> {
        self.read("postgresql_servers.list")?;
        Ok(self.lock().servers.values().cloned().collect())
    }

    async fn list_by_resource_group(&self, resource_group: &str) -> Result<Vec<PostgresServer>> {
        self.read("postgresql_servers.list_by_resource_group")?;
        let prefix = format!("{}/", resource_group);
        Ok(self
            .lock()
            .servers
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn restart(&self, server: &ServerRef) -> Result<()> {
        self.write("postgresql_servers.restart")?;
        if self
            .lock()
            .servers
            .contains_key(&format!("{}/{}", server.resource_group, server.name))
        {
            Ok(())
        } else {
            Err(not_found("Server"))
        }
    }
}

#[async_trait]
impl VmExtensionOperations for FakeArm {
    async fn create_or_update(
        &self,
        params: &VmExtensionParams,
    ) -> Result<VirtualMachineExtension> {
        self.write("vm_extensions.create_or_update")?;
        let ext = &params.extension;
        let model = VirtualMachineExtension {
            id: None,
            name: ext.name.clone(),
            resource_type: None,
            location: Some(params.location.clone()),
            tags: params.tags.clone().unwrap_or_default(),
            publisher: Some(params.publisher.clone()),
            virtual_machine_extension_type: Some(params.extension_type.clone()),
            type_handler_version: Some(params.version.clone()),
            auto_upgrade_minor_version: params.auto_upgrade_minor_version,
            settings: Some(params.settings.clone()),
            provisioning_state: Some("Succeeded".to_string()),
        };
        self.lock().extensions.insert(
            format!("{}/{}/{}", ext.resource_group, ext.vm_name, ext.name),
            model.clone(),
        );
        Ok(model)
    }

    async fn delete(&self, extension: &VmExtensionRef) -> Result<()> {
        self.write("vm_extensions.delete")?;
        self.lock()
            .extensions
            .remove(&format!(
                "{}/{}/{}",
                extension.resource_group, extension.vm_name, extension.name
            ))
            .map(|_| ())
            .ok_or_else(|| not_found("Extension"))
    }

    async fn get(&self, extension: &VmExtensionRef) -> Result<VirtualMachineExtension> {
        self.read("vm_extensions.get")?;
        self.lock()
            .extensions
            .get(&format!(
                "{}/{}/{}",
                extension.resource_group, extension.vm_name, extension.name
            ))
            .cloned()
            .ok_or_else(|| not_found("Extension"))
    }

    async fn list(
        &self,
        vm_name: &str,
        resource_group: &str,
    ) -> Result<Vec<VirtualMachineExtension>> {
        self.read("vm_extensions.list")?;
        let prefix = format!("{}/{}/", resource_group, vm_name);
        Ok(self
            .lock()
            .extensions
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, e)| e.clone())
            .collect())
    }
}
