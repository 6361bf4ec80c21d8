use crate::args::{ContainerArgs, ExtensionArgs, ServerArgs, parse_json, parse_tag, tags};
use crate::output::Rendered;
use armflow_cloud::ManagementClient;
use armflow_cloud::exec::{postgresql_server, resource_group, storage_container, vm_extension};
use armflow_cloud::model::{
    ContainerParams, CreateMode, Enablement, ImmutabilityPolicyParams, LeaseAction, LeaseRequest,
    PostgresServerCreate, PostgresServerUpdate, PublicAccess, ResourceGroupParams, ServerVersion,
    Sku, StorageProfile, VmExtensionParams,
};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug, Clone)]
pub enum ExecCommands {
    /// Resource group operations
    #[command(subcommand)]
    ResourceGroup(ResourceGroupOp),
    /// Blob container operations
    #[command(subcommand)]
    Container(ContainerOp),
    /// Azure Database for PostgreSQL server operations
    #[command(subcommand)]
    PostgresqlServer(PostgresqlServerOp),
    /// Virtual machine extension operations
    #[command(subcommand)]
    VmExtension(VmExtensionOp),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ResourceGroupOp {
    Get {
        #[arg(long)]
        name: String,
    },
    CheckExistence {
        #[arg(long)]
        name: String,
    },
    CreateOrUpdate {
        #[arg(long)]
        name: String,
        #[arg(short, long)]
        location: String,
        #[arg(long)]
        managed_by: Option<String>,
        /// Tag as key=value (repeatable)
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },
    Delete {
        #[arg(long)]
        name: String,
    },
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ContainerOp {
    Create {
        #[command(flatten)]
        container: ContainerArgs,
        #[command(flatten)]
        properties: ContainerProperties,
    },
    /// Update properties; unspecified ones are left alone
    Update {
        #[command(flatten)]
        container: ContainerArgs,
        #[command(flatten)]
        properties: ContainerProperties,
    },
    Get {
        #[command(flatten)]
        container: ContainerArgs,
    },
    Delete {
        #[command(flatten)]
        container: ContainerArgs,
    },
    List {
        /// Storage account name
        #[arg(long)]
        account: String,
        #[arg(short = 'g', long)]
        resource_group: String,
    },
    GetImmutabilityPolicy {
        #[command(flatten)]
        container: ContainerArgs,
        #[arg(long)]
        if_match: Option<String>,
    },
    CreateOrUpdateImmutabilityPolicy {
        #[command(flatten)]
        container: ContainerArgs,
        /// Retention in days since blob creation
        #[arg(long)]
        days: u32,
        #[arg(long)]
        if_match: Option<String>,
    },
    DeleteImmutabilityPolicy {
        #[command(flatten)]
        container: ContainerArgs,
        #[arg(long)]
        if_match: String,
    },
    LockImmutabilityPolicy {
        #[command(flatten)]
        container: ContainerArgs,
        #[arg(long)]
        if_match: String,
    },
    ExtendImmutabilityPolicy {
        #[command(flatten)]
        container: ContainerArgs,
        #[arg(long)]
        days: u32,
        #[arg(long)]
        if_match: String,
    },
    SetLegalHold {
        #[command(flatten)]
        container: ContainerArgs,
        /// Legal hold tag (repeatable)
        #[arg(long = "tag", required = true)]
        tags: Vec<String>,
    },
    ClearLegalHold {
        #[command(flatten)]
        container: ContainerArgs,
        #[arg(long = "tag", required = true)]
        tags: Vec<String>,
    },
    Lease {
        #[command(flatten)]
        container: ContainerArgs,
        /// Acquire, Renew, Change, Release or Break
        #[arg(long)]
        action: LeaseAction,
        #[arg(long)]
        lease_id: Option<String>,
        /// Seconds before a broken lease ends (0-60)
        #[arg(long)]
        break_period: Option<u32>,
        /// Seconds, 15-60, or -1 for infinite
        #[arg(long, allow_hyphen_values = true)]
        lease_duration: Option<i32>,
        #[arg(long)]
        proposed_lease_id: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ContainerProperties {
    /// Container, Blob or None
    #[arg(long)]
    public_access: Option<PublicAccess>,
    /// Metadata as key=value (repeatable)
    #[arg(long = "metadata", value_parser = parse_tag)]
    metadata: Vec<(String, String)>,
}

impl ContainerProperties {
    fn params(&self) -> ContainerParams {
        ContainerParams {
            public_access: self.public_access,
            metadata: tags(&self.metadata),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum PostgresqlServerOp {
    Create {
        #[command(flatten)]
        server: ServerArgs,
        #[arg(short, long)]
        location: String,
        /// Administrator login; cannot change once created
        #[arg(long)]
        login: String,
        #[arg(long, env = "ARMFLOW_PG_PASSWORD", hide_env_values = true)]
        login_password: String,
        #[command(flatten)]
        settings: ServerSettings,
    },
    /// Update settings; unspecified ones are left alone
    Update {
        #[command(flatten)]
        server: ServerArgs,
        #[arg(long, env = "ARMFLOW_PG_PASSWORD", hide_env_values = true)]
        login_password: Option<String>,
        #[command(flatten)]
        settings: ServerSettings,
    },
    Delete {
        #[command(flatten)]
        server: ServerArgs,
    },
    Get {
        #[command(flatten)]
        server: ServerArgs,
    },
    /// All servers in the subscription, or in one resource group
    List {
        #[arg(short = 'g', long)]
        resource_group: Option<String>,
    },
    Restart {
        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServerSettings {
    /// SKU name, e.g. B_Gen5_1
    #[arg(long)]
    sku_name: Option<String>,
    /// Basic, GeneralPurpose or MemoryOptimized
    #[arg(long, requires = "sku_name")]
    sku_tier: Option<String>,
    #[arg(long, requires = "sku_name")]
    sku_capacity: Option<u32>,
    #[arg(long, requires = "sku_name")]
    sku_family: Option<String>,
    /// 9.5, 9.6, 10, 10.0, 10.2 or 11
    #[arg(long)]
    version: Option<ServerVersion>,
    #[arg(long)]
    ssl_enforcement: Option<Enablement>,
    #[arg(long)]
    storage_mb: Option<u64>,
    #[arg(long)]
    backup_retention_days: Option<u32>,
    #[arg(long)]
    geo_redundant_backup: Option<Enablement>,
    #[arg(long)]
    storage_autogrow: Option<Enablement>,
    /// Tag as key=value (repeatable)
    #[arg(long = "tag", value_parser = parse_tag)]
    tags: Vec<(String, String)>,
}

impl ServerSettings {
    fn sku(&self) -> Option<Sku> {
        self.sku_name.as_ref().map(|name| Sku {
            name: name.clone(),
            tier: self.sku_tier.clone(),
            capacity: self.sku_capacity,
            size: None,
            family: self.sku_family.clone(),
        })
    }

    fn storage_profile(&self) -> Option<StorageProfile> {
        let profile = StorageProfile {
            backup_retention_days: self.backup_retention_days,
            geo_redundant_backup: self.geo_redundant_backup,
            storage_mb: self.storage_mb,
            storage_autogrow: self.storage_autogrow,
        };
        (profile != StorageProfile::default()).then_some(profile)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum VmExtensionOp {
    CreateOrUpdate {
        #[command(flatten)]
        extension: ExtensionArgs,
        #[arg(short, long)]
        location: String,
        /// Handler publisher, e.g. Microsoft.Azure.Extensions
        #[arg(long)]
        publisher: String,
        /// Handler type, e.g. CustomScript
        #[arg(long)]
        extension_type: String,
        /// Handler version, e.g. 2.0
        #[arg(long)]
        version: String,
        /// Public settings as a JSON object
        #[arg(long, value_parser = parse_json, default_value = "{}")]
        settings: serde_json::Value,
        #[arg(long)]
        auto_upgrade_minor_version: Option<bool>,
        /// Tag as key=value (repeatable)
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },
    Delete {
        #[command(flatten)]
        extension: ExtensionArgs,
    },
    Get {
        #[command(flatten)]
        extension: ExtensionArgs,
    },
    List {
        #[arg(long)]
        vm_name: String,
        #[arg(short = 'g', long)]
        resource_group: String,
    },
}

pub async fn handle(client: &dyn ManagementClient, command: &ExecCommands) -> Rendered {
    match command {
        ExecCommands::ResourceGroup(op) => resource_group_op(client, op).await,
        ExecCommands::Container(op) => container_op(client, op).await,
        ExecCommands::PostgresqlServer(op) => postgresql_server_op(client, op).await,
        ExecCommands::VmExtension(op) => vm_extension_op(client, op).await,
    }
}

async fn resource_group_op(client: &dyn ManagementClient, op: &ResourceGroupOp) -> Rendered {
    match op {
        ResourceGroupOp::Get { name } => {
            Rendered::outcome(&resource_group::get(client, name).await)
        }
        ResourceGroupOp::CheckExistence { name } => {
            Rendered::outcome(&resource_group::check_existence(client, name).await)
        }
        ResourceGroupOp::CreateOrUpdate {
            name,
            location,
            managed_by,
            tags: pairs,
        } => {
            let params = ResourceGroupParams::new(name, location)
                .with_managed_by(managed_by.clone())
                .with_tags(tags(pairs));
            Rendered::outcome(&resource_group::create_or_update(client, &params).await)
        }
        ResourceGroupOp::Delete { name } => {
            Rendered::flag(resource_group::delete(client, name).await)
        }
        ResourceGroupOp::List => Rendered::outcome(&resource_group::list(client).await),
    }
}

async fn container_op(client: &dyn ManagementClient, op: &ContainerOp) -> Rendered {
    match op {
        ContainerOp::Create {
            container,
            properties,
        } => Rendered::outcome(
            &storage_container::create(client, &container.container_ref(), &properties.params())
                .await,
        ),
        ContainerOp::Update {
            container,
            properties,
        } => Rendered::outcome(
            &storage_container::update(client, &container.container_ref(), &properties.params())
                .await,
        ),
        ContainerOp::Get { container } => {
            Rendered::outcome(&storage_container::get(client, &container.container_ref()).await)
        }
        ContainerOp::Delete { container } => {
            Rendered::flag(storage_container::delete(client, &container.container_ref()).await)
        }
        ContainerOp::List {
            account,
            resource_group,
        } => Rendered::outcome(&storage_container::list(client, account, resource_group).await),
        ContainerOp::GetImmutabilityPolicy {
            container,
            if_match,
        } => Rendered::outcome(
            &storage_container::get_immutability_policy(
                client,
                &container.container_ref(),
                if_match.as_deref(),
            )
            .await,
        ),
        ContainerOp::CreateOrUpdateImmutabilityPolicy {
            container,
            days,
            if_match,
        } => {
            let params = ImmutabilityPolicyParams::new(*days, if_match.clone());
            Rendered::outcome(
                &storage_container::create_or_update_immutability_policy(
                    client,
                    &container.container_ref(),
                    &params,
                )
                .await,
            )
        }
        ContainerOp::DeleteImmutabilityPolicy {
            container,
            if_match,
        } => Rendered::flag(
            storage_container::delete_immutability_policy(
                client,
                &container.container_ref(),
                if_match,
            )
            .await,
        ),
        ContainerOp::LockImmutabilityPolicy {
            container,
            if_match,
        } => Rendered::outcome(
            &storage_container::lock_immutability_policy(
                client,
                &container.container_ref(),
                if_match,
            )
            .await,
        ),
        ContainerOp::ExtendImmutabilityPolicy {
            container,
            days,
            if_match,
        } => Rendered::outcome(
            &storage_container::extend_immutability_policy(
                client,
                &container.container_ref(),
                *days,
                if_match,
            )
            .await,
        ),
        ContainerOp::SetLegalHold { container, tags } => Rendered::outcome(
            &storage_container::set_legal_hold(client, &container.container_ref(), tags).await,
        ),
        ContainerOp::ClearLegalHold { container, tags } => Rendered::outcome(
            &storage_container::clear_legal_hold(client, &container.container_ref(), tags).await,
        ),
        ContainerOp::Lease {
            container,
            action,
            lease_id,
            break_period,
            lease_duration,
            proposed_lease_id,
        } => {
            let request = LeaseRequest::new(*action)
                .with_lease_id(lease_id.clone())
                .with_break_period(*break_period)
                .with_lease_duration(*lease_duration)
                .with_proposed_lease_id(proposed_lease_id.clone());
            Rendered::outcome(
                &storage_container::lease(client, &container.container_ref(), &request).await,
            )
        }
    }
}

async fn postgresql_server_op(client: &dyn ManagementClient, op: &PostgresqlServerOp) -> Rendered {
    match op {
        PostgresqlServerOp::Create {
            server,
            location,
            login,
            login_password,
            settings,
        } => {
            let params = PostgresServerCreate {
                server: server.server_ref(),
                location: location.clone(),
                sku: settings.sku(),
                version: settings.version,
                ssl_enforcement: settings.ssl_enforcement,
                storage_profile: settings.storage_profile(),
                login: login.clone(),
                login_password: login_password.clone(),
                create_mode: CreateMode::Default,
                tags: tags(&settings.tags),
            };
            Rendered::outcome(&postgresql_server::create(client, &params).await)
        }
        PostgresqlServerOp::Update {
            server,
            login_password,
            settings,
        } => {
            let params = PostgresServerUpdate {
                server: server.server_ref(),
                sku: settings.sku(),
                version: settings.version,
                ssl_enforcement: settings.ssl_enforcement,
                storage_profile: settings.storage_profile(),
                login_password: login_password.clone(),
                tags: tags(&settings.tags),
            };
            Rendered::outcome(&postgresql_server::update(client, &params).await)
        }
        PostgresqlServerOp::Delete { server } => {
            Rendered::flag(postgresql_server::delete(client, &server.server_ref()).await)
        }
        PostgresqlServerOp::Get { server } => {
            Rendered::outcome(&postgresql_server::get(client, &server.server_ref()).await)
        }
        PostgresqlServerOp::List { resource_group } => match resource_group {
            Some(group) => Rendered::outcome(
                &postgresql_server::list_by_resource_group(client, group).await,
            ),
            None => Rendered::outcome(&postgresql_server::list(client).await),
        },
        PostgresqlServerOp::Restart { server } => {
            Rendered::flag(postgresql_server::restart(client, &server.server_ref()).await)
        }
    }
}

async fn vm_extension_op(client: &dyn ManagementClient, op: &VmExtensionOp) -> Rendered {
    match op {
        VmExtensionOp::CreateOrUpdate {
            extension,
            location,
            publisher,
            extension_type,
            version,
            settings,
            auto_upgrade_minor_version,
            tags: pairs,
        } => {
            let params = VmExtensionParams {
                extension: extension.extension_ref(),
                location: location.clone(),
                publisher: publisher.clone(),
                extension_type: extension_type.clone(),
                version: version.clone(),
                settings: settings.clone(),
                auto_upgrade_minor_version: *auto_upgrade_minor_version,
                tags: tags(pairs),
            };
            Rendered::outcome(&vm_extension::create_or_update(client, &params).await)
        }
        VmExtensionOp::Delete { extension } => {
            Rendered::flag(vm_extension::delete(client, &extension.extension_ref()).await)
        }
        VmExtensionOp::Get { extension } => {
            Rendered::outcome(&vm_extension::get(client, &extension.extension_ref()).await)
        }
        VmExtensionOp::List {
            vm_name,
            resource_group,
        } => Rendered::outcome(&vm_extension::list(client, vm_name, resource_group).await),
    }
}
