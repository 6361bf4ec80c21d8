use crate::args::{ContainerArgs, parse_tag, tags};
use armflow_cloud::model::PublicAccess;
use armflow_cloud::states::{resource_group, storage_container};
use armflow_cloud::{ConnectionAuth, ContainerSpec, Context, ResourceGroupSpec, StateResult};
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum StateCommands {
    /// Resource group states
    #[command(subcommand)]
    ResourceGroup(ResourceGroupState),
    /// Blob container states
    #[command(subcommand)]
    Container(ContainerState),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ResourceGroupState {
    /// Ensure the resource group exists with these tags
    Present {
        #[arg(long)]
        name: String,
        /// Location; cannot change once created
        #[arg(short, long)]
        location: String,
        /// Id of the resource that manages this group
        #[arg(long)]
        managed_by: Option<String>,
        /// Tag as key=value (repeatable)
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },
    /// Ensure the resource group does not exist
    Absent {
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ContainerState {
    /// Ensure the container exists with these properties
    Present {
        #[command(flatten)]
        container: ContainerArgs,
        /// Container, Blob or None
        #[arg(long)]
        public_access: Option<PublicAccess>,
        /// Metadata as key=value (repeatable)
        #[arg(long = "metadata", value_parser = parse_tag)]
        metadata: Vec<(String, String)>,
    },
    /// Ensure the container does not exist
    Absent {
        #[command(flatten)]
        container: ContainerArgs,
    },
}

pub async fn handle(
    ctx: &Context,
    command: &StateCommands,
    connection_auth: Option<&ConnectionAuth>,
) -> StateResult {
    match command {
        StateCommands::ResourceGroup(ResourceGroupState::Present {
            name,
            location,
            managed_by,
            tags: pairs,
        }) => {
            let mut spec = ResourceGroupSpec::new(name, location);
            spec.managed_by = managed_by.clone();
            spec.tags = tags(pairs);
            resource_group::present(ctx, &spec, connection_auth).await
        }
        StateCommands::ResourceGroup(ResourceGroupState::Absent { name }) => {
            resource_group::absent(ctx, name, connection_auth).await
        }
        StateCommands::Container(ContainerState::Present {
            container,
            public_access,
            metadata,
        }) => {
            let mut spec =
                ContainerSpec::new(&container.name, &container.account, &container.resource_group);
            spec.public_access = *public_access;
            spec.metadata = tags(metadata);
            storage_container::present(ctx, &spec, connection_auth).await
        }
        StateCommands::Container(ContainerState::Absent { container }) => {
            storage_container::absent(ctx, &container.container_ref(), connection_auth).await
        }
    }
}
