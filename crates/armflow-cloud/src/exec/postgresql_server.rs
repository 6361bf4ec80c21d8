//! PostgreSQL server accessors

use super::{check, keyed, normalize, succeeded};
use crate::model::resource_group::validate_group_name;
use crate::model::{PostgresServer, PostgresServerCreate, PostgresServerUpdate, ServerRef};
use crate::outcome::Outcome;
use crate::provider::ManagementClient;
use std::collections::BTreeMap;

const SERVICE: &str = "postgresql";

/// Create a server, overwriting any existing one of the same name
pub async fn create(
    client: &dyn ManagementClient,
    params: &PostgresServerCreate,
) -> Outcome<PostgresServer> {
    check(SERVICE, "create", params.validate())?;
    normalize(SERVICE, "create", client.postgresql_servers().create(params).await)
}

pub async fn update(
    client: &dyn ManagementClient,
    params: &PostgresServerUpdate,
) -> Outcome<PostgresServer> {
    check(SERVICE, "update", params.validate())?;
    normalize(SERVICE, "update", client.postgresql_servers().update(params).await)
}

pub async fn delete(client: &dyn ManagementClient, server: &ServerRef) -> bool {
    if check(SERVICE, "delete", server.validate()).is_err() {
        return false;
    }
    succeeded(SERVICE, "delete", client.postgresql_servers().delete(server).await)
}

pub async fn get(client: &dyn ManagementClient, server: &ServerRef) -> Outcome<PostgresServer> {
    check(SERVICE, "get", server.validate())?;
    normalize(SERVICE, "get", client.postgresql_servers().get(server).await)
}

/// All servers in the subscription, keyed by name
pub async fn list(client: &dyn ManagementClient) -> Outcome<BTreeMap<String, PostgresServer>> {
    let servers = normalize(SERVICE, "list", client.postgresql_servers().list().await)?;
    Ok(keyed(servers, |s| s.name.as_str()))
}

/// All servers in one resource group, keyed by name
pub async fn list_by_resource_group(
    client: &dyn ManagementClient,
    resource_group: &str,
) -> Outcome<BTreeMap<String, PostgresServer>> {
    check(SERVICE, "list_by_resource_group", validate_group_name(resource_group))?;
    let servers = normalize(
        SERVICE,
        "list_by_resource_group",
        client
            .postgresql_servers()
            .list_by_resource_group(resource_group)
            .await,
    )?;
    Ok(keyed(servers, |s| s.name.as_str()))
}

pub async fn restart(client: &dyn ManagementClient, server: &ServerRef) -> bool {
    if check(SERVICE, "restart", server.validate()).is_err() {
        return false;
    }
    succeeded(SERVICE, "restart", client.postgresql_servers().restart(server).await)
}
