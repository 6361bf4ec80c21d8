mod common;

use armflow_cloud::exec::{postgresql_server, resource_group, storage_container, vm_extension};
use armflow_cloud::model::{
    ContainerParams, ContainerRef, CreateMode, ImmutabilityPolicyParams, LeaseAction,
    LeaseRequest, PostgresServerCreate, PostgresServerUpdate, ResourceGroupParams, ServerRef, Sku,
    VmExtensionParams, VmExtensionRef,
};
use armflow_cloud::outcome::to_value;
use armflow_cloud::{FailureKind, ManagementClient};
use common::{FakeArm, tag_map};
use serde_json::json;

fn client(arm: &FakeArm) -> &dyn ManagementClient {
    arm
}

#[tokio::test]
async fn test_get_missing_group_is_error_shaped() {
    let arm = FakeArm::new();

    let outcome = resource_group::get(client(&arm), "rg-missing").await;

    let failure = outcome.clone().unwrap_err();
    assert_eq!(failure.kind, FailureKind::NotFound);
    let value = to_value(&outcome);
    let message = value["error"].as_str().expect("error string");
    assert!(message.contains("ResourceNotFound"));
    assert_eq!(value.as_object().map(|m| m.len()), Some(1));
}

#[tokio::test]
async fn test_group_accessors() {
    let arm = FakeArm::new().with_group("rg1", "eastus", &[]);

    assert_eq!(
        resource_group::check_existence(client(&arm), "rg1").await,
        Ok(true)
    );
    assert_eq!(
        resource_group::check_existence(client(&arm), "rg2").await,
        Ok(false)
    );

    let params = ResourceGroupParams::new("rg2", "westus")
        .with_tags(Some(tag_map(&[("owner", "data")])));
    let created = resource_group::create_or_update(client(&arm), &params)
        .await
        .unwrap();
    assert_eq!(created.location, "westus");

    let groups = resource_group::list(client(&arm)).await.unwrap();
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["rg1", "rg2"]);

    assert!(resource_group::delete(client(&arm), "rg2").await);
    assert!(!resource_group::delete(client(&arm), "rg2").await);
}

#[tokio::test]
async fn test_invalid_group_name_never_dispatches() {
    let arm = FakeArm::new();

    let outcome = resource_group::get(client(&arm), "bad name.").await;

    let failure = outcome.unwrap_err();
    assert_eq!(failure.kind, FailureKind::RequestBuild);
    assert!(
        failure
            .message
            .starts_with("The object model could not be built.")
    );
    assert!(!resource_group::delete(client(&arm), "").await);
    assert!(arm.calls().is_empty());
}

#[tokio::test]
async fn test_remote_rejection_message() {
    let arm = FakeArm::new().rejecting_reads(403, "AuthorizationFailed", "Denied.");

    let failure = resource_group::list(client(&arm)).await.unwrap_err();

    assert_eq!(failure.kind, FailureKind::RemoteRejection);
    assert_eq!(
        failure.message,
        "Azure Error: AuthorizationFailed\nMessage: Denied."
    );
}

fn logs() -> ContainerRef {
    ContainerRef::new("logs", "acct1", "rg1")
}

#[tokio::test]
async fn test_container_accessors() {
    let arm = FakeArm::new();
    let params = ContainerParams {
        public_access: None,
        metadata: Some(tag_map(&[("team", "ops")])),
    };

    let created = storage_container::create(client(&arm), &logs(), &params)
        .await
        .unwrap();
    assert_eq!(created.name, "logs");

    let listed = storage_container::list(client(&arm), "acct1", "rg1")
        .await
        .unwrap();
    assert!(listed.contains_key("logs"));

    assert!(storage_container::delete(client(&arm), &logs()).await);
    assert!(!storage_container::delete(client(&arm), &logs()).await);
    assert!(storage_container::get(client(&arm), &logs()).await.is_err());
}

#[tokio::test]
async fn test_immutability_policy_lifecycle() {
    let arm = FakeArm::new();

    let policy = storage_container::create_or_update_immutability_policy(
        client(&arm),
        &logs(),
        &ImmutabilityPolicyParams::new(30, None),
    )
    .await
    .unwrap();
    assert_eq!(policy.immutability_period_since_creation_in_days, Some(30));
    let etag = policy.etag.unwrap();

    let locked = storage_container::lock_immutability_policy(client(&arm), &logs(), &etag)
        .await
        .unwrap();
    assert_eq!(locked.state.as_deref(), Some("Locked"));

    let extended =
        storage_container::extend_immutability_policy(client(&arm), &logs(), 60, &etag)
            .await
            .unwrap();
    assert_eq!(extended.immutability_period_since_creation_in_days, Some(60));

    assert!(storage_container::delete_immutability_policy(client(&arm), &logs(), &etag).await);
}

#[tokio::test]
async fn test_immutability_policy_validation() {
    let arm = FakeArm::new();

    let zero = storage_container::create_or_update_immutability_policy(
        client(&arm),
        &logs(),
        &ImmutabilityPolicyParams::new(0, None),
    )
    .await;
    assert_eq!(zero.unwrap_err().kind, FailureKind::RequestBuild);

    let no_etag = storage_container::lock_immutability_policy(client(&arm), &logs(), " ").await;
    assert_eq!(no_etag.unwrap_err().kind, FailureKind::RequestBuild);

    assert!(arm.calls().is_empty());
}

#[tokio::test]
async fn test_legal_hold_tags_are_normalized() {
    let arm = FakeArm::new();

    let hold = storage_container::set_legal_hold(
        client(&arm),
        &logs(),
        &["Audit2024".to_string(), "audit2024".to_string()],
    )
    .await
    .unwrap();
    assert!(hold.has_legal_hold);
    assert_eq!(hold.tags, vec!["audit2024"]);

    let bad = storage_container::set_legal_hold(client(&arm), &logs(), &["no".to_string()]).await;
    assert_eq!(bad.unwrap_err().kind, FailureKind::RequestBuild);

    let cleared =
        storage_container::clear_legal_hold(client(&arm), &logs(), &["audit2024".to_string()])
            .await
            .unwrap();
    assert!(!cleared.has_legal_hold);
}

#[tokio::test]
async fn test_lease_returns_lease_result() {
    let arm = FakeArm::new();

    let acquire = LeaseRequest::new(LeaseAction::Acquire).with_lease_duration(Some(-1));
    let lease = storage_container::lease(client(&arm), &logs(), &acquire)
        .await
        .unwrap();
    assert_eq!(lease.lease_id.as_deref(), Some("lease-1"));

    let renew = LeaseRequest::new(LeaseAction::Renew);
    let missing_id = storage_container::lease(client(&arm), &logs(), &renew).await;
    assert_eq!(missing_id.unwrap_err().kind, FailureKind::RequestBuild);

    let value = to_value(&storage_container::lease(client(&arm), &logs(), &acquire).await);
    assert_eq!(value, json!({"lease_id": "lease-1"}));
}

fn server() -> ServerRef {
    ServerRef::new("pg1", "rg1")
}

#[tokio::test]
async fn test_postgresql_server_accessors() {
    let arm = FakeArm::new().with_server("pg0", "rg0");

    let create = PostgresServerCreate {
        server: server(),
        location: "eastus".to_string(),
        sku: Some(Sku {
            name: "B_Gen5_1".to_string(),
            tier: Some("Basic".to_string()),
            capacity: Some(1),
            size: None,
            family: Some("Gen5".to_string()),
        }),
        version: None,
        ssl_enforcement: None,
        storage_profile: None,
        login: "pgadmin".to_string(),
        login_password: "P@ssw0rd!".to_string(),
        create_mode: CreateMode::Default,
        tags: None,
    };
    let created = postgresql_server::create(client(&arm), &create)
        .await
        .unwrap();
    assert_eq!(created.administrator_login.as_deref(), Some("pgadmin"));

    let update = PostgresServerUpdate {
        server: server(),
        sku: None,
        version: None,
        ssl_enforcement: None,
        storage_profile: None,
        login_password: None,
        tags: Some(tag_map(&[("env", "prod")])),
    };
    let updated = postgresql_server::update(client(&arm), &update)
        .await
        .unwrap();
    assert_eq!(updated.tags, tag_map(&[("env", "prod")]));

    let all = postgresql_server::list(client(&arm)).await.unwrap();
    assert_eq!(all.len(), 2);
    let in_rg1 = postgresql_server::list_by_resource_group(client(&arm), "rg1")
        .await
        .unwrap();
    assert_eq!(in_rg1.keys().collect::<Vec<_>>(), vec!["pg1"]);

    assert!(postgresql_server::restart(client(&arm), &server()).await);
    assert!(postgresql_server::delete(client(&arm), &server()).await);
    assert!(!postgresql_server::restart(client(&arm), &server()).await);
    assert!(
        postgresql_server::get(client(&arm), &server())
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_postgresql_create_requires_credentials() {
    let arm = FakeArm::new();
    let create = PostgresServerCreate {
        server: server(),
        location: "eastus".to_string(),
        sku: None,
        version: None,
        ssl_enforcement: None,
        storage_profile: None,
        login: "pgadmin".to_string(),
        login_password: String::new(),
        create_mode: CreateMode::Default,
        tags: None,
    };

    let failure = postgresql_server::create(client(&arm), &create)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::RequestBuild);
    assert!(arm.calls().is_empty());
}

#[tokio::test]
async fn test_vm_extension_accessors() {
    let arm = FakeArm::new();
    let extension = VmExtensionRef::new("script", "vm1", "rg1");
    let params = VmExtensionParams {
        extension: extension.clone(),
        location: "eastus".to_string(),
        publisher: "Microsoft.Azure.Extensions".to_string(),
        extension_type: "CustomScript".to_string(),
        version: "2.0".to_string(),
        settings: json!({"commandToExecute": "echo hello"}),
        auto_upgrade_minor_version: Some(true),
        tags: None,
    };

    let created = vm_extension::create_or_update(client(&arm), &params)
        .await
        .unwrap();
    assert_eq!(created.provisioning_state.as_deref(), Some("Succeeded"));

    let listed = vm_extension::list(client(&arm), "vm1", "rg1").await.unwrap();
    assert!(listed.contains_key("script"));

    let fetched = vm_extension::get(client(&arm), &extension).await.unwrap();
    assert_eq!(fetched.publisher.as_deref(), Some("Microsoft.Azure.Extensions"));

    assert!(vm_extension::delete(client(&arm), &extension).await);
    assert!(!vm_extension::delete(client(&arm), &extension).await);
}
