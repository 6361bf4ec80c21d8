//! Blob container reconciler

use super::{empty, log_plan, tags_value, to_json};
use crate::action::ActionType;
use crate::context::Context;
use crate::credentials::ConnectionAuth;
use crate::diff::{Change, deep_diff};
use crate::exec;
use crate::outcome::FailureKind;
use crate::model::{BlobContainer, ContainerParams, ContainerRef, PublicAccess, Tags};
use crate::state::StateResult;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Declared blob container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    pub account: String,
    pub resource_group: String,
    /// Left untouched when unset
    #[serde(default)]
    pub public_access: Option<PublicAccess>,
    #[serde(default)]
    pub metadata: Option<Tags>,
}

impl ContainerSpec {
    pub fn new(
        name: impl Into<String>,
        account: impl Into<String>,
        resource_group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            account: account.into(),
            resource_group: resource_group.into(),
            public_access: None,
            metadata: None,
        }
    }

    pub fn with_public_access(mut self, public_access: PublicAccess) -> Self {
        self.public_access = Some(public_access);
        self
    }

    pub fn with_metadata(mut self, metadata: Tags) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn container_ref(&self) -> ContainerRef {
        ContainerRef::new(&self.name, &self.account, &self.resource_group)
    }

    /// Comparable view of the declaration
    fn desired_value(&self) -> Value {
        let mut value = json!({ "metadata": tags_value(self.metadata.as_ref()) });
        if let Some(access) = self.public_access {
            value["public_access"] = to_json(&access);
        }
        value
    }

    /// Comparable view of a live container, restricted to declared fields
    fn current_value(&self, container: &BlobContainer) -> Value {
        let mut value = json!({ "metadata": tags_value(Some(&container.metadata)) });
        if self.public_access.is_some() {
            let access = container.public_access.unwrap_or(PublicAccess::None);
            value["public_access"] = to_json(&access);
        }
        value
    }
}

/// Ensure a blob container exists with the declared metadata and access level
pub async fn present(
    ctx: &Context,
    spec: &ContainerSpec,
    connection_auth: Option<&ConnectionAuth>,
) -> StateResult {
    let name = &spec.name;
    let ret = StateResult::new(name);

    let client = match ctx.connect(connection_auth) {
        Ok(client) => client,
        Err(failure) => return ret.fail(failure.message),
    };

    let container = spec.container_ref();
    let current = exec::storage_container::get(client.as_ref(), &container).await;
    let desired = spec.desired_value();
    let current_value = current.as_ref().ok().map(|c| spec.current_value(c));
    let diff = current_value
        .as_ref()
        .and_then(|value| deep_diff(value, &desired));

    let action = ActionType::for_present(current.is_ok(), diff.is_some());
    log_plan("blob_container", name, action, ctx.test);

    match action {
        ActionType::NoOp => {
            return ret.succeed(format!("Blob container {} is already present.", name));
        }
        ActionType::Update if ctx.test => {
            return ret
                .preview(format!("Blob container {} would be updated.", name))
                .with_changes(Change::new(current_value.unwrap_or_else(empty), desired));
        }
        ActionType::Create if ctx.test => {
            return ret
                .preview(format!("Blob container {} would be created.", name))
                .with_changes(Change::new(
                    empty(),
                    json!({
                        "name": name,
                        "account": spec.account,
                        "resource_group": spec.resource_group,
                        "public_access": spec.public_access,
                        "metadata": spec.metadata,
                    }),
                ));
        }
        _ => {}
    }

    let outcome = if action == ActionType::Create {
        let params = ContainerParams {
            public_access: spec.public_access,
            metadata: spec.metadata.clone(),
        };
        exec::storage_container::create(client.as_ref(), &container, &params).await
    } else {
        let params = ContainerParams {
            public_access: spec.public_access,
            metadata: Some(spec.metadata.clone().unwrap_or_default()),
        };
        exec::storage_container::update(client.as_ref(), &container, &params).await
    };

    let verb = if action == ActionType::Create {
        "create"
    } else {
        "update"
    };
    match outcome {
        Ok(updated) => ret
            .succeed(format!("Blob container {} has been {}d.", name, verb))
            .with_changes(Change::new(empty(), to_json(&updated))),
        Err(failure) => ret
            .fail(format!(
                "Failed to {} blob container {}! ({})",
                verb, name, failure
            ))
            .without_changes(),
    }
}

/// Ensure a blob container does not exist in its storage account
pub async fn absent(
    ctx: &Context,
    container: &ContainerRef,
    connection_auth: Option<&ConnectionAuth>,
) -> StateResult {
    let name = &container.name;
    let ret = StateResult::new(name);

    let client = match ctx.connect(connection_auth) {
        Ok(client) => client,
        Err(failure) => return ret.fail(failure.message),
    };

    let current = match exec::storage_container::get(client.as_ref(), container).await {
        Ok(current) => current,
        Err(failure) if failure.kind == FailureKind::RequestBuild => {
            return ret.fail(format!(
                "Failed to delete blob container {}! ({})",
                name, failure
            ));
        }
        Err(_) => {
            log_plan("blob_container", name, ActionType::for_absent(false), ctx.test);
            return ret.succeed(format!("Blob container {} is already absent.", name));
        }
    };

    log_plan("blob_container", name, ActionType::for_absent(true), ctx.test);
    let old = to_json(&current);

    if ctx.test {
        return ret
            .preview(format!("Blob container {} would be deleted.", name))
            .with_changes(Change::new(old, empty()));
    }

    if exec::storage_container::delete(client.as_ref(), container).await {
        return ret
            .succeed(format!("Blob container {} has been deleted.", name))
            .with_changes(Change::new(old, empty()));
    }

    ret.fail(format!("Failed to delete blob container {}!", name))
}
