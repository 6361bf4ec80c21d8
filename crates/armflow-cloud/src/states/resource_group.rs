//! Resource group reconciler

use super::{empty, log_plan, tags_value, to_json};
use crate::action::ActionType;
use crate::context::Context;
use crate::credentials::ConnectionAuth;
use crate::diff::{Change, deep_diff};
use crate::exec;
use crate::outcome::FailureKind;
use crate::model::{ResourceGroupParams, Tags};
use crate::state::StateResult;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Declared resource group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroupSpec {
    pub name: String,
    /// Cannot be changed once the group exists
    pub location: String,
    /// Cannot be changed once the group exists
    #[serde(default)]
    pub managed_by: Option<String>,
    #[serde(default)]
    pub tags: Option<Tags>,
}

impl ResourceGroupSpec {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            managed_by: None,
            tags: None,
        }
    }

    pub fn with_managed_by(mut self, managed_by: impl Into<String>) -> Self {
        self.managed_by = Some(managed_by.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Ensure a resource group exists with the declared tags
pub async fn present(
    ctx: &Context,
    spec: &ResourceGroupSpec,
    connection_auth: Option<&ConnectionAuth>,
) -> StateResult {
    let name = &spec.name;
    let ret = StateResult::new(name);

    let client = match ctx.connect(connection_auth) {
        Ok(client) => client,
        Err(failure) => return ret.fail(failure.message),
    };

    let current = exec::resource_group::get(client.as_ref(), name).await;
    let desired_tags = tags_value(spec.tags.as_ref());
    let current_tags = current.as_ref().ok().map(|group| tags_value(Some(&group.tags)));
    let diff = current_tags
        .as_ref()
        .and_then(|tags| deep_diff(tags, &desired_tags));

    let action = ActionType::for_present(current.is_ok(), diff.is_some());
    log_plan("resource_group", name, action, ctx.test);

    match action {
        ActionType::NoOp => {
            return ret.succeed(format!("Resource group {} is already present.", name));
        }
        ActionType::Update if ctx.test => {
            return ret
                .preview(format!("Resource group {} tags would be updated.", name))
                .with_changes(Change::new(current_tags.unwrap_or_else(empty), desired_tags));
        }
        ActionType::Create if ctx.test => {
            return ret
                .preview(format!("Resource group {} would be created.", name))
                .with_changes(Change::new(
                    empty(),
                    json!({
                        "name": name,
                        "location": spec.location,
                        "managed_by": spec.managed_by,
                        "tags": spec.tags,
                    }),
                ));
        }
        _ => {}
    }

    let params = ResourceGroupParams::new(name.clone(), spec.location.clone())
        .with_managed_by(spec.managed_by.clone())
        .with_tags(spec.tags.clone());

    match exec::resource_group::create_or_update(client.as_ref(), &params).await {
        Ok(group) => {
            let verb = if action == ActionType::Create {
                "created"
            } else {
                "updated"
            };
            ret.succeed(format!("Resource group {} has been {}.", name, verb))
                .with_changes(Change::new(empty(), to_json(&group)))
        }
        Err(failure) => ret
            .fail(format!(
                "Failed to create resource group {}! ({})",
                name, failure
            ))
            .without_changes(),
    }
}

/// Ensure a resource group does not exist in the subscription
pub async fn absent(
    ctx: &Context,
    name: &str,
    connection_auth: Option<&ConnectionAuth>,
) -> StateResult {
    let ret = StateResult::new(name);

    let client = match ctx.connect(connection_auth) {
        Ok(client) => client,
        Err(failure) => return ret.fail(failure.message),
    };

    let group = match exec::resource_group::get(client.as_ref(), name).await {
        Ok(group) => group,
        Err(failure) if failure.kind == FailureKind::RequestBuild => {
            return ret.fail(format!(
                "Failed to delete resource group {}! ({})",
                name, failure
            ));
        }
        Err(_) => {
            log_plan("resource_group", name, ActionType::for_absent(false), ctx.test);
            return ret.succeed(format!("Resource group {} is already absent.", name));
        }
    };

    log_plan("resource_group", name, ActionType::for_absent(true), ctx.test);
    let old = to_json(&group);

    if ctx.test {
        return ret
            .preview(format!("Resource group {} would be deleted.", name))
            .with_changes(Change::new(old, empty()));
    }

    if exec::resource_group::delete(client.as_ref(), name).await {
        return ret
            .succeed(format!("Resource group {} has been deleted.", name))
            .with_changes(Change::new(old, empty()));
    }

    ret.fail(format!("Failed to delete resource group {}!", name))
}
