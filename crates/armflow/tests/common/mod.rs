#![allow(deprecated)] // TODO: switch to cargo_bin_cmd! and drop this allow
#![allow(dead_code)]

use assert_cmd::Command;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const CLEARED_ENV: [&str; 11] = [
    "ARMFLOW_ACCT_FILE",
    "ARMFLOW_PROFILE",
    "ARMFLOW_MANAGEMENT_ENDPOINT",
    "ARMFLOW_AUTHORITY_ENDPOINT",
    "AZURE_SUBSCRIPTION_ID",
    "AZURE_TENANT_ID",
    "AZURE_CLIENT_ID",
    "AZURE_CLIENT_SECRET",
    "AZURE_USERNAME",
    "AZURE_PASSWORD",
    "AZURE_CLOUD_ENVIRONMENT",
];

pub const SERVICE_PRINCIPAL_ACCT: &str = "\
azurerm:
  default:
    subscription_id: sub-1
    tenant: tenant-1
    client_id: app-1
    secret: s3cret
";

/// A scratch directory the binary runs in, isolated from the caller's
/// home directory and Azure environment variables
pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_acct(&self, content: &str) {
        fs::write(self.root.path().join("acct.yaml"), content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn armflow(&self) -> Command {
        let mut cmd = Command::cargo_bin("armflow").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("RUST_LOG");
        for key in CLEARED_ENV {
            cmd.env_remove(key);
        }
        cmd
    }
}

/// Resource groups behind a token endpoint, served over HTTP
#[derive(Clone, Default)]
pub struct MockArm {
    groups: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl MockArm {
    /// Serve on an ephemeral port; returns the base URL
    pub async fn start(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move { axum::serve(listener, app).await });
        base
    }

    pub fn with_group(self, name: &str, tags: Value) -> Self {
        self.groups
            .lock()
            .unwrap()
            .insert(name.to_string(), group_json(name, "eastus", tags));
        self
    }

    pub fn group(&self, name: &str) -> Option<Value> {
        self.groups.lock().unwrap().get(name).cloned()
    }
}

fn group_json(name: &str, location: &str, tags: Value) -> Value {
    json!({
        "id": format!("/subscriptions/sub-1/resourceGroups/{}", name),
        "name": name,
        "type": "Microsoft.Resources/resourceGroups",
        "location": location,
        "tags": tags,
        "properties": {"provisioningState": "Succeeded"}
    })
}

async fn handle(State(arm): State<MockArm>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path();
    if path.ends_with("/oauth2/token") {
        return axum::Json(json!({"access_token": "tok-1", "expires_in": 3600})).into_response();
    }

    let Some(name) = path.strip_prefix("/subscriptions/sub-1/resourcegroups/") else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut groups = arm.groups.lock().unwrap();

    match method {
        Method::GET => match groups.get(name) {
            Some(group) => axum::Json(group.clone()).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                axum::Json(json!({
                    "error": {
                        "code": "ResourceGroupNotFound",
                        "message": format!("Resource group '{}' could not be found.", name)
                    }
                })),
            )
                .into_response(),
        },
        Method::PUT => {
            let request: Value = serde_json::from_slice(&body).unwrap_or_default();
            let location = request["location"].as_str().unwrap_or_default();
            let group = group_json(name, location, request["tags"].clone());
            groups.insert(name.to_string(), group.clone());
            (StatusCode::CREATED, axum::Json(group)).into_response()
        }
        Method::DELETE => {
            groups.remove(name);
            StatusCode::OK.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
