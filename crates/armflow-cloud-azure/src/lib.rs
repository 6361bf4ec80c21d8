//! Azure Resource Manager REST client for armflow
//!
//! This crate implements the [`ClientFactory`](armflow_cloud::ClientFactory)
//! and operations traits of `armflow-cloud` directly against the Resource
//! Manager REST API over reqwest.
//!
//! # Features
//!
//! - OAuth2 token acquisition (service principal or username/password)
//! - Resource groups, blob containers, PostgreSQL servers, VM extensions
//! - Long-running operations followed via `Azure-AsyncOperation` / `Location`
//! - Paged collections followed via `nextLink`
//!
//! # Example
//!
//! ```ignore
//! use armflow_cloud::{Context, ResourceGroupSpec};
//! use armflow_cloud_azure::AzureClientFactory;
//! use std::sync::Arc;
//!
//! let ctx = Context::new(Arc::new(AzureClientFactory::new())).with_acct(Some(acct));
//! let result = armflow_cloud::states::resource_group::present(
//!     &ctx,
//!     &ResourceGroupSpec::new("rg1", "eastus"),
//!     None,
//! )
//! .await;
//! ```

pub mod auth;
pub mod blob_containers;
pub mod client;
pub mod compute;
pub mod error;
pub mod postgresql;
pub mod provider;
pub mod resource_groups;

pub use auth::TokenProvider;
pub use client::ArmClient;
pub use error::{AzureError, Result};
pub use provider::{AzureClientFactory, AzureManagementClient, ClientOptions};
