//! ArmFlow Cloud Core
//!
//! Idempotent reconciliation of Azure Resource Manager resources.
//!
//! # Layers
//!
//! - **Reconcilers** (`states`): `present` / `absent` per resource kind,
//!   each returning a [`StateResult`] with a tri-state result
//! - **Accessors** (`exec`): one call per provider operation; every failure
//!   comes back as a [`Failure`] that renders as `{"error": "..."}`
//! - **Credentials**: explicit `connection_auth` first, then the ambient
//!   profile
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  armflow CLI                     │
//! │            (state / exec subcommands)            │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                armflow-cloud                     │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │ Reconcilers  │─▶│  Accessors   │             │
//! │  └──────────────┘  └──────┬───────┘             │
//! │                           │                      │
//! │  ┌────────────────────────▼─────────────────┐   │
//! │  │  trait ClientFactory / ManagementClient   │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼────────┐
//!           │ armflow-cloud- │
//!           │     azure      │
//!           └────────────────┘
//! ```

pub mod action;
pub mod context;
pub mod credentials;
pub mod diff;
pub mod error;
pub mod exec;
pub mod model;
pub mod outcome;
pub mod provider;
pub mod state;
pub mod states;

// Re-exports
pub use action::ActionType;
pub use context::Context;
pub use credentials::{
    AuthMode, CloudEndpoints, CloudEnvironment, ConnectionAuth, Credentials, resolve_credentials,
};
pub use diff::{Change, deep_diff};
pub use error::{ArmError, Result};
pub use outcome::{Failure, FailureKind, Outcome};
pub use provider::{
    BlobContainerOperations, ClientFactory, ManagementClient, PostgresServerOperations,
    ResourceGroupOperations, VmExtensionOperations,
};
pub use state::{StateResult, Verdict};
pub use states::resource_group::ResourceGroupSpec;
pub use states::storage_container::ContainerSpec;
