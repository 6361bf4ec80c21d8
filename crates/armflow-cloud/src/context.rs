//! Per-invocation execution context

use crate::credentials::{ConnectionAuth, resolve_credentials};
use crate::outcome::{Failure, Outcome};
use crate::provider::{ClientFactory, ManagementClient};
use std::sync::Arc;

/// Everything a state function needs besides its declaration
#[derive(Clone)]
pub struct Context {
    /// Dry-run: report intended changes without mutating anything
    pub test: bool,
    /// Ambient credentials used when a declaration carries none
    pub acct: Option<ConnectionAuth>,
    factory: Arc<dyn ClientFactory>,
}

impl Context {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            test: false,
            acct: None,
            factory,
        }
    }

    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    pub fn with_acct(mut self, acct: Option<ConnectionAuth>) -> Self {
        self.acct = acct;
        self
    }

    /// Resolve credentials and build a client for this invocation
    pub fn connect(
        &self,
        connection_auth: Option<&ConnectionAuth>,
    ) -> Outcome<Arc<dyn ManagementClient>> {
        let credentials = resolve_credentials(connection_auth, self.acct.as_ref())?;
        tracing::debug!(
            factory = self.factory.name(),
            subscription = %credentials.subscription_id,
            cloud = %credentials.cloud_environment,
            "Connecting to management API"
        );
        self.factory.connect(&credentials).map_err(Failure::from)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("test", &self.test)
            .field("acct", &self.acct)
            .field("factory", &self.factory.name())
            .finish()
    }
}
