//! Application state and dependency injection.

mod auth;
mod bootstrap;
mod config;
mod records;
mod registry;
mod security;
mod store;

use std::sync::Arc;

use gatehouse_core::Token;

pub use crate::service::auth::{
    AuditContext, AuthError, Authenticator, Authorizer, OperationAccess, RejectReason,
    RoleCacheKey, RoleRequirement, RouteRoles, audit_rejection, parse_authorization,
};
pub use crate::service::config::{BootstrapAdmin, ServiceConfig, ServiceConfigBuilder};
pub use crate::service::records::{
    Actor, Authored, Authorship, FORBIDDEN_FIELDS, remove_forbidden_fields, update_author,
    update_author_at,
};
pub use crate::service::registry::{RoleStore, ServiceName, ServiceRegistry, UserStore};
pub use crate::service::security::{
    PasswordHasher, VERIFICATION_TOKEN_LENGTH, generate_verification_token,
};
pub use crate::service::store::{
    Entity, Guarded, MemoryStore, Predicate, RoleRecord, Store, Unique, UserRecord,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pub config: Arc<ServiceConfig>,
    pub registry: ServiceRegistry,

    pub authenticator: Authenticator,
    pub authorizer: Authorizer,
    pub password_hasher: PasswordHasher,
}

impl ServiceState {
    /// Initializes application state backed by in-memory stores.
    pub async fn new(service_config: ServiceConfig) -> Result<Self> {
        Self::with_registry(service_config, ServiceRegistry::in_memory()).await
    }

    /// Initializes application state over the given stores and seeds the
    /// built-in records.
    pub async fn with_registry(
        service_config: ServiceConfig,
        registry: ServiceRegistry,
    ) -> Result<Self> {
        let service_state = Self {
            authenticator: service_config.authenticator()?,
            authorizer: service_config.authorizer(),
            password_hasher: PasswordHasher::new(),
            config: Arc::new(service_config),
            registry,
        };

        bootstrap::seed(&service_state).await?;
        Ok(service_state)
    }

    /// Issues a token for the given user record.
    pub fn issue_token(&self, user: &UserRecord) -> crate::handler::Result<Token> {
        self.authenticator
            .codec()
            .issue(&user.snapshot(), self.config.token_ttl_days)
            .map_err(|e| crate::handler::Error::from(Error::from(e)))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(config: Arc<ServiceConfig>);
impl_di!(registry: ServiceRegistry);
impl_di!(authenticator: Authenticator);
impl_di!(authorizer: Authorizer);
impl_di!(password_hasher: PasswordHasher);
