use std::fmt;
use std::time::Duration;

use derive_builder::Builder;
use gatehouse_core::{TokenCodec, UserRole};
use serde::{Deserialize, Serialize};

use crate::service::{Authenticator, Authorizer};
use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    use gatehouse_core::UserRole;

    /// Token lifetime in days.
    pub const TOKEN_TTL_DAYS: u32 = 60;

    /// Lifetime of memoized token resolutions in seconds.
    pub const RESOLVE_CACHE_TTL_SECS: u64 = 30 * 60;

    /// Lifetime of memoized role checks in seconds.
    pub const ROLE_CACHE_TTL_SECS: u64 = 5 * 60;

    /// Roles assigned to newly registered users.
    pub fn default_roles() -> Vec<UserRole> {
        vec![UserRole::User]
    }
}

/// Length of the hex-encoded 256-bit token secret.
const JWT_SECRET_HEX_LEN: usize = 64;

/// Credentials of the superadmin created at startup.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub login: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("login", &self.login)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Serialize, Deserialize, Builder)]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Hex-encoded 256-bit secret used to encrypt tokens.
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Lifetime of issued tokens in days.
    #[builder(default = "defaults::TOKEN_TTL_DAYS")]
    pub token_ttl_days: u32,

    /// Lifetime of memoized token resolutions in seconds.
    #[builder(default = "defaults::RESOLVE_CACHE_TTL_SECS")]
    pub resolve_cache_ttl_secs: u64,

    /// Lifetime of memoized role checks in seconds.
    #[builder(default = "defaults::ROLE_CACHE_TTL_SECS")]
    pub role_cache_ttl_secs: u64,

    /// Roles assigned at registration.
    #[builder(default = "defaults::default_roles()")]
    pub default_roles: Vec<UserRole>,

    /// Whether new accounts must be activated with a verification token.
    #[builder(default)]
    pub registration_token_required: bool,

    /// Superadmin to create at startup, if any.
    #[builder(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Builds the token codec from the configured secret.
    pub fn token_codec(&self) -> Result<TokenCodec> {
        TokenCodec::from_hex(&self.jwt_secret)
            .map_err(|e| Error::config("Invalid token secret").with_source(e))
    }

    /// Builds the authenticator with its resolution cache.
    pub fn authenticator(&self) -> Result<Authenticator> {
        let ttl = Duration::from_secs(self.resolve_cache_ttl_secs);
        Ok(Authenticator::new(self.token_codec()?, ttl))
    }

    /// Builds the authorizer with its role cache.
    pub fn authorizer(&self) -> Authorizer {
        Authorizer::new(Duration::from_secs(self.role_cache_ttl_secs))
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("resolve_cache_ttl_secs", &self.resolve_cache_ttl_secs)
            .field("role_cache_ttl_secs", &self.role_cache_ttl_secs)
            .field("default_roles", &self.default_roles)
            .field("registration_token_required", &self.registration_token_required)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish()
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(secret) = &builder.jwt_secret {
            if secret.len() != JWT_SECRET_HEX_LEN {
                return Err(format!(
                    "JWT secret must be {JWT_SECRET_HEX_LEN} hex characters, got {}",
                    secret.len()
                ));
            }

            if !secret.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err("JWT secret must be hex-encoded".to_string());
            }
        }

        if let Some(ttl_days) = &builder.token_ttl_days
            && *ttl_days == 0
        {
            return Err("Token lifetime must be at least one day".to_string());
        }

        if let Some(roles) = &builder.default_roles
            && roles.is_empty()
        {
            return Err("Default roles cannot be empty".to_string());
        }

        if let Some(Some(admin)) = &builder.bootstrap_admin
            && (admin.login.is_empty() || admin.email.is_empty() || admin.password.is_empty())
        {
            return Err("Bootstrap superadmin needs a login, email and password".to_string());
        }

        Ok(())
    }
}
