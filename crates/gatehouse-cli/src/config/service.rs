//! Authentication and account configuration.

use std::fmt;

use anyhow::{Context, bail};
use clap::{ArgAction, Args};
use gatehouse_core::UserRole;
use gatehouse_server::service::{BootstrapAdmin, ServiceConfig as ServerServiceConfig};

use crate::TRACING_TARGET_CONFIG;

/// Service-level options forwarded to the server state.
#[derive(Clone, Args)]
pub struct ServiceConfig {
    /// Hex-encoded 256-bit secret used to encrypt tokens.
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: String,

    /// Lifetime of issued tokens in days.
    #[arg(long, env = "TOKEN_TTL_DAYS", default_value_t = 60)]
    pub token_ttl_days: u32,

    /// Lifetime of memoized token resolutions in seconds.
    #[arg(long, env = "RESOLVE_CACHE_TTL_SECS", default_value_t = 1800)]
    pub resolve_cache_ttl_secs: u64,

    /// Lifetime of memoized role checks in seconds.
    #[arg(long, env = "ROLE_CACHE_TTL_SECS", default_value_t = 300)]
    pub role_cache_ttl_secs: u64,

    /// Comma-separated roles assigned to self-registered users.
    #[arg(long, env = "DEFAULT_ROLES", value_delimiter = ',', default_value = "user")]
    pub default_roles: Vec<UserRole>,

    /// Require new accounts to be activated with a verification token.
    #[arg(
        long,
        env = "REGISTRATION_TOKEN_REQUIRED",
        action = ArgAction::Set,
        default_value_t = false
    )]
    pub registration_token_required: bool,

    /// Login of the superadmin created at startup.
    #[arg(long, env = "BOOTSTRAP_LOGIN")]
    pub bootstrap_login: Option<String>,

    /// Email of the superadmin created at startup.
    #[arg(long, env = "BOOTSTRAP_EMAIL")]
    pub bootstrap_email: Option<String>,

    /// Password of the superadmin created at startup.
    #[arg(long, env = "BOOTSTRAP_PASSWORD")]
    pub bootstrap_password: Option<String>,
}

impl ServiceConfig {
    /// Returns the bootstrap superadmin when all three options are set.
    fn bootstrap_admin(&self) -> anyhow::Result<Option<BootstrapAdmin>> {
        match (
            &self.bootstrap_login,
            &self.bootstrap_email,
            &self.bootstrap_password,
        ) {
            (Some(login), Some(email), Some(password)) => Ok(Some(BootstrapAdmin {
                login: login.clone(),
                email: email.clone(),
                password: password.clone(),
            })),
            (None, None, None) => Ok(None),
            _ => bail!("BOOTSTRAP_LOGIN, BOOTSTRAP_EMAIL and BOOTSTRAP_PASSWORD must be set together"),
        }
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            token_ttl_days = self.token_ttl_days,
            resolve_cache_ttl_secs = self.resolve_cache_ttl_secs,
            role_cache_ttl_secs = self.role_cache_ttl_secs,
            default_roles = ?self.default_roles,
            registration_token_required = self.registration_token_required,
            bootstrap_login = ?self.bootstrap_login,
            "Service configuration"
        );
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
            .field("bootstrap_login", &self.bootstrap_login)
            .field("bootstrap_email", &self.bootstrap_email)
            .finish_non_exhaustive()
    }
}

impl TryFrom<ServiceConfig> for ServerServiceConfig {
    type Error = anyhow::Error;

    fn try_from(config: ServiceConfig) -> Result<Self, Self::Error> {
        let mut builder = ServerServiceConfig::builder()
            .with_token_ttl_days(config.token_ttl_days)
            .with_resolve_cache_ttl_secs(config.resolve_cache_ttl_secs)
            .with_role_cache_ttl_secs(config.role_cache_ttl_secs)
            .with_default_roles(config.default_roles.clone())
            .with_registration_token_required(config.registration_token_required);

        if let Some(admin) = config.bootstrap_admin()? {
            builder = builder.with_bootstrap_admin(admin);
        }

        builder
            .with_jwt_secret(config.jwt_secret)
            .build()
            .context("failed to build service configuration")
    }
}
