//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g. `RUST_LOG=gatehouse_server::audit=error`.

/// Token resolution and header parsing.
pub const TRACING_TARGET_AUTHENTICATION: &str = "gatehouse_server::authentication";

/// Role requirement checks.
pub const TRACING_TARGET_AUTHORIZATION: &str = "gatehouse_server::authorization";

/// Audit entries for rejected authentication and authorization attempts.
pub const TRACING_TARGET_AUDIT: &str = "gatehouse_server::audit";

/// Password hashing and verification operations.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "gatehouse_server::password_hasher";

/// Credential store operations.
pub const TRACING_TARGET_STORE: &str = "gatehouse_server::store";

/// User management handlers.
pub const TRACING_TARGET_USERS: &str = "gatehouse_server::users";

/// Role management handlers.
pub const TRACING_TARGET_ROLES: &str = "gatehouse_server::roles";

/// Registration, login and activation handlers.
pub const TRACING_TARGET_ACCOUNTS: &str = "gatehouse_server::accounts";

/// Startup seeding of built-in records.
pub const TRACING_TARGET_BOOTSTRAP: &str = "gatehouse_server::bootstrap";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "gatehouse_server::recovery::error";

/// Panic recovery including handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "gatehouse_server::recovery::panic";
