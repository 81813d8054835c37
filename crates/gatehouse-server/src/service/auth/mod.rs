//! Authentication and authorization pipeline.
//!
//! [`Authenticator`] turns a raw `Authorization` header into a trusted
//! [`IdentitySnapshot`]; [`Authorizer`] decides whether that identity may
//! call an operation given its [`OperationAccess`] and the route's
//! [`RouteRoles`].
//!
//! [`IdentitySnapshot`]: gatehouse_core::IdentitySnapshot

mod audit;
mod authenticator;
mod authorizer;
mod error;
mod requirement;

pub use audit::{AuditContext, audit_rejection};
pub use authenticator::{Authenticator, parse_authorization};
pub use authorizer::{Authorizer, RoleCacheKey};
pub use error::{AuthError, RejectReason};
pub use requirement::{OperationAccess, RoleRequirement, RouteRoles};
