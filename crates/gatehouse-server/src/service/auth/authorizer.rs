use std::collections::BTreeSet;
use std::convert::Infallible;
use std::time::Duration;

use gatehouse_core::{IdentitySnapshot, TtlCache, UserRole};
use jiff::Timestamp;
use uuid::Uuid;

use super::{AuthError, OperationAccess, RejectReason, RoleRequirement, RouteRoles};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHORIZATION;

/// Memoization key of a role check: the required roles and the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleCacheKey {
    pub required: RoleRequirement,
    pub user_id: Uuid,
    pub user_roles: BTreeSet<UserRole>,
}

/// Role-based access decisions.
///
/// Pure policy over the identity snapshot; no store access.
#[derive(Debug, Clone)]
pub struct Authorizer {
    cache: TtlCache<RoleCacheKey, bool>,
}

impl Authorizer {
    /// Creates an authorizer whose role checks are memoized for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new("role_validation", ttl),
        }
    }

    /// Decides whether `identity` may call an operation.
    pub async fn authorize(
        &self,
        identity: Option<&IdentitySnapshot>,
        operation: &OperationAccess,
        route: &RouteRoles,
    ) -> Result<(), AuthError> {
        self.authorize_at(identity, operation, route, Timestamp::now())
            .await
    }

    /// Same as [`authorize`] with an explicit clock.
    ///
    /// [`authorize`]: Self::authorize
    pub async fn authorize_at(
        &self,
        identity: Option<&IdentitySnapshot>,
        operation: &OperationAccess,
        route: &RouteRoles,
        now: Timestamp,
    ) -> Result<(), AuthError> {
        if !operation.auth {
            return Ok(());
        }

        let Some(identity) = identity else {
            return Err(AuthError::NoToken);
        };

        let required = operation.roles.union(&route.0);
        if required.is_empty() {
            return Ok(());
        }

        if self.validate_role(&required, identity, now).await {
            Ok(())
        } else {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                user_id = %identity.id,
                required = ?required,
                "identity holds none of the required roles"
            );
            Err(AuthError::InvalidToken(RejectReason::InsufficientRole))
        }
    }

    /// Returns `true` if `user` holds at least one of the `required` roles.
    pub async fn validate_role(
        &self,
        required: &RoleRequirement,
        user: &IdentitySnapshot,
        now: Timestamp,
    ) -> bool {
        let key = RoleCacheKey {
            required: required.clone(),
            user_id: user.id,
            user_roles: user.roles.clone(),
        };

        let result: Result<bool, Infallible> = self
            .cache
            .get_or_try_insert_with(key, now, || async {
                Ok((required.is_satisfied_by(&user.roles), Timestamp::MAX))
            })
            .await;

        match result {
            Ok(permitted) => permitted,
            Err(never) => match never {},
        }
    }
}
