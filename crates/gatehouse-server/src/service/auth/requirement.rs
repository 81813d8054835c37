use std::collections::BTreeSet;

use gatehouse_core::UserRole;

/// A deduplicated set of roles, any one of which satisfies the check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RoleRequirement(BTreeSet<UserRole>);

impl RoleRequirement {
    /// Requirement satisfied by any authenticated identity.
    pub const fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Creates a requirement from the given roles.
    pub fn any_of(roles: impl IntoIterator<Item = UserRole>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// Returns the deduplicated union of both requirements.
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// Returns `true` if no role is required.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if any of `roles` satisfies the requirement.
    pub fn is_satisfied_by(&self, roles: &BTreeSet<UserRole>) -> bool {
        self.is_empty() || !self.0.is_disjoint(roles)
    }

    /// Iterates the required roles in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = UserRole> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<UserRole> for RoleRequirement {
    fn from_iter<I: IntoIterator<Item = UserRole>>(iter: I) -> Self {
        Self::any_of(iter)
    }
}

/// Access rules declared on a single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationAccess {
    /// `false` disables both authentication and authorization.
    pub auth: bool,
    /// Roles required by the operation itself.
    pub roles: RoleRequirement,
}

impl OperationAccess {
    /// Operation open to anonymous callers.
    pub const fn public() -> Self {
        Self {
            auth: false,
            roles: RoleRequirement::none(),
        }
    }

    /// Operation open to any authenticated caller.
    pub const fn authenticated() -> Self {
        Self {
            auth: true,
            roles: RoleRequirement::none(),
        }
    }

    /// Operation restricted to callers holding one of `roles`.
    pub fn roles(roles: impl IntoIterator<Item = UserRole>) -> Self {
        Self {
            auth: true,
            roles: RoleRequirement::any_of(roles),
        }
    }
}

/// Roles declared on a route group, stored in request extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRoles(pub RoleRequirement);
