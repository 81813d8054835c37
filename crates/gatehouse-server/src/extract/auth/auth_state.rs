//! Authenticated identity extractor.
//!
//! The authentication guard resolves the token and stores the
//! [`IdentitySnapshot`] in request extensions. [`AuthState`] only reads it
//! back, so handlers never decrypt a token twice.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use gatehouse_core::{IdentitySnapshot, UserRole};

use crate::handler::{Error, ErrorKind};
use crate::service::Actor;

/// Identity of the caller, as embedded in its token.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub IdentitySnapshot);

impl AuthState {
    /// Returns the caller as a record author.
    #[inline]
    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }

    /// Returns `true` if the caller is a superadmin.
    #[inline]
    pub fn is_superadmin(&self) -> bool {
        self.0.has_role(UserRole::SuperAdmin)
    }

    /// Returns the inner snapshot.
    #[inline]
    pub fn into_inner(self) -> IdentitySnapshot {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentitySnapshot>()
            .cloned()
            .map(Self)
            .ok_or_else(|| ErrorKind::NoToken.with_context("No identity attached to request"))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<IdentitySnapshot>().cloned().map(Self))
    }
}
