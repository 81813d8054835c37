//! Login response types.

use gatehouse_core::Token;
use serde::{Deserialize, Serialize};

use super::User;

/// Response returned after a successful login.
///
/// The same token is also sent in the `Authorization` response header.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: Token,
}
