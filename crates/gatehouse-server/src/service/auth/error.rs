use gatehouse_core::DecodeReason;

use crate::handler::{Error, ErrorKind};

/// Why a presented credential was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// The token failed to decode.
    #[error("token could not be resolved: {0}")]
    Decode(DecodeReason),
    /// The token resolved to an inactive account.
    #[error("account is not active")]
    Inactive,
    /// The identity holds none of the required roles.
    #[error("identity lacks the required roles")]
    InsufficientRole,
}

/// Authentication or authorization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No usable credential was presented.
    #[error("no token")]
    NoToken,
    /// A credential was presented and rejected.
    #[error("invalid token: {0}")]
    InvalidToken(RejectReason),
}

impl AuthError {
    /// Returns the rejection reason of an invalid token.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::NoToken => None,
            Self::InvalidToken(reason) => Some(*reason),
        }
    }
}

impl From<AuthError> for Error<'static> {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::NoToken => ErrorKind::NoToken.into_error(),
            AuthError::InvalidToken(reason) => {
                ErrorKind::InvalidToken.with_context(reason.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_unauthorized() -> anyhow::Result<()> {
        let no_token = Error::from(AuthError::NoToken);
        assert_eq!(no_token.kind(), ErrorKind::NoToken);

        let invalid = Error::from(AuthError::InvalidToken(RejectReason::Decode(
            DecodeReason::Integrity,
        )));
        assert_eq!(invalid.kind(), ErrorKind::InvalidToken);
        assert_eq!(invalid.status_code().as_u16(), 401);

        let json = serde_json::to_value(invalid.into_error_response())?;
        assert_eq!(json["type"], "INVALID_TOKEN");
        assert!(!json.to_string().contains("resolved"));
        Ok(())
    }
}
