//! Domain errors reported to clients as `ClientError` bodies.

use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};

use crate::handler::{Error, ErrorKind};

/// Catalog of user and role domain errors.
///
/// Each variant renders with the error code as its message and the class
/// name `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter, IntoStaticStr)]
pub enum ClientError {
    #[strum(serialize = "user.notfound")]
    UserNotFound,
    #[strum(serialize = "user.wrong")]
    UserWrong,
    #[strum(serialize = "user.notactive")]
    UserNotActive,
    #[strum(serialize = "user.duplicated.login")]
    UserDuplicatedLogin,
    #[strum(serialize = "user.duplicated.email")]
    UserDuplicatedEmail,
    #[strum(serialize = "user.delete.itself")]
    UserDeleteItself,
    #[strum(serialize = "role.notfound")]
    RoleNotFound,
    #[strum(serialize = "role.wrong")]
    RoleWrong,
    #[strum(serialize = "role.notactive")]
    RoleNotActive,
    #[strum(serialize = "role.duplicated.name")]
    RoleDuplicatedName,
    #[strum(serialize = "role.duplicated.value")]
    RoleDuplicatedValue,
    #[strum(serialize = "role.delete.systemLocked")]
    RoleDeleteSystemLocked,
}

impl ClientError {
    /// Returns the error code, e.g. `user.notfound`.
    #[inline]
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Returns the HTTP error kind this code maps to.
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::UserNotFound | Self::RoleNotFound => ErrorKind::NotFound,
            Self::UserNotActive | Self::RoleNotActive => ErrorKind::Forbidden,
            Self::UserWrong
            | Self::UserDuplicatedLogin
            | Self::UserDuplicatedEmail
            | Self::UserDeleteItself
            | Self::RoleWrong
            | Self::RoleDuplicatedName
            | Self::RoleDuplicatedValue
            | Self::RoleDeleteSystemLocked => ErrorKind::Unprocessable,
        }
    }

    /// Converts into an HTTP error with one field-level message.
    pub fn with_field(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Error<'static> {
        Error::from(self).with_field(field, message)
    }
}

impl From<ClientError> for Error<'static> {
    fn from(error: ClientError) -> Self {
        error
            .kind()
            .with_message(error.code())
            .with_name("ClientError")
            .with_type("")
    }
}
