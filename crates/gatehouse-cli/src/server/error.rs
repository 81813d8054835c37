//! Server lifecycle errors.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type Result<T, E = ServerError> = std::result::Result<T, E>;

/// Error raised while starting or running the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Server configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to bind to the specified address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The listener failed while serving.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Short stable code for log correlation.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "E001",
            Self::BindError { .. } => "E002",
            Self::Runtime(_) => "E003",
        }
    }

    /// Hint for the operator, if one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => Some("Check the command-line flags and environment variables"),
            Self::BindError { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Try using a port above 1024 or run with appropriate privileges")
                }
                io::ErrorKind::AddrInUse => {
                    Some("The port is already in use. Try a different port or stop the other process")
                }
                _ => Some("Check network configuration and firewall settings"),
            },
            Self::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_distinct() {
        let codes = [
            ServerError::InvalidConfig("port".to_owned()).error_code(),
            ServerError::BindError {
                address: "127.0.0.1:3000".to_owned(),
                source: io::Error::other("taken"),
            }
            .error_code(),
            ServerError::Runtime(io::Error::other("closed")).error_code(),
        ];

        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }

    #[test]
    fn bind_errors_suggest_a_fix() {
        let error = ServerError::BindError {
            address: "127.0.0.1:3000".to_owned(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };

        assert!(error.suggestion().is_some_and(|hint| hint.contains("in use")));
        assert!(ServerError::Runtime(io::Error::other("x")).suggestion().is_none());
    }
}
