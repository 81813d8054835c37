//! [`Error`], [`ErrorKind`] and [`Result`].

mod client_error;
mod http_error;
mod service_error;

pub use client_error::ClientError;
pub use http_error::{Error, ErrorKind, Result};
