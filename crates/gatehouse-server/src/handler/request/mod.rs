//! Request types for HTTP handlers.

mod authentications;
mod roles;
mod users;

pub use authentications::*;
pub use roles::*;
pub use users::*;
