//! Response types for HTTP handlers.

mod authentications;
mod errors;
mod monitors;
mod roles;
mod users;

pub use authentications::*;
pub use errors::*;
pub use monitors::*;
pub use roles::*;
pub use users::*;
