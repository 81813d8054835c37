//! Credential hashing and registration token generation.

mod password_hasher;
mod verification_token;

pub use password_hasher::PasswordHasher;
pub use verification_token::{VERIFICATION_TOKEN_LENGTH, generate_verification_token};
