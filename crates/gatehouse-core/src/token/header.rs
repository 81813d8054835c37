//! JWE protected header.

use serde::{Deserialize, Serialize};

/// Direct use of a shared symmetric key.
pub const ALG_DIR: &str = "dir";

/// AES-256-GCM content encryption.
pub const ENC_A256GCM: &str = "A256GCM";

/// Protected header of an issued token.
///
/// The header is integrity-protected as additional authenticated data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedHeader {
    /// Key management algorithm.
    pub alg: String,
    /// Content encryption algorithm.
    pub enc: String,
    /// Expiration instant in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl ProtectedHeader {
    /// Creates the header used for every issued token.
    pub fn direct(exp: i64) -> Self {
        Self {
            alg: ALG_DIR.to_owned(),
            enc: ENC_A256GCM.to_owned(),
            exp: Some(exp),
        }
    }

    /// Returns `true` if the header declares `dir` with `A256GCM`.
    pub fn is_supported(&self) -> bool {
        self.alg == ALG_DIR && self.enc == ENC_A256GCM
    }
}
