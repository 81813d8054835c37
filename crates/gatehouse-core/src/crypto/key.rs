//! Symmetric key management.

use std::fmt;

use aes_gcm::Aes256Gcm;
use aes_gcm::aead::{KeyInit, OsRng};

use super::error::{CryptoError, CryptoResult};

/// The size of an AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// A 256-bit key used for direct (`alg: dir`) token encryption.
///
/// The raw bytes never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenKey {
    bytes: [u8; KEY_SIZE],
}

impl TokenKey {
    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength(bytes.len()))?;
        Ok(Self { bytes })
    }

    /// Decodes a key from its hex representation (64 hex characters).
    pub fn from_hex(secret: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(secret.trim()).map_err(|_| CryptoError::InvalidKeyEncoding)?;
        Self::from_bytes(&bytes)
    }

    /// Generates a new random key.
    #[must_use]
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(key.as_slice());
        Self { bytes }
    }

    /// Returns the hex encoding of the key.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns the raw key bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl TryFrom<&str> for TokenKey {
    type Error = CryptoError;

    fn try_from(secret: &str) -> Result<Self, Self::Error> {
        Self::from_hex(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key() {
        let key1 = TokenKey::generate();
        let key2 = TokenKey::generate();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_from_hex_valid() {
        let secret = "ab".repeat(KEY_SIZE);
        let key = TokenKey::from_hex(&secret).unwrap();
        assert_eq!(key.as_bytes(), &[0xAB; KEY_SIZE]);
        assert_eq!(key.to_hex(), secret);
    }

    #[test]
    fn test_from_hex_wrong_length() {
        let result = TokenKey::from_hex("abcd");
        assert_eq!(result, Err(CryptoError::InvalidKeyLength(2)));
    }

    #[test]
    fn test_from_hex_not_hex() {
        let result = TokenKey::from_hex(&"zz".repeat(KEY_SIZE));
        assert_eq!(result, Err(CryptoError::InvalidKeyEncoding));
    }

    #[test]
    fn test_debug_redacts_bytes() {
        let key = TokenKey::from_hex(&"ab".repeat(KEY_SIZE)).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("ab"));
    }
}
