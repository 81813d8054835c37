//! AES-256-GCM encryption and decryption with detached tags.
//!
//! JWE compact serialization carries the initialization vector, ciphertext
//! and authentication tag as separate segments, so [`seal`] returns them
//! apart and [`open`] takes them apart.
//!
//! - **IV**: 12-byte random value, fresh for every call
//! - **Ciphertext**: same length as plaintext
//! - **Tag**: 16-byte authentication tag covering ciphertext and AAD

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};

use super::error::{CryptoError, CryptoResult};
use super::key::TokenKey;

/// Size of the AES-GCM initialization vector in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Output of [`seal`]: the three variable parts of an encrypted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Random initialization vector.
    pub iv: [u8; NONCE_SIZE],
    /// Encrypted payload.
    pub ciphertext: Vec<u8>,
    /// Authentication tag.
    pub tag: [u8; TAG_SIZE],
}

/// Encrypts `plaintext` and authenticates it together with `aad`.
pub fn seal(key: &TokenKey, plaintext: &[u8], aad: &[u8]) -> CryptoResult<Sealed> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut ciphertext = cipher
        .encrypt(&nonce, Payload { msg: plaintext, aad })
        .map_err(|_| CryptoError::EncryptionFailed)?;

    // The cipher appends the tag to the ciphertext.
    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::EncryptionFailed);
    }
    let tag_bytes = ciphertext.split_off(ciphertext.len() - TAG_SIZE);

    let mut iv = [0u8; NONCE_SIZE];
    iv.copy_from_slice(nonce.as_slice());
    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&tag_bytes);

    Ok(Sealed {
        iv,
        ciphertext,
        tag,
    })
}

/// Decrypts a message produced by [`seal`].
///
/// # Errors
///
/// - [`CryptoError::InvalidPartLength`] if the IV or tag has the wrong size
/// - [`CryptoError::DecryptionFailed`] on a wrong key, tampered data or mismatched AAD
pub fn open(
    key: &TokenKey,
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
    aad: &[u8],
) -> CryptoResult<Vec<u8>> {
    if iv.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidPartLength("iv"));
    }
    if tag.len() != TAG_SIZE {
        return Err(CryptoError::InvalidPartLength("tag"));
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut message = Vec::with_capacity(ciphertext.len() + TAG_SIZE);
    message.extend_from_slice(ciphertext);
    message.extend_from_slice(tag);

    cipher
        .decrypt(Nonce::from_slice(iv), Payload { msg: &message, aad })
        .map_err(|_| CryptoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_roundtrip() {
        let key = TokenKey::generate();
        let sealed = seal(&key, b"hello, world!", b"aad").unwrap();

        assert_eq!(sealed.ciphertext.len(), b"hello, world!".len());
        let plaintext = open(&key, &sealed.iv, &sealed.ciphertext, &sealed.tag, b"aad").unwrap();
        assert_eq!(plaintext, b"hello, world!");
    }

    #[test]
    fn test_seal_uses_fresh_iv() {
        let key = TokenKey::generate();
        let first = seal(&key, b"same", b"").unwrap();
        let second = seal(&key, b"same", b"").unwrap();
        assert_ne!(first.iv, second.iv);
    }

    #[test]
    fn test_open_wrong_key() {
        let sealed = seal(&TokenKey::generate(), b"secret", b"").unwrap();
        let result = open(
            &TokenKey::generate(),
            &sealed.iv,
            &sealed.ciphertext,
            &sealed.tag,
            b"",
        );
        assert_eq!(result, Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_open_mismatched_aad() {
        let key = TokenKey::generate();
        let sealed = seal(&key, b"secret", b"header-a").unwrap();
        let result = open(&key, &sealed.iv, &sealed.ciphertext, &sealed.tag, b"header-b");
        assert_eq!(result, Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_open_corrupted_tag() {
        let key = TokenKey::generate();
        let mut sealed = seal(&key, b"secret", b"").unwrap();
        sealed.tag[0] ^= 0xFF;
        let result = open(&key, &sealed.iv, &sealed.ciphertext, &sealed.tag, b"");
        assert_eq!(result, Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_open_truncated_parts() {
        let key = TokenKey::generate();
        let sealed = seal(&key, b"secret", b"").unwrap();

        let result = open(&key, &sealed.iv[..4], &sealed.ciphertext, &sealed.tag, b"");
        assert_eq!(result, Err(CryptoError::InvalidPartLength("iv")));

        let result = open(&key, &sealed.iv, &sealed.ciphertext, &sealed.tag[..8], b"");
        assert_eq!(result, Err(CryptoError::InvalidPartLength("tag")));
    }
}
