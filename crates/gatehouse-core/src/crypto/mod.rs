//! Symmetric encryption primitives used by the token codec.
//!
//! Tokens are sealed with AES-256-GCM under a single pre-shared key. The key is
//! configured once as a hex string and decoded into a [`TokenKey`].
//!
//! # Example
//!
//! ```rust,ignore
//! use gatehouse_core::crypto::{TokenKey, open, seal};
//!
//! let key = TokenKey::generate();
//! let sealed = seal(&key, b"payload", b"header")?;
//! let plaintext = open(&key, &sealed.iv, &sealed.ciphertext, &sealed.tag, b"header")?;
//! assert_eq!(plaintext, b"payload");
//! ```

mod cipher;
mod error;
mod key;

pub use cipher::{NONCE_SIZE, Sealed, TAG_SIZE, open, seal};
pub use error::{CryptoError, CryptoResult};
pub use key::{KEY_SIZE, TokenKey};
