//! Cryptographic core: key derivation and authenticated encryption.
//!
//! Everything here is stateless; salts and nonces are drawn fresh from the
//! OS random source on every call.

pub mod aead;
pub mod kdf;

pub use aead::{open, seal};
pub use kdf::{derive_key, generate_salt};

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the nonce (12 bytes, the AES-GCM standard size).
pub const NONCE_LEN: usize = 12;
/// Length of the encryption key (32 bytes / 256 bits for AES-256).
pub const KEY_LEN: usize = 32;
/// Length of the GCM authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
