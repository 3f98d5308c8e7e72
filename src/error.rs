use std::fmt;

use crate::crypto::NONCE_LEN;

/// Failures of the encryption core.
///
/// Every variant is surfaced to the caller as an explicit result; the core
/// never logs. Messages avoid echoing key material, and `Authentication`
/// does not distinguish a wrong passphrase from tampering.
#[derive(Debug)]
pub enum Error {
    /// The OS random source could not produce salt or nonce bytes.
    RandomSource(getrandom::Error),
    /// scrypt rejected its parameters or failed to derive a key.
    KeyDerivation(String),
    /// The cipher could not be constructed from the derived key.
    CipherInit(String),
    /// Ciphertext blob too short to contain a nonce prefix.
    MalformedBlob { len: usize },
    /// Tag verification failed: wrong passphrase or salt, or the data was
    /// corrupted or tampered with.
    Authentication,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RandomSource(e) => write!(f, "OS random source failed: {e}"),
            Error::KeyDerivation(msg) => write!(f, "key derivation failed: {msg}"),
            Error::CipherInit(msg) => write!(f, "cipher construction failed: {msg}"),
            Error::MalformedBlob { len } => write!(
                f,
                "ciphertext blob too short: {len} bytes, need at least {NONCE_LEN}"
            ),
            Error::Authentication => {
                write!(f, "authentication failed: wrong passphrase or corrupted data")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::RandomSource(e) => Some(e),
            _ => None,
        }
    }
}
