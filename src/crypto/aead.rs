use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use getrandom::fill;

use super::{KEY_LEN, NONCE_LEN};
use crate::error::Error;

/// Encrypt and authenticate `plaintext` under `key` with AES-256-GCM.
///
/// A fresh random 12-byte nonce is drawn for every call and prepended to
/// the sealed output, so the returned blob is `nonce || ciphertext || tag`
/// and self-contained apart from the key. Nonce reuse under one key would
/// break both confidentiality and authenticity; never cache or replay
/// nonces.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| Error::CipherInit(format!("invalid key length: {e}")))?;

    let mut nonce = [0u8; NONCE_LEN];
    fill(&mut nonce).map_err(Error::RandomSource)?;

    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| Error::CipherInit("AEAD seal failed".into()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(blob)
}

/// Verify and decrypt a nonce-prefixed blob produced by [`seal`].
///
/// All-or-nothing: either the exact original plaintext comes back, or an
/// error and nothing else. Tag verification happens before any plaintext
/// is released.
pub fn open(key: &[u8; KEY_LEN], blob: &[u8]) -> Result<Vec<u8>, Error> {
    if blob.len() < NONCE_LEN {
        return Err(Error::MalformedBlob { len: blob.len() });
    }

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| Error::CipherInit(format!("invalid key length: {e}")))?;

    let (nonce, sealed) = blob.split_at(NONCE_LEN);

    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| Error::Authentication)
}
