use getrandom::fill;
use scrypt::Params;
use zeroize::Zeroizing;

use super::{KEY_LEN, SALT_LEN};
use crate::error::Error;

// Fixed scrypt parameters: N = 2^15 = 32768, r = 8, p = 1. Changing them
// silently invalidates every existing blob, since the blob format carries
// no parameter header.
const SCRYPT_LOG_N: u8 = 15;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Generate a fresh random salt for key derivation.
///
/// A new salt must be generated for every encryption; the salt is not
/// secret but has to travel alongside the ciphertext.
pub fn generate_salt() -> Result<[u8; SALT_LEN], Error> {
    let mut salt = [0u8; SALT_LEN];
    fill(&mut salt).map_err(Error::RandomSource)?;
    Ok(salt)
}

/// Derive a 32-byte key from a passphrase and salt with scrypt.
///
/// Deterministic: the same (passphrase, salt) pair always yields the same
/// key. The key is wrapped in [`Zeroizing`] so it is wiped on drop.
///
/// This is deliberately slow (memory-hard); keep it off latency-sensitive
/// paths.
pub fn derive_key(passphrase: &str, salt: &[u8; SALT_LEN]) -> Result<Zeroizing<[u8; KEY_LEN]>, Error> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| Error::KeyDerivation(format!("invalid scrypt parameters: {e}")))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt::scrypt(passphrase.as_bytes(), salt, &params, &mut *key)
        .map_err(|e| Error::KeyDerivation(format!("scrypt failed: {e}")))?;

    Ok(key)
}
