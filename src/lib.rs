//! Passphrase-based authenticated encryption for byte payloads and files.
//!
//! A key is derived from the passphrase with scrypt (N=32768, r=8, p=1)
//! and a fresh 16-byte random salt, then the payload is sealed with
//! AES-256-GCM under a fresh 12-byte nonce. The salt travels out-of-band
//! next to the ciphertext blob; the blob itself is `nonce || ciphertext ||
//! tag` with no further header.

mod crypto;
mod error;
mod storage;

pub use crate::crypto::{KEY_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
pub use crate::error::Error;

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// File extension for ciphertext written by [`encrypt_file`].
pub const CIPHERTEXT_EXT: &str = "3dfx";
/// File extension for the companion salt file.
pub const SALT_EXT: &str = "salt";

/// Encrypt `plaintext` under a key derived from `passphrase` and a fresh
/// random salt.
///
/// Returns the ciphertext blob (`nonce || ciphertext || tag`) and the salt.
/// The salt is not secret but must be kept: decryption needs it to
/// re-derive the key. Every call draws a new salt and a new nonce, so
/// encrypting the same input twice yields different blobs.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<(Vec<u8>, [u8; SALT_LEN]), Error> {
    let salt = crypto::generate_salt()?;
    let key = crypto::derive_key(passphrase, &salt)?;

    let blob = crypto::seal(&key, plaintext)?;
    Ok((blob, salt))
}

/// Decrypt a ciphertext blob produced by [`encrypt`], given the salt it
/// was returned with and the original passphrase.
///
/// All-or-nothing: a wrong passphrase, a wrong salt, or any modification
/// of the blob fails with [`Error::Authentication`] and releases no
/// plaintext.
pub fn decrypt(blob: &[u8], salt: &[u8; SALT_LEN], passphrase: &str) -> Result<Vec<u8>, Error> {
    let key = crypto::derive_key(passphrase, salt)?;
    crypto::open(&key, blob)
}

/// Encrypt a file, writing `<name>.3dfx` and `<name>.salt`.
///
/// The whole file is buffered in memory; there is no streaming. Output
/// lands in `out_dir` when given, otherwise next to the input. Returns
/// the paths of the ciphertext and salt files.
pub fn encrypt_file(
    input: &Path,
    out_dir: Option<&Path>,
    passphrase: &str,
) -> Result<(PathBuf, PathBuf)> {
    let data = storage::read_file(input)?;

    let file_name = input
        .file_name()
        .with_context(|| format!("input path has no file name: {}", input.display()))?
        .to_string_lossy();

    let dir = match out_dir {
        Some(d) => d.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let blob_path = dir.join(format!("{file_name}.{CIPHERTEXT_EXT}"));
    let salt_path = dir.join(format!("{file_name}.{SALT_EXT}"));

    let (blob, salt) = encrypt(&data, passphrase)?;

    storage::write_atomic(&blob_path, &blob)?;
    storage::write_atomic(&salt_path, &salt)?;

    Ok((blob_path, salt_path))
}

/// Decrypt a `.3dfx` file using its sibling `.salt` file.
///
/// Plaintext is written to `out_path` when given, otherwise to the input
/// path minus its `.3dfx` extension. Returns the path written.
pub fn decrypt_file(input: &Path, out_path: Option<&Path>, passphrase: &str) -> Result<PathBuf> {
    if input.extension().and_then(|e| e.to_str()) != Some(CIPHERTEXT_EXT) {
        bail!(
            "expected a .{CIPHERTEXT_EXT} file, got {}",
            input.display()
        );
    }

    let salt_path = input.with_extension(SALT_EXT);
    let out_path = match out_path {
        Some(p) => p.to_path_buf(),
        None => input.with_extension(""),
    };

    let blob = storage::read_file(input)?;
    let salt_bytes = storage::read_file(&salt_path)?;
    let salt: [u8; SALT_LEN] = salt_bytes.as_slice().try_into().with_context(|| {
        format!(
            "salt file {} must be exactly {SALT_LEN} bytes",
            salt_path.display()
        )
    })?;

    let plaintext = decrypt(&blob, &salt, passphrase)?;
    storage::write_atomic(&out_path, &plaintext)?;

    Ok(out_path)
}

/// Encrypt `data` and write the ciphertext blob to `path`, returning the
/// salt. The caller is responsible for keeping the salt.
pub fn encrypt_to_file(path: &Path, data: &[u8], passphrase: &str) -> Result<[u8; SALT_LEN]> {
    let (blob, salt) = encrypt(data, passphrase)?;
    storage::write_atomic(path, &blob)?;
    Ok(salt)
}

/// Read a ciphertext blob from `path` and decrypt it with the given salt.
pub fn decrypt_from_file(path: &Path, salt: &[u8; SALT_LEN], passphrase: &str) -> Result<Vec<u8>> {
    let blob = storage::read_file(path)?;
    Ok(decrypt(&blob, salt, passphrase)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let (blob, salt) = encrypt(b"attack at dawn", "pass1").unwrap();
        let plaintext = decrypt(&blob, &salt, "pass1").unwrap();

        assert_eq!(plaintext, b"attack at dawn");
    }

    #[test]
    fn empty_plaintext_roundtrip() {
        let (blob, salt) = encrypt(b"", "pw").unwrap();
        assert_eq!(blob.len(), NONCE_LEN + TAG_LEN);

        let plaintext = decrypt(&blob, &salt, "pw").unwrap();
        assert!(plaintext.is_empty());
    }

    #[test]
    fn hello_world_blob_is_39_bytes() {
        let (blob, salt) = encrypt(b"Hello World", "pass1").unwrap();

        assert_eq!(blob.len(), 12 + 11 + 16);
        assert_eq!(salt.len(), 16);
        assert_eq!(decrypt(&blob, &salt, "pass1").unwrap(), b"Hello World");
    }

    #[test]
    fn wrong_passphrase_fails_authentication() {
        let (blob, salt) = encrypt(b"secret", "correct").unwrap();

        assert!(matches!(
            decrypt(&blob, &salt, "wrong"),
            Err(Error::Authentication)
        ));
    }

    #[test]
    fn tampered_salt_fails_authentication() {
        let (blob, mut salt) = encrypt(b"secret", "pw").unwrap();
        salt[0] ^= 0x01;

        assert!(matches!(
            decrypt(&blob, &salt, "pw"),
            Err(Error::Authentication)
        ));
    }

    #[test]
    fn tampered_blob_fails_authentication() {
        let (mut blob, salt) = encrypt(b"secret", "pw").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x80;

        assert!(matches!(
            decrypt(&blob, &salt, "pw"),
            Err(Error::Authentication)
        ));
    }

    #[test]
    fn repeated_encryption_differs() {
        let (b1, s1) = encrypt(b"same input", "pw").unwrap();
        let (b2, s2) = encrypt(b"same input", "pw").unwrap();

        assert_ne!(s1, s2);
        assert_ne!(b1[..NONCE_LEN], b2[..NONCE_LEN]);
        assert_ne!(b1, b2);
    }

    #[test]
    fn short_blob_is_malformed() {
        let (_, salt) = encrypt(b"x", "pw").unwrap();

        assert!(matches!(
            decrypt(&[0u8; 5], &salt, "pw"),
            Err(Error::MalformedBlob { len: 5 })
        ));
    }

    #[test]
    fn file_roundtrip_with_suffix_convention() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, b"file contents").unwrap();

        let (blob_path, salt_path) = encrypt_file(&input, None, "pw").unwrap();
        assert_eq!(blob_path, dir.path().join("notes.txt.3dfx"));
        assert_eq!(salt_path, dir.path().join("notes.txt.salt"));
        assert_eq!(fs::read(&salt_path).unwrap().len(), SALT_LEN);

        // decrypt to a fresh path so we do not clobber the original
        let out = dir.path().join("restored.txt");
        let written = decrypt_file(&blob_path, Some(&out), "pw").unwrap();

        assert_eq!(written, out);
        assert_eq!(fs::read(&out).unwrap(), b"file contents");
    }

    #[test]
    fn decrypt_file_default_output_strips_suffix() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, b"data").unwrap();

        let (blob_path, _) = encrypt_file(&input, None, "pw").unwrap();
        fs::remove_file(&input).unwrap();

        let written = decrypt_file(&blob_path, None, "pw").unwrap();

        assert_eq!(written, dir.path().join("notes.txt"));
        assert_eq!(fs::read(written).unwrap(), b"data");
    }

    #[test]
    fn encrypt_file_into_separate_directory() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let input = dir.path().join("notes.txt");
        fs::write(&input, b"data").unwrap();

        let (blob_path, salt_path) = encrypt_file(&input, Some(&out_dir), "pw").unwrap();

        assert_eq!(blob_path, out_dir.join("notes.txt.3dfx"));
        assert_eq!(salt_path, out_dir.join("notes.txt.salt"));
        assert!(blob_path.exists() && salt_path.exists());
    }

    #[test]
    fn decrypt_file_rejects_wrong_extension() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, b"data").unwrap();

        assert!(decrypt_file(&input, None, "pw").is_err());
    }

    #[test]
    fn encrypt_to_file_and_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");

        let salt = encrypt_to_file(&path, b"payload", "pw").unwrap();
        let plaintext = decrypt_from_file(&path, &salt, "pw").unwrap();

        assert_eq!(plaintext, b"payload");
    }

    #[test]
    fn missing_input_file_is_an_io_error() {
        let dir = tempdir().unwrap();

        let err = encrypt_file(&dir.path().join("nope.txt"), None, "pw").unwrap_err();
        assert!(err.downcast_ref::<Error>().is_none());
    }
}
