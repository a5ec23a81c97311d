// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The long-lived Ed25519 identity: generation, storage, signing.
//!
//! The identity lives in two sibling files under `$HOME/.pack`: the secret
//! key as 64 raw bytes (the expanded Ed25519 form) and the public key as 32
//! raw bytes. No PEM framing, no trailing newline. What is signed is always
//! a 32-byte BLAKE3 file digest, never the file itself: that keeps signing
//! cost independent of file size, and lets the receiver stream payload to
//! disk before verifying.

use std::env;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use blake3;
use ed25519_compact::{KeyPair, PublicKey, SecretKey, Signature};

use error::{Error, Result};

pub const PUBLIC_KEY_LEN: usize = 32;
pub const SECRET_KEY_LEN: usize = 64;
pub const SIGNATURE_LEN: usize = 64;

/// The per-user key directory, `$HOME/.pack`.
pub fn key_dir() -> Result<PathBuf> {
    let msg = "HOME is not set; cannot locate the key directory.";
    let home = env::var_os("HOME").ok_or(Error::Operation(msg))?;
    let mut dir = PathBuf::from(home);
    dir.push(".pack");
    Ok(dir)
}

pub fn secret_key_path() -> Result<PathBuf> {
    let mut path = key_dir()?;
    path.push("id_ed25519");
    Ok(path)
}

pub fn public_key_path() -> Result<PathBuf> {
    let mut path = key_dir()?;
    path.push("id_ed25519.pub");
    Ok(path)
}

/// Generate a fresh Ed25519 keypair.
pub fn generate() -> KeyPair {
    KeyPair::generate()
}

/// Write both key files, truncating existing ones.
///
/// If the second write fails the first may have succeeded; the caller gets a
/// single error either way and should treat both files as suspect.
pub fn save(pair: &KeyPair, pub_path: &Path, sec_path: &Path) -> Result<()> {
    let mut f = fs::File::create(pub_path)?;
    f.write_all(pair.pk.as_ref())?;

    let mut f = fs::File::create(sec_path)?;
    f.write_all(pair.sk.as_ref())?;

    Ok(())
}

/// Read one raw-byte key file and insist on its exact length.
fn read_key_file(path: &Path, expected: usize) -> Result<Vec<u8>> {
    let mut f = fs::File::open(path)?;
    let mut bytes = Vec::with_capacity(expected);
    f.read_to_end(&mut bytes)?;

    if bytes.len() != expected {
        return Err(Error::KeyLength {
            expected: expected,
            actual: bytes.len(),
        })
    }

    Ok(bytes)
}

/// Load the keypair back from its two raw-byte files.
pub fn load(pub_path: &Path, sec_path: &Path) -> Result<KeyPair> {
    let pub_bytes = read_key_file(pub_path, PUBLIC_KEY_LEN)?;
    let sec_bytes = read_key_file(sec_path, SECRET_KEY_LEN)?;

    let pk = PublicKey::from_slice(&pub_bytes)?;
    let sk = SecretKey::from_slice(&sec_bytes)?;

    Ok(KeyPair { pk: pk, sk: sk })
}

/// Produce a detached signature over the 32 digest bytes.
pub fn sign_digest(sk: &SecretKey, digest: &blake3::Hash) -> Signature {
    let noise = None;
    sk.sign(digest.as_bytes(), noise)
}

/// Check a detached signature over the 32 digest bytes.
pub fn verify_digest(pk: &PublicKey, digest: &blake3::Hash, sig: &Signature) -> bool {
    pk.verify(digest.as_bytes(), sig).is_ok()
}

#[cfg(test)]
mod test {
    use std::fs;

    use blake3;
    use ed25519_compact::{KeyPair, Seed, Signature};
    use tempfile;

    use error::Error;
    use super::{load, save, sign_digest, verify_digest};

    fn get_test_key_pair() -> KeyPair {
        // Produce the keypair from the same 32 bytes each time in the tests,
        // so they are deterministic.
        let seed = Seed::new(*b"pack-test-key-do-not-use-outside");
        KeyPair::from_seed(seed)
    }

    #[test]
    fn sign_digest_then_verify_digest_succeeds() {
        let pair = get_test_key_pair();
        let digest = blake3::hash(b"hello world");
        let sig = sign_digest(&pair.sk, &digest);
        assert!(verify_digest(&pair.pk, &digest, &sig));
    }

    #[test]
    fn verify_digest_rejects_wrong_digest() {
        let pair = get_test_key_pair();
        let sig = sign_digest(&pair.sk, &blake3::hash(b"hello world"));
        assert!(!verify_digest(&pair.pk, &blake3::hash(b"hello worle"), &sig));
    }

    #[test]
    fn verify_digest_rejects_wrong_key() {
        let pair = get_test_key_pair();
        let other = KeyPair::from_seed(Seed::new(*b"another-test-key-do-not-use-ever"));
        let digest = blake3::hash(b"hello world");
        let sig = sign_digest(&pair.sk, &digest);
        assert!(!verify_digest(&other.pk, &digest, &sig));
    }

    #[test]
    fn verify_digest_rejects_garbage_signature() {
        let pair = get_test_key_pair();
        let digest = blake3::hash(b"hello world");
        let sig = Signature::new([0x5a_u8; 64]);
        assert!(!verify_digest(&pair.pk, &digest, &sig));
    }

    #[test]
    fn save_then_load_round_trips_the_pair() {
        let dir = tempfile::tempdir().unwrap();
        let pub_path = dir.path().join("id_ed25519.pub");
        let sec_path = dir.path().join("id_ed25519");

        let pair = get_test_key_pair();
        save(&pair, &pub_path, &sec_path).unwrap();

        // Exact raw lengths on disk, no framing.
        assert_eq!(fs::metadata(&pub_path).unwrap().len(), 32);
        assert_eq!(fs::metadata(&sec_path).unwrap().len(), 64);

        let loaded = load(&pub_path, &sec_path).unwrap();
        assert_eq!(loaded.pk.as_ref(), pair.pk.as_ref());

        // The loaded secret key must still produce signatures the public
        // key accepts, all zeros included.
        let digest = blake3::hash(&[0_u8; 32]);
        let sig = sign_digest(&loaded.sk, &digest);
        assert!(verify_digest(&loaded.pk, &digest, &sig));
    }

    #[test]
    fn load_rejects_truncated_public_key() {
        let dir = tempfile::tempdir().unwrap();
        let pub_path = dir.path().join("id_ed25519.pub");
        let sec_path = dir.path().join("id_ed25519");

        let pair = get_test_key_pair();
        save(&pair, &pub_path, &sec_path).unwrap();
        fs::write(&pub_path, &[0_u8; 31]).unwrap();

        match load(&pub_path, &sec_path) {
            Err(Error::KeyLength { expected: 32, actual: 31 }) => {
                // This is expected.
            }
            _ => panic!("Truncated public key should be rejected."),
        }
    }

    #[test]
    fn load_rejects_oversized_secret_key() {
        let dir = tempfile::tempdir().unwrap();
        let pub_path = dir.path().join("id_ed25519.pub");
        let sec_path = dir.path().join("id_ed25519");

        let pair = get_test_key_pair();
        save(&pair, &pub_path, &sec_path).unwrap();
        fs::write(&sec_path, &[0_u8; 65]).unwrap();

        match load(&pub_path, &sec_path) {
            Err(Error::KeyLength { expected: 64, actual: 65 }) => {
                // This is expected.
            }
            _ => panic!("Oversized secret key should be rejected."),
        }
    }
}
