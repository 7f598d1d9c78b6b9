//! Content encryption for notes flagged `encrypted`.
//!
//! Ciphertext is `base64(nonce || aes-256-gcm(content))`. Keys are owned by a
//! session's [`Store`](crate::storage::Store); there is no process-wide key.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{Error, Result};

const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a key from a passphrase, salted with the workspace owner
    pub fn from_passphrase(username: &str, passphrase: &str) -> Self {
        let digest: [u8; 32] = Sha256::digest(format!("{}:{}", username, passphrase).as_bytes()).into();
        Self(digest)
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.0).map_err(|e| Error::Crypto(e.to_string()))
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = self.cipher()?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| Error::Crypto("encryption failed".to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + sealed.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&sealed);
        Ok(STANDARD.encode(payload))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let payload = STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::Crypto(format!("invalid ciphertext encoding: {}", e)))?;
        if payload.len() < NONCE_LEN {
            return Err(Error::Crypto("ciphertext too short".to_string()));
        }
        let (nonce, sealed) = payload.split_at(NONCE_LEN);
        let plain = self
            .cipher()?
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| Error::Crypto("decryption failed (wrong key or corrupt data)".to_string()))?;
        String::from_utf8(plain).map_err(|_| Error::Crypto("decrypted content is not UTF-8".to_string()))
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let key = EncryptionKey::from_passphrase("alice", "hunter2");
        let text = "secret plans\nwith ünïcode";
        let sealed = key.encrypt(text).unwrap();
        assert_ne!(sealed, text);
        assert_eq!(key.decrypt(&sealed).unwrap(), text);
    }

    #[test]
    fn test_nonce_is_fresh() {
        let key = EncryptionKey::from_bytes([7; 32]);
        assert_ne!(key.encrypt("same").unwrap(), key.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = EncryptionKey::from_passphrase("alice", "a").encrypt("x").unwrap();
        let other = EncryptionKey::from_passphrase("alice", "b");
        assert!(matches!(other.decrypt(&sealed), Err(Error::Crypto(_))));
    }

    #[test]
    fn test_garbage_input() {
        let key = EncryptionKey::from_bytes([1; 32]);
        assert!(key.decrypt("not base64!!").is_err());
        assert!(key.decrypt("AAAA").is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let key = EncryptionKey::from_bytes([9; 32]);
        assert_eq!(format!("{:?}", key), "EncryptionKey(..)");
    }
}
