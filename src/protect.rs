//! Data Protection Module
//!
//! Encrypts cache payloads before they leave process memory.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{CacheError, Result};

/// Purpose string mixed into the key for cache payloads.
pub const CACHE_PROTECTION_PURPOSE: &str = "explorer-cache:payload";

const NONCE_LEN: usize = 12;

/// Opaque encrypt/decrypt capability applied to every cached payload.
pub trait DataProtector: Send + Sync {
    /// Encrypts `plaintext`, returning a printable ciphertext.
    fn protect(&self, plaintext: &str) -> Result<String>;

    /// Reverses [`DataProtector::protect`].
    fn unprotect(&self, ciphertext: &str) -> Result<String>;
}

// == AES-GCM Protector ==
/// AES-256-GCM protector with a key derived from a purpose and a secret.
///
/// Output is `base64(nonce || ciphertext || tag)` with a fresh nonce per call.
pub struct AesDataProtector {
    cipher: Aes256Gcm,
}

impl AesDataProtector {
    /// Derives the key as `SHA-256(purpose || 0x00 || secret)`.
    pub fn new(purpose: &str, secret: &str) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(purpose.as_bytes());
        hasher.update([0u8]);
        hasher.update(secret.as_bytes());
        let key = hasher.finalize();

        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CacheError::Protection(format!("invalid key: {}", e)))?;

        Ok(Self { cipher })
    }

    /// Protector with a random key. Payloads written with it are unreadable
    /// after the process exits.
    pub fn ephemeral() -> Result<Self> {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::new(CACHE_PROTECTION_PURPOSE, &STANDARD.encode(secret))
    }
}

impl std::fmt::Debug for AesDataProtector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesDataProtector").finish_non_exhaustive()
    }
}

impl DataProtector for AesDataProtector {
    fn protect(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|_| CacheError::Protection("encryption failed".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(sealed))
    }

    fn unprotect(&self, ciphertext: &str) -> Result<String> {
        let sealed = STANDARD
            .decode(ciphertext)
            .map_err(|e| CacheError::Protection(format!("malformed ciphertext: {}", e)))?;

        if sealed.len() < NONCE_LEN {
            return Err(CacheError::Protection("ciphertext too short".to_string()));
        }

        let (nonce_bytes, body) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), body)
            .map_err(|_| CacheError::Protection("decryption failed".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|e| CacheError::Protection(format!("plaintext is not UTF-8: {}", e)))
    }
}
