//! Ed25519 key material for access tokens.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signer, Verifier};

pub(crate) const SIGNATURE_LEN: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Secret seed that signs and checks access tokens.
///
/// Written to config files as 64 hex characters.
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
}

impl SigningKey {
    pub fn generate() -> Self {
        Self { inner: ed25519_dalek::SigningKey::generate(&mut rand::thread_rng()) }
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim()).map_err(|_| KeyError::NotHex)?;
        let seed: [u8; ed25519_dalek::SECRET_KEY_LENGTH] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| KeyError::WrongLength(b.len()))?;
        Ok(Self { inner: ed25519_dalek::SigningKey::from_bytes(&seed) })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.inner.to_bytes())
    }

    /// Hex of the public half. Safe to log.
    pub fn public_hex(&self) -> String {
        hex::encode(self.inner.verifying_key().to_bytes())
    }

    pub(crate) fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.inner.sign(message).to_bytes()
    }

    pub(crate) fn verifies(&self, message: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool {
        let signature = ed25519_dalek::Signature::from_bytes(signature);
        self.inner.verifying_key().verify(message, &signature).is_ok()
    }
}

impl FromStr for SigningKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").field("public", &self.public_hex()).finish_non_exhaustive()
    }
}

/// A signing key string that cannot be used.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("signing key is not hex")]
    NotHex,
    #[error("signing key must be 32 bytes, got {0}")]
    WrongLength(usize),
}
