use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};

const SALT_LEN: usize = 16;

/// Argon2id work factors.
///
/// Only affects newly created digests; verification reads the parameters
/// embedded in each PHC string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

/// Salted, slow, one-way password hashing.
#[derive(Clone)]
pub struct CredentialStore {
    argon2: Argon2<'static>,
}

impl CredentialStore {
    /// Argon2id with the library's recommended parameters.
    pub fn new() -> Self {
        Self { argon2: Argon2::default() }
    }

    /// Argon2id with explicit work factors.
    pub fn with_cost(cost: HashCost) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| PasswordError::InvalidCost(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt, returning a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(digest.to_string())
    }

    /// Check a password against a PHC digest.
    ///
    /// A digest that does not parse verifies as `false`.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

/// Errors from password hashing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("invalid hash cost: {0}")]
    InvalidCost(String),
}
