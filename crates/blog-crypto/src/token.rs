//! Signed bearer tokens.
//!
//! Wire form: `hex(claims_json) "." hex(ed25519_signature)`. The signature
//! covers the exact claims bytes, so claims are only parsed after the
//! signature checks out.

use blog_types::{Actor, Role, UserId};
use serde::{Deserialize, Serialize};

use crate::key::{SigningKey, SIGNATURE_LEN};

/// Identity established at login, carried inside an access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id.
    pub sub: UserId,
    pub username: String,
    pub role: Role,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds. The token is invalid at and after this instant.
    pub exp: i64,
}

impl Claims {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, self.username.clone(), self.role)
    }
}

/// A freshly issued token and its expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Issues and verifies access tokens with a single Ed25519 key.
pub struct TokenIssuer {
    key: SigningKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(key: SigningKey, ttl_secs: i64) -> Self {
        Self { key, ttl_secs }
    }

    pub fn public_key_hex(&self) -> String {
        self.key.public_hex()
    }

    /// Issue a token for `actor`, valid from now for the configured TTL.
    pub fn issue(&self, actor: &Actor) -> Result<IssuedToken, TokenError> {
        self.issue_at(actor, now_unix())
    }

    pub fn issue_at(&self, actor: &Actor, now: i64) -> Result<IssuedToken, TokenError> {
        let claims = Claims {
            sub: actor.id,
            username: actor.username.clone(),
            role: actor.role,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        let payload =
            serde_json::to_vec(&claims).map_err(|e| TokenError::Serialization(e.to_string()))?;
        let signature = self.key.sign(&payload);
        Ok(IssuedToken {
            token: format!("{}.{}", hex::encode(&payload), hex::encode(signature)),
            expires_at: claims.exp,
        })
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, now_unix())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let (payload_hex, sig_hex) = token.trim().split_once('.').ok_or(TokenError::Malformed)?;
        let payload = hex::decode(payload_hex).map_err(|_| TokenError::Malformed)?;
        let sig_bytes = hex::decode(sig_hex).map_err(|_| TokenError::Malformed)?;
        let signature: [u8; SIGNATURE_LEN] =
            sig_bytes.try_into().map_err(|_| TokenError::Malformed)?;
        if !self.key.verifies(&payload, &signature) {
            return Err(TokenError::BadSignature);
        }

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if claims.is_expired(now) {
            return Err(TokenError::Expired { exp: claims.exp });
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("public_key", &self.key.public_hex())
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Reasons a token is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token expired at {exp}")]
    Expired { exp: i64 },
    #[error("serialization error: {0}")]
    Serialization(String),
}
