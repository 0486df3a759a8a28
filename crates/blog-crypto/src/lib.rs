//! Cryptographic primitives for the blog backend.
//!
//! Provides salted Argon2id password hashing ([`CredentialStore`]) and
//! Ed25519-signed access tokens carrying the identity established at login
//! ([`TokenIssuer`]).
//!
//! All crypto operations wrap established libraries; no custom cryptography.

pub mod key;
pub mod password;
pub mod token;

pub use key::{KeyError, SigningKey};
pub use password::{CredentialStore, HashCost, PasswordError};
pub use token::{Claims, IssuedToken, TokenError, TokenIssuer};
