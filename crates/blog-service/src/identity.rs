use std::sync::Arc;

use blog_crypto::TokenIssuer;
use blog_store::Database;
use blog_types::Actor;

use crate::error::{ServiceError, ServiceResult};

/// Maps a bearer credential to the identity established at login.
pub struct IdentityResolver {
    db: Arc<dyn Database>,
    tokens: Arc<TokenIssuer>,
}

impl IdentityResolver {
    pub fn new(db: Arc<dyn Database>, tokens: Arc<TokenIssuer>) -> Self {
        Self { db, tokens }
    }

    /// Resolve `token` to an actor, or fail with `Unauthenticated`.
    ///
    /// The token must verify and be unexpired, and its subject must still
    /// exist. The returned role is the stored one.
    pub fn resolve(&self, token: &str) -> ServiceResult<Actor> {
        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            ServiceError::Unauthenticated
        })?;

        let user = self.db.session()?.get_user(claims.sub)?;
        match user {
            Some(user) if user.username == claims.username => Ok(Actor::from(&user)),
            _ => {
                tracing::debug!(user_id = %claims.sub, "token subject no longer exists");
                Err(ServiceError::Unauthenticated)
            }
        }
    }
}
