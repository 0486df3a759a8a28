use std::sync::Arc;

use blog_crypto::{CredentialStore, TokenIssuer};
use blog_store::Database;

use crate::accounts::AccountService;
use crate::engagement::EngagementService;
use crate::error::ServiceResult;
use crate::identity::IdentityResolver;
use crate::posts::{PageLimits, PostService};

/// All services sharing one database handle and token issuer.
pub struct Blog {
    pub db: Arc<dyn Database>,
    pub tokens: Arc<TokenIssuer>,
    pub accounts: AccountService,
    pub identity: IdentityResolver,
    pub posts: PostService,
    pub engagement: EngagementService,
}

impl Blog {
    pub fn new(
        db: Arc<dyn Database>,
        credentials: CredentialStore,
        tokens: TokenIssuer,
        limits: PageLimits,
    ) -> ServiceResult<Self> {
        let tokens = Arc::new(tokens);
        Ok(Self {
            accounts: AccountService::new(db.clone(), credentials, tokens.clone())?,
            identity: IdentityResolver::new(db.clone(), tokens.clone()),
            posts: PostService::new(db.clone(), limits),
            engagement: EngagementService::new(db.clone()),
            db,
            tokens,
        })
    }
}

impl std::fmt::Debug for Blog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blog")
            .field("tokens", &self.tokens)
            .field("limits", &self.posts.limits())
            .finish_non_exhaustive()
    }
}
