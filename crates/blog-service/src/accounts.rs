use std::sync::Arc;

use blog_crypto::{CredentialStore, TokenIssuer};
use blog_store::Database;
use blog_types::{Actor, NewUser, Role, User};
use serde::{Deserialize, Serialize};

use crate::error::{Resource, ServiceError, ServiceResult};

/// Response to a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Unix seconds.
    pub expires_at: i64,
}

/// Registration, login, and administrative user removal.
pub struct AccountService {
    db: Arc<dyn Database>,
    credentials: CredentialStore,
    tokens: Arc<TokenIssuer>,
    /// Verified against when the username is unknown, so both login failure
    /// paths pay for one hash verification.
    decoy_digest: String,
}

impl AccountService {
    pub fn new(
        db: Arc<dyn Database>,
        credentials: CredentialStore,
        tokens: Arc<TokenIssuer>,
    ) -> ServiceResult<Self> {
        let decoy_digest = credentials.hash("decoy-password")?;
        Ok(Self { db, credentials, tokens, decoy_digest })
    }

    /// Parse a role name, reporting unknown roles as validation failures.
    pub fn parse_role(role: &str) -> ServiceResult<Role> {
        role.parse().map_err(|e: blog_types::TypeError| ServiceError::Validation(e.to_string()))
    }

    /// Create an account. The username must be unused.
    pub fn register(&self, username: &str, password: &str, role: Role) -> ServiceResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::validation("username must not be empty"));
        }
        if password.is_empty() {
            return Err(ServiceError::validation("password must not be empty"));
        }

        // Cheap rejection before paying for the hash; the insert below is
        // still the authority on uniqueness.
        if self.db.session()?.find_user_by_username(username)?.is_some() {
            return Err(ServiceError::validation("Username already registered"));
        }
        let password_hash = self.credentials.hash(password)?;

        let mut session = self.db.session()?;
        let user = session.insert_user(NewUser {
            username: username.to_string(),
            password_hash,
            role,
        })?;
        session.commit()?;

        tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a signed access token.
    pub fn login(&self, username: &str, password: &str) -> ServiceResult<AccessToken> {
        let user = self.db.session()?.find_user_by_username(username.trim())?;

        let user = match user {
            Some(user) if self.credentials.verify(password, &user.password_hash) => user,
            Some(_) => {
                tracing::warn!(%username, "login failed: wrong password");
                return Err(ServiceError::InvalidCredentials);
            }
            None => {
                let _ = self.credentials.verify(password, &self.decoy_digest);
                tracing::warn!(%username, "login failed: unknown user");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let issued = self.tokens.issue(&Actor::from(&user))?;
        tracing::info!(user_id = %user.id, "access token issued");
        Ok(AccessToken {
            access_token: issued.token,
            token_type: "bearer".into(),
            expires_at: issued.expires_at,
        })
    }

    /// Remove an account. Refused while the user still owns posts or comments.
    pub fn delete_user(&self, username: &str) -> ServiceResult<User> {
        let mut session = self.db.session()?;
        let user = session
            .find_user_by_username(username)?
            .ok_or(ServiceError::NotFound(Resource::User))?;
        session.delete_user(user.id)?;
        session.commit()?;

        tracing::info!(user_id = %user.id, username = %user.username, "user deleted");
        Ok(user)
    }

    pub fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.db.session()?.list_users()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_blog;

    #[test]
    fn register_then_login() {
        let blog = test_blog();
        let user = blog.accounts.register("alice", "secret", Role::Author).unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "secret");

        let token = blog.accounts.login("alice", "secret").unwrap();
        assert_eq!(token.token_type, "bearer");
        let actor = blog.identity.resolve(&token.access_token).unwrap();
        assert_eq!(actor.id, user.id);
        assert_eq!(actor.role, Role::Author);
    }

    #[test]
    fn duplicate_registration_fails_and_keeps_first() {
        let blog = test_blog();
        let first = blog.accounts.register("alice", "one", Role::Author).unwrap();
        let err = blog.accounts.register("alice", "two", Role::Admin).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Username already registered"));

        let users = blog.accounts.list_users().unwrap();
        assert_eq!(users, vec![first]);
        assert!(blog.accounts.login("alice", "one").is_ok());
        assert!(blog.accounts.login("alice", "two").is_err());
    }

    #[test]
    fn blank_input_rejected() {
        let blog = test_blog();
        assert!(matches!(
            blog.accounts.register("  ", "pw", Role::Reader),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            blog.accounts.register("carol", "", Role::Reader),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn bad_credentials() {
        let blog = test_blog();
        blog.accounts.register("alice", "secret", Role::Author).unwrap();
        assert!(matches!(blog.accounts.login("alice", "nope"), Err(ServiceError::InvalidCredentials)));
        assert!(matches!(blog.accounts.login("mallory", "secret"), Err(ServiceError::InvalidCredentials)));
    }

    #[test]
    fn parse_role_names() {
        assert_eq!(AccountService::parse_role("admin").unwrap(), Role::Admin);
        assert!(matches!(AccountService::parse_role("owner"), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn delete_user_without_content() {
        let blog = test_blog();
        blog.accounts.register("temp", "pw", Role::Reader).unwrap();
        let removed = blog.accounts.delete_user("temp").unwrap();
        assert_eq!(removed.username, "temp");
        assert!(matches!(blog.accounts.delete_user("temp"), Err(ServiceError::NotFound(Resource::User))));
    }

    #[test]
    fn delete_user_with_posts_refused() {
        let blog = test_blog();
        let alice = crate::testing::actor(&blog, "alice", Role::Author);
        blog.posts.create_post(&alice, "Hello", "World").unwrap();
        assert!(matches!(blog.accounts.delete_user("alice"), Err(ServiceError::Validation(_))));
        assert_eq!(blog.accounts.list_users().unwrap().len(), 1);
    }

    #[test]
    fn delete_user_with_only_comments_refused() {
        let blog = test_blog();
        let alice = crate::testing::actor(&blog, "alice", Role::Author);
        let rita = crate::testing::actor(&blog, "rita", Role::Reader);
        let post = blog.posts.create_post(&alice, "Hello", "World").unwrap();
        blog.engagement.add_comment(&rita, post.id, "nice").unwrap();

        let err = blog.accounts.delete_user("rita").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("1 comment")));
        assert!(blog.identity.resolve(&blog.accounts.login("rita", "password").unwrap().access_token).is_ok());
    }
}
