use std::fmt;

use blog_crypto::{PasswordError, TokenError};
use blog_store::StoreError;
use thiserror::Error;

/// Kinds of entity a lookup can miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    User,
    Post,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Post => write!(f, "Post"),
        }
    }
}

/// Caller-visible failures of a service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input or a uniqueness/referential rule was violated.
    #[error("{0}")]
    Validation(String),

    /// Login with an unknown username or a wrong password.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// Missing, malformed, expired or forged bearer credential.
    #[error("not authenticated")]
    Unauthenticated,

    /// Authenticated, but the policy denied the action.
    #[error("not enough permissions: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(_) => Self::validation("Username already registered"),
            StoreError::UserHasContent { user, posts, comments } => Self::Validation(format!(
                "user {user} still owns {posts} post(s) and {comments} comment(s)"
            )),
            StoreError::UnknownUser(_) => Self::NotFound(Resource::User),
            StoreError::UnknownPost(_) => Self::NotFound(Resource::Post),
            other => Self::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
