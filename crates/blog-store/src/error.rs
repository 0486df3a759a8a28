use blog_types::{PostId, UserId};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A user with this username already exists.
    #[error("username already registered: {0}")]
    DuplicateUsername(String),

    /// A row references a user that does not exist.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    /// A row references a post that does not exist.
    #[error("unknown post: {0}")]
    UnknownPost(PostId),

    /// Two rows of a loaded document share an id.
    #[error("duplicate id {id} in {table}")]
    DuplicateId { table: &'static str, id: i64 },

    /// The user still owns rows that reference it.
    #[error("user {user} still owns {posts} post(s) and {comments} comment(s)")]
    UserHasContent {
        user: UserId,
        posts: usize,
        comments: usize,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A previous session panicked while holding the lock.
    #[error("database lock poisoned")]
    Poisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
