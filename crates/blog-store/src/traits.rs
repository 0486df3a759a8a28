use blog_types::{
    Comment, Like, NewComment, NewPost, NewUser, Post, PostId, PostUpdate, User, UserId,
};

use crate::error::StoreResult;

/// A handle to the persistence engine.
///
/// Constructed once at startup and shared (typically as `Arc<dyn Database>`).
pub trait Database: Send + Sync {
    /// Open a unit of work. The session is released when dropped.
    fn session(&self) -> StoreResult<Box<dyn Session + '_>>;
}

/// One transactional unit of work.
///
/// Writes are visible to later reads in the same session. Nothing is kept
/// unless [`Session::commit`] returns `Ok`.
pub trait Session {
    // ---- users ----

    /// Insert a user. Fails with `DuplicateUsername` if the name is taken.
    fn insert_user(&mut self, user: NewUser) -> StoreResult<User>;

    fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Delete a user and their likes. Returns `false` if absent.
    ///
    /// Fails with `UserHasContent` while the user owns posts or comments.
    fn delete_user(&mut self, id: UserId) -> StoreResult<bool>;

    fn list_users(&self) -> StoreResult<Vec<User>>;

    // ---- posts ----

    /// Insert a post. Fails with `UnknownUser` if the owner does not exist.
    fn insert_post(&mut self, post: NewPost) -> StoreResult<Post>;

    fn get_post(&self, id: PostId) -> StoreResult<Option<Post>>;

    /// Overwrite title and content. Returns `None` if the post is absent.
    fn update_post(&mut self, id: PostId, update: PostUpdate) -> StoreResult<Option<Post>>;

    /// Delete a post with its comments and likes. Returns `false` if absent.
    fn delete_post(&mut self, id: PostId) -> StoreResult<bool>;

    /// Posts in insertion order, skipping `skip` and returning at most `limit`.
    fn list_posts(&self, skip: usize, limit: usize) -> StoreResult<Vec<Post>>;

    // ---- comments ----

    fn insert_comment(&mut self, comment: NewComment) -> StoreResult<Comment>;

    fn list_comments(&self, post: PostId) -> StoreResult<Vec<Comment>>;

    // ---- likes ----

    /// Add a like. Returns `true` if it was not already present.
    fn insert_like(&mut self, like: Like) -> StoreResult<bool>;

    /// Remove a like. Returns `true` if it was present.
    fn delete_like(&mut self, like: Like) -> StoreResult<bool>;

    fn count_likes(&self, post: PostId) -> StoreResult<usize>;

    /// Make this session's writes durable and release it.
    fn commit(self: Box<Self>) -> StoreResult<()>;
}
