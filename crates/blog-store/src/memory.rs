use std::sync::{RwLock, RwLockWriteGuard};

use blog_types::{
    Comment, Like, NewComment, NewPost, NewUser, Post, PostId, PostUpdate, User, UserId,
};

use crate::error::{StoreError, StoreResult};
use crate::tables::Tables;
use crate::traits::{Database, Session};

/// Called with the final tables when a session that wrote something commits.
pub(crate) trait CommitHook: Send + Sync {
    fn on_commit(&self, tables: &Tables) -> StoreResult<()>;
}

/// In-memory database.
///
/// Intended for tests and embedding. Tables live behind a `RwLock`; each
/// session holds the write lock for its lifetime.
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    /// Create a new empty database.
    pub fn new() -> Self {
        Self::from_tables(Tables::new())
    }

    pub fn from_tables(tables: Tables) -> Self {
        Self { tables: RwLock::new(tables) }
    }

    /// Copy of the committed tables.
    pub fn snapshot(&self) -> StoreResult<Tables> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.clone())
    }

    pub(crate) fn lock(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Database for MemoryDatabase {
    fn session(&self) -> StoreResult<Box<dyn Session + '_>> {
        Ok(Box::new(MemorySession::new(self.lock()?, None)))
    }
}

impl std::fmt::Debug for MemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDatabase").finish_non_exhaustive()
    }
}

/// A session over locked tables.
///
/// The first write takes a snapshot of the tables. If the session is dropped
/// without a successful commit, the snapshot is put back.
pub struct MemorySession<'a> {
    guard: RwLockWriteGuard<'a, Tables>,
    snapshot: Option<Tables>,
    hook: Option<&'a dyn CommitHook>,
}

impl<'a> MemorySession<'a> {
    pub(crate) fn new(guard: RwLockWriteGuard<'a, Tables>, hook: Option<&'a dyn CommitHook>) -> Self {
        Self { guard, snapshot: None, hook }
    }

    fn tables(&self) -> &Tables {
        &self.guard
    }

    fn tables_mut(&mut self) -> &mut Tables {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.guard.clone());
        }
        &mut self.guard
    }

    /// Whether this session has written anything.
    pub fn is_dirty(&self) -> bool {
        self.snapshot.is_some()
    }
}

impl Drop for MemorySession<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            tracing::debug!("rolling back uncommitted session");
            *self.guard = snapshot;
        }
    }
}

impl Session for MemorySession<'_> {
    fn insert_user(&mut self, user: NewUser) -> StoreResult<User> {
        self.tables_mut().insert_user(user)
    }

    fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.tables().user(id).cloned())
    }

    fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.tables().user_by_username(username).cloned())
    }

    fn delete_user(&mut self, id: UserId) -> StoreResult<bool> {
        self.tables_mut().delete_user(id)
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables().users().cloned().collect())
    }

    fn insert_post(&mut self, post: NewPost) -> StoreResult<Post> {
        self.tables_mut().insert_post(post)
    }

    fn get_post(&self, id: PostId) -> StoreResult<Option<Post>> {
        Ok(self.tables().post(id).cloned())
    }

    fn update_post(&mut self, id: PostId, update: PostUpdate) -> StoreResult<Option<Post>> {
        if self.tables().post(id).is_none() {
            return Ok(None);
        }
        Ok(self.tables_mut().update_post(id, update))
    }

    fn delete_post(&mut self, id: PostId) -> StoreResult<bool> {
        if self.tables().post(id).is_none() {
            return Ok(false);
        }
        Ok(self.tables_mut().delete_post(id))
    }

    fn list_posts(&self, skip: usize, limit: usize) -> StoreResult<Vec<Post>> {
        Ok(self.tables().list_posts(skip, limit))
    }

    fn insert_comment(&mut self, comment: NewComment) -> StoreResult<Comment> {
        self.tables_mut().insert_comment(comment)
    }

    fn list_comments(&self, post: PostId) -> StoreResult<Vec<Comment>> {
        Ok(self.tables().comments_for(post))
    }

    fn insert_like(&mut self, like: Like) -> StoreResult<bool> {
        self.tables_mut().insert_like(like)
    }

    fn delete_like(&mut self, like: Like) -> StoreResult<bool> {
        Ok(self.tables_mut().delete_like(like))
    }

    fn count_likes(&self, post: PostId) -> StoreResult<usize> {
        Ok(self.tables().like_count(post))
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        if self.is_dirty() {
            if let Some(hook) = self.hook {
                // On failure the session drops with its snapshot and rolls back.
                hook.on_commit(&self.guard)?;
            }
        }
        self.snapshot = None;
        Ok(())
    }
}
