//! Persistence for the blog backend.
//!
//! The store is a small relational engine with four tables: `users`,
//! `posts`, `comments` and the `post_likes` junction. Callers never touch the
//! tables directly; they open a [`Session`] on a [`Database`], perform their
//! reads and writes, and [`Session::commit`] on success.
//!
//! # Storage Backends
//!
//! - [`MemoryDatabase`] -- process-local tables for tests and embedding
//! - [`FileDatabase`] -- the same tables, written atomically to a JSON file on
//!   every commit
//!
//! # Design Rules
//!
//! 1. A session holds the database write lock until it is dropped.
//! 2. Dropping a session without committing rolls back every write it made.
//! 3. Ids are assigned from per-table counters and never reused.
//! 4. Usernames are unique; posts and comments must reference existing rows.
//! 5. Deleting a post removes its comments and likes. Deleting a user that
//!    still owns posts or comments is refused.
//! 6. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod tables;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileDatabase;
pub use memory::{MemoryDatabase, MemorySession};
pub use tables::Tables;
pub use traits::{Database, Session};
