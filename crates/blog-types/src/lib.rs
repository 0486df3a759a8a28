//! Entity model for the blog backend.
//!
//! Every other blog crate depends on `blog-types`. The types here carry no
//! behaviour beyond parsing and display; storage, authorization and services
//! live in their own crates.
//!
//! # Key Types
//!
//! - [`User`]: registered account with a [`Role`] and an opaque password hash
//! - [`Post`]: titled content owned by exactly one user
//! - [`Comment`]: content attached to a post by any authenticated user
//! - [`Like`]: a `(user, post)` membership pair
//! - [`Actor`]: the resolved identity performing an operation

pub mod actor;
pub mod comment;
pub mod error;
pub mod ids;
pub mod post;
pub mod role;
pub mod user;

pub use actor::Actor;
pub use comment::{Comment, Like, NewComment};
pub use error::TypeError;
pub use ids::{CommentId, PostId, UserId};
pub use post::{NewPost, Post, PostUpdate};
pub use role::Role;
pub use user::{NewUser, User};
