//! Services for the blog backend.
//!
//! Each service holds an injected [`Database`](blog_store::Database) handle
//! and runs every operation inside one session: open, read/write, commit on
//! success. Returning early with an error drops the session, which rolls back
//! anything it wrote.
//!
//! [`Blog`] bundles the services that share a database, credential store and
//! token issuer.

pub mod accounts;
pub mod blog;
pub mod engagement;
pub mod error;
pub mod identity;
pub mod posts;

pub use accounts::{AccessToken, AccountService};
pub use blog::Blog;
pub use engagement::{EngagementService, LikeStatus};
pub use error::{Resource, ServiceError, ServiceResult};
pub use identity::IdentityResolver;
pub use posts::{PageLimits, PostService};

#[cfg(test)]
pub(crate) mod testing;
