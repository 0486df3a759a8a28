//! HTTP server for the blog backend.
//!
//! Exposes registration, token login, post CRUD, comments and likes as a
//! JSON API. Bearer tokens are resolved to an identity before any mutating
//! handler runs; service errors map onto HTTP statuses in [`error`].

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use auth::{AuthUser, Credentials};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::BlogServer;
