use std::sync::Arc;

use blog_crypto::{CredentialStore, SigningKey, TokenIssuer};
use blog_service::Blog;
use blog_store::{Database, FileDatabase, MemoryDatabase};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Blog HTTP server.
pub struct BlogServer {
    config: ServerConfig,
    state: AppState,
}

impl BlogServer {
    /// Build the server, opening the database named by the config.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let db = open_database(&config)?;
        Self::with_database(config, db)
    }

    /// Build the server over an existing database handle.
    pub fn with_database(config: ServerConfig, db: Arc<dyn Database>) -> ServerResult<Self> {
        config.validate()?;
        let credentials = CredentialStore::with_cost(config.password_cost)
            .map_err(|e| ServerError::Config(e.to_string()))?;
        let tokens = TokenIssuer::new(signing_key(&config)?, config.token_ttl_secs);
        let blog = Blog::new(db, credentials, tokens, config.page_limits())?;
        Ok(Self {
            config,
            state: AppState::new(Arc::new(blog)),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn blog(&self) -> &Arc<Blog> {
        &self.state.blog
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("blog server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

/// Open the configured database: a JSON file if `data_path` is set, else memory.
pub fn open_database(config: &ServerConfig) -> ServerResult<Arc<dyn Database>> {
    Ok(match &config.data_path {
        Some(path) => Arc::new(FileDatabase::open(path)?),
        None => {
            tracing::warn!("no data_path configured; data will not survive a restart");
            Arc::new(MemoryDatabase::new())
        }
    })
}

fn signing_key(config: &ServerConfig) -> ServerResult<SigningKey> {
    match &config.signing_key {
        Some(hex) => SigningKey::from_hex(hex)
            .map_err(|e| ServerError::Config(format!("signing_key: {e}"))),
        None => {
            tracing::warn!("no signing_key configured; tokens will not survive a restart");
            Ok(SigningKey::generate())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = BlogServer::new(ServerConfig::for_tests()).unwrap();
        assert_eq!(server.config().bind_addr, "127.0.0.1:8000".parse().unwrap());
        let _router = server.router();
    }

    #[test]
    fn configured_signing_key_is_used() {
        let key = SigningKey::generate();
        let config = ServerConfig {
            signing_key: Some(key.to_hex()),
            ..ServerConfig::for_tests()
        };
        let server = BlogServer::new(config).unwrap();
        assert_eq!(server.blog().tokens.public_key_hex(), key.public_hex());
    }

    #[test]
    fn bad_signing_key_is_a_config_error() {
        let config = ServerConfig {
            signing_key: Some("not-hex".into()),
            ..ServerConfig::for_tests()
        };
        assert!(matches!(BlogServer::new(config), Err(ServerError::Config(_))));
    }

    #[test]
    fn file_backed_server() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            data_path: Some(dir.path().join("blog.json")),
            ..ServerConfig::for_tests()
        };
        let server = BlogServer::new(config).unwrap();
        server
            .blog()
            .accounts
            .register("alice", "pw", blog_types::Role::Author)
            .unwrap();
        assert!(dir.path().join("blog.json").exists());
    }
}
