use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use blog_crypto::HashCost;
use blog_service::PageLimits;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings, loadable from TOML. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON database file. `None` keeps everything in memory.
    pub data_path: Option<PathBuf>,
    /// Access token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Hex-encoded 32-byte Ed25519 seed. `None` generates a key per process,
    /// which invalidates issued tokens on restart.
    pub signing_key: Option<String>,
    pub default_page_limit: usize,
    pub max_page_limit: usize,
    pub password_cost: HashCost,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            data_path: None,
            token_ttl_secs: 3600,
            signing_key: None,
            default_page_limit: limits.default_limit,
            max_page_limit: limits.max_limit,
            password_cost: HashCost::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.token_ttl_secs <= 0 {
            return Err(ServerError::Config("token_ttl_secs must be positive".into()));
        }
        if self.default_page_limit == 0 || self.max_page_limit == 0 {
            return Err(ServerError::Config("page limits must be positive".into()));
        }
        if self.default_page_limit > self.max_page_limit {
            return Err(ServerError::Config(
                "default_page_limit exceeds max_page_limit".into(),
            ));
        }
        Ok(())
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_page_limit,
            max_limit: self.max_page_limit,
        }
    }

    /// In-memory config with cheap password hashing.
    pub fn for_tests() -> Self {
        Self {
            password_cost: HashCost { memory_kib: 64, iterations: 1 },
            ..Self::default()
        }
    }
}
