//! Service configuration structures.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::User;
use crate::rwlock::WaitPolicy;

/// Path to a JSON configuration file.
pub const ENV_CONFIG_PATH: &str = "USER_SERVICE_CONFIG";
/// HTTP bind host override.
pub const ENV_HOST: &str = "USER_SERVICE_HOST";
/// HTTP bind port override.
pub const ENV_PORT: &str = "USER_SERVICE_PORT";
/// SQLite database path override; selects the SQLite backend.
pub const ENV_DB: &str = "USER_SERVICE_DB";
/// Lock acquisition bound override in milliseconds.
pub const ENV_LOCK_TIMEOUT_MS: &str = "USER_SERVICE_LOCK_TIMEOUT_MS";

/// Lock acquisition policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockConfig {
    /// Upper bound on waiting for the lock; absent waits indefinitely.
    #[serde(default)]
    pub acquire_timeout_ms: Option<u64>,
    /// Slice between interrupt checks while waiting.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

const fn default_poll_interval_ms() -> u64 {
    10
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            acquire_timeout_ms: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl LockConfig {
    /// Validate lock policy values.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".into());
        }
        if self.acquire_timeout_ms == Some(0) {
            return Err("acquire_timeout_ms must be greater than 0 when set".into());
        }
        Ok(())
    }

    /// Convert into the accessor's wait policy.
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: self.acquire_timeout_ms.map(Duration::from_millis),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Store backend selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory store, optionally seeded with records.
    InMemory {
        /// Records provisioned at startup.
        #[serde(default)]
        seed: Vec<User>,
    },
    /// SQLite database file (`":memory:"` for a private in-memory database).
    Sqlite {
        /// Database path.
        path: String,
        /// Reader connections serving concurrent fetches.
        #[serde(default = "default_read_connections")]
        read_connections: usize,
    },
}

const fn default_read_connections() -> usize {
    crate::infra::store::sqlite::DEFAULT_READ_CONNECTIONS
}

impl Default for StoreBackendConfig {
    fn default() -> Self {
        Self::InMemory { seed: Vec::new() }
    }
}

impl StoreBackendConfig {
    /// SQLite backend at `path` with the default reader pool.
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self::Sqlite {
            path: path.into(),
            read_connections: default_read_connections(),
        }
    }

    /// Validate backend values.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::InMemory { seed } => {
                let mut seen = HashSet::with_capacity(seed.len());
                for user in seed {
                    if !seen.insert(user.id) {
                        return Err(format!("duplicate seed user id {}", user.id));
                    }
                }
                Ok(())
            }
            Self::Sqlite { path, .. } if path.trim().is_empty() => {
                Err("sqlite path must not be empty".into())
            }
            Self::Sqlite {
                read_connections: 0,
                ..
            } => Err("read_connections must be greater than 0".into()),
            Self::Sqlite { .. } => Ok(()),
        }
    }
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Runtime worker threads; defaults to the number of CPUs.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

const fn default_port() -> u16 {
    8080
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: None,
        }
    }
}

impl HttpConfig {
    /// Validate HTTP values.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".into());
        }
        if self.worker_threads == Some(0) {
            return Err("worker_threads must be greater than 0 when set".into());
        }
        Ok(())
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Worker thread count, falling back to the CPU count.
    pub fn effective_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get)
    }
}

/// Root service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Lock policy.
    #[serde(default)]
    pub lock: LockConfig,
    /// Store backend.
    #[serde(default)]
    pub store: StoreBackendConfig,
    /// HTTP surface.
    #[serde(default)]
    pub http: HttpConfig,
}

impl ServiceConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), String> {
        self.lock.validate().map_err(|e| format!("lock invalid: {e}"))?;
        self.store.validate().map_err(|e| format!("store invalid: {e}"))?;
        self.http.validate().map_err(|e| format!("http invalid: {e}"))?;
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `.env`, then build configuration from process environment.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Reads the JSON file named by [`ENV_CONFIG_PATH`] when present, otherwise
    /// starts from defaults, then applies the individual overrides.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut cfg = match lookup(ENV_CONFIG_PATH) {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| format!("failed to read {path}: {e}"))?;
                serde_json::from_str(&raw).map_err(|e| format!("parse error in {path}: {e}"))?
            }
            None => Self::default(),
        };

        if let Some(host) = lookup(ENV_HOST) {
            cfg.http.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            cfg.http.port = port
                .parse()
                .map_err(|e| format!("{ENV_PORT}={port} is not a port: {e}"))?;
        }
        if let Some(path) = lookup(ENV_DB) {
            cfg.store = StoreBackendConfig::sqlite(path);
        }
        if let Some(ms) = lookup(ENV_LOCK_TIMEOUT_MS) {
            cfg.lock.acquire_timeout_ms = Some(
                ms.parse()
                    .map_err(|e| format!("{ENV_LOCK_TIMEOUT_MS}={ms} is not a number: {e}"))?,
            );
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
