//! # Configuration Management Module
//!
//! Loads and validates the TOML configuration for the tinyquest server.
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - HTTP listener, CORS and session limits
//! - [`GameConfig`] - World file and combat seeding
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tinyquest::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Listening on {}", config.server.bind);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:5000"
//! allow_origin = "*"
//! max_body_bytes = 16384
//! max_sessions = 64
//! session_timeout = 30
//! read_timeout_secs = 10
//!
//! [game]
//! # world_file = "data/world.json"
//! # combat_seed = 42
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every section is optional; missing values fall back to [`Config::default`].
//! The `--bind` CLI flag overrides `server.bind`.

use std::net::SocketAddr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Value of the `Access-Control-Allow-Origin` header on every response.
    pub allow_origin: String,
    /// Largest request body accepted; bigger bodies get `413`.
    pub max_body_bytes: usize,
    /// Maximum number of named sessions (the default session is not counted).
    pub max_sessions: usize,
    /// Minutes of inactivity after which a named session may be evicted.
    pub session_timeout: u32,
    /// Seconds a client has to deliver its whole request; slower ones get `408`.
    pub read_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            allow_origin: "*".to_string(),
            max_body_bytes: 16 * 1024,
            max_sessions: 64,
            session_timeout: 30,
            read_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameConfig {
    /// Optional JSON world file replacing the built-in world.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_file: Option<String>,
    /// Fixed combat seed for every new session. Random per session when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base level when no `-v` flags are given: error, warn, info, debug or trace.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append log lines to this file as well.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Parsed `level`, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        if self.server.max_body_bytes == 0 {
            return Err(anyhow!("server.max_body_bytes must be greater than zero"));
        }
        if self.server.read_timeout_secs == 0 {
            return Err(anyhow!("server.read_timeout_secs must be greater than zero"));
        }
        if self.server.allow_origin.trim().is_empty() {
            return Err(anyhow!("server.allow_origin must not be empty"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| anyhow!("Invalid server.bind '{}': {}", self.server.bind, e))
    }
}
