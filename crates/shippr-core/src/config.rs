//! Configuration management for Shippr
//!
//! Values are layered: built-in defaults, then `config.toml` in the storage home (or an
//! explicit file), then `SHIPPR_` environment variables such as
//! `SHIPPR_API__URL=http://api.example.com`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Directory name created under the user's home directory
pub const HOME_DIR_NAME: &str = ".shippr";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Retry policy for API calls
    pub retry: RetryConfig,

    /// Local storage configuration
    pub storage: StorageConfig,

    /// TUI configuration
    pub tui: TuiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// When `path` is `None`, `config.toml` in the storage home is read if it
    /// exists. `home` overrides that directory and is kept in `storage.home`.
    pub fn load(path: Option<&Path>, home: Option<&Path>) -> Result<Self> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            debug!(path = %dotenv.display(), "Loaded .env file");
        }

        let storage = StorageConfig {
            home: home.map(Path::to_path_buf),
        };
        let file = match path {
            Some(path) => config::File::from(path.to_path_buf()).required(true),
            None => config::File::from(storage.home_dir()?.join("config.toml")).required(false),
        };

        let mut config: Self = config::Config::builder()
            .add_source(file)
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        if storage.home.is_some() {
            config.storage = storage;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.url)
            .map_err(|e| Error::config(format!("invalid api.url '{}': {e}", self.api.url)))?;
        if self.retry.max_attempts == 0 {
            return Err(Error::config("retry.max_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// `SHIPPR_` variables, `__` between section and key, lists comma separated
fn environment() -> config::Environment {
    config::Environment::with_prefix("SHIPPR")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("retry.delays_ms")
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the tRPC server
    pub url: String,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first one
    pub max_attempts: u32,
    /// Delays between attempts in milliseconds; the last one repeats
    pub delays_ms: Vec<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delays_ms: vec![100, 1000],
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the `~/.shippr` directory
    pub home: Option<PathBuf>,
}

impl StorageConfig {
    /// Directory holding credentials, logs and the config file
    pub fn home_dir(&self) -> Result<PathBuf> {
        if let Some(home) = &self.home {
            return Ok(home.clone());
        }
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(HOME_DIR_NAME))
            .ok_or_else(|| Error::config("could not determine the home directory"))
    }

    /// Path of the persisted credential file
    pub fn credentials_path(&self) -> Result<PathBuf> {
        Ok(self.home_dir()?.join("credentials.json"))
    }

    /// Directory receiving `cli.log`
    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.home_dir()?.join("logs"))
    }
}

/// TUI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}
