//! Configuration loading and management.
//!
//! Lookup order, lowest to highest priority: built-in defaults, the first
//! config file found, environment variables, then command-line flags (applied
//! by the binary).

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Project-level config file, relative to the working directory.
pub const PROJECT_CONFIG_FILE: &str = "taskboard.yaml";

/// Board configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

/// Server-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on. 0 picks a free one.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("taskboard.db")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Settings for the `board` and `move` commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running board API, including `/api`.
    #[serde(default)]
    pub api_url: Option<String>,
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from the explicit path, or the first default location that exists,
    /// then apply environment overrides.
    ///
    /// Returns the config and the file it came from, if any.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let source = match explicit {
            Some(path) if !path.exists() => bail!("config file not found: {}", path.display()),
            Some(path) => Some(path.to_path_buf()),
            None => default_locations().into_iter().find(|p| p.exists()),
        };

        let mut config = match &source {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load(path)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok((config, source))
    }

    /// Apply `TASKBOARD_*` overrides (and plain `PORT`) from a variable lookup.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("TASKBOARD_DB_PATH") {
            self.server.db_path = PathBuf::from(db_path);
        }

        if let Some(host) = lookup("TASKBOARD_HOST") {
            self.server.host = host;
        }

        // TASKBOARD_PORT wins over the conventional PORT.
        for key in ["PORT", "TASKBOARD_PORT"] {
            if let Some(port) = lookup(key) {
                match port.trim().parse() {
                    Ok(port) => self.server.port = port,
                    Err(_) => warn!("Ignoring invalid {}: {:?}", key, port),
                }
            }
        }

        if let Some(url) = lookup("TASKBOARD_API_URL") {
            self.client.api_url = Some(url);
        }
    }

    /// URL the client commands talk to.
    pub fn api_url(&self) -> String {
        self.client.api_url.clone().unwrap_or_else(|| {
            let host = match self.server.host.as_str() {
                "0.0.0.0" | "::" => "127.0.0.1",
                host => host,
            };
            format!("http://{}:{}/api", host, self.server.port)
        })
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.server.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Default config files, most specific first.
fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(PROJECT_CONFIG_FILE)];
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".taskboard").join("config.yaml"));
    }
    locations
}
