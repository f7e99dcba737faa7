//! Configuration management for mealplanner
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.mealplanner/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{PlannerError, Result};
use crate::store::mock::DEFAULT_DELAY;
use crate::store::remote::RemoteConfig;

/// Environment overrides for backend settings
pub const ENV_BASE_URL: &str = "MEALPLANNER_BASE_URL";
pub const ENV_PROJECT_ID: &str = "MEALPLANNER_PROJECT_ID";
pub const ENV_PUBLIC_KEY: &str = "MEALPLANNER_PUBLIC_KEY";

/// Complete configuration for mealplanner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Which record store to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Remote,
    Mock,
}

/// Hosted record store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub mode: BackendMode,
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
    pub timeout_secs: u64,
}

/// Offline/demo store behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub delay_ms: u64,
    pub seed_demo: bool,
    pub data_file: String,
}

/// HTTP API binding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Terminal output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::Remote,
            base_url: "http://127.0.0.1:8080/api/v1".to_string(),
            project_id: String::new(),
            public_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            seed_demo: true,
            data_file: "~/.mealplanner/offline.json".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color_output: true }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.mealplanner".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply environment
    /// overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(config_path) = path {
            Self::load_from_file(&config_path)?
        } else {
            Self::load_default()?
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PlannerError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| PlannerError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(config_path) if config_path.exists() => Self::load_from_file(&config_path),
            _ => Ok(Config::default()),
        }
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".mealplanner").join("config.toml"))
    }

    /// Override backend settings from the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.backend.base_url = url;
        }
        if let Some(id) = lookup(ENV_PROJECT_ID).filter(|v| !v.is_empty()) {
            self.backend.project_id = id;
        }
        if let Some(key) = lookup(ENV_PUBLIC_KEY).filter(|v| !v.is_empty()) {
            self.backend.public_key = key;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.backend.mode == BackendMode::Remote {
            if self.backend.base_url.trim().is_empty() {
                return Err(PlannerError::Config("backend.base_url must be set".to_string()));
            }
            if self.backend.project_id.trim().is_empty() {
                return Err(PlannerError::Config(format!(
                    "backend.project_id must be set (or export {})",
                    ENV_PROJECT_ID
                )));
            }
            if self.backend.public_key.trim().is_empty() {
                return Err(PlannerError::Config(format!(
                    "backend.public_key must be set (or export {})",
                    ENV_PUBLIC_KEY
                )));
            }
        }

        if self.backend.timeout_secs == 0 {
            return Err(PlannerError::Config(
                "backend.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(PlannerError::Config("server.port must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| PlannerError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PlannerError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlannerError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Settings for the hosted store client
    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.backend.base_url.clone(),
            project_id: self.backend.project_id.clone(),
            public_key: self.backend.public_key.clone(),
            timeout: Duration::from_secs(self.backend.timeout_secs),
        }
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock.delay_ms)
    }

    /// Address the HTTP API binds to
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get state directory path
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_dir)
    }

    /// Offline snapshot file
    pub fn mock_data_file(&self) -> PathBuf {
        Self::expand_path(&self.mock.data_file)
    }
}
