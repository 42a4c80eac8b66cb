//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dictionary: DictionaryConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Page dictionary sources
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryConfig {
    /// JSON index of `{ path, file, children }` templates
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Where the generated dictionary is cached between requests
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_index_path() -> PathBuf {
    PathBuf::from("pages.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("dictionary.json")
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            output_path: default_output_path(),
        }
    }
}

/// Built single-page application
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("errorly-ui/dist")
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("errorly").join("config.toml")),
            Some(PathBuf::from("/etc/errorly/config.toml")),
            Some(PathBuf::from("./errorly.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("ERRORLY_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("ERRORLY_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(index) = std::env::var("ERRORLY_DICTIONARY_INDEX") {
            self.dictionary.index_path = PathBuf::from(index);
        }
        if let Ok(output) = std::env::var("ERRORLY_DICTIONARY_OUTPUT") {
            self.dictionary.output_path = PathBuf::from(output);
        }

        if let Ok(dist) = std::env::var("ERRORLY_DIST_DIR") {
            self.web.dist_dir = PathBuf::from(dist);
        }

        if let Ok(level) = std::env::var("ERRORLY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ERRORLY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Errorly Configuration
#
# Environment variables override these settings:
# - ERRORLY_HOST
# - ERRORLY_PORT
# - ERRORLY_DICTIONARY_INDEX
# - ERRORLY_DICTIONARY_OUTPUT
# - ERRORLY_DIST_DIR
# - ERRORLY_LOG_LEVEL
# - ERRORLY_LOG_FORMAT

[api]
# Server host
host = "0.0.0.0"

# Server port
port = 8080

# Allowed CORS origins (empty allows any origin)
cors_origins = []

[dictionary]
# Template index: [ { "path": "/", "file": "web/static/dashboard/index.html" } ]
index_path = "pages.json"

# Generated dictionary cache
output_path = "dictionary.json"

[web]
# Built single-page application served for every non-API path
dist_dir = "errorly-ui/dist"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
