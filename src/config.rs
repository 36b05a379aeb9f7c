//! Configuration module for the noticeboard.

use serde::Deserialize;
use std::path::Path;

use crate::{NoticeboardError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/noticeboard.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Attachment storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Directory holding stored attachments (one flat directory).
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Abort post creation when the attachment cannot be written.
    ///
    /// When false the post is saved without its attachment and a warning is logged.
    #[serde(default)]
    pub reject_on_attachment_error: bool,
}

fn default_upload_path() -> String {
    "data/uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            upload_path: default_upload_path(),
            max_upload_size_mb: default_max_upload_size(),
            reject_on_attachment_error: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/noticeboard.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Board listing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Posts per page.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    crate::board::DEFAULT_PAGE_SIZE
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Attachment storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Board listing configuration.
    #[serde(default)]
    pub board: BoardConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NoticeboardError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s)
            .map_err(|e| NoticeboardError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `NOTICEBOARD_UPLOAD_PATH`: attachment directory
    /// - `NOTICEBOARD_DB_PATH`: database file
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("NOTICEBOARD_UPLOAD_PATH") {
            if !path.is_empty() {
                self.files.upload_path = path;
            }
        }
        if let Ok(path) = std::env::var("NOTICEBOARD_DB_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.files.upload_path.trim().is_empty() {
            return Err(NoticeboardError::Config(
                "files.upload_path must not be empty".to_string(),
            ));
        }
        if self.board.page_size <= 0 {
            return Err(NoticeboardError::Config(
                "board.page_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
