//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, storage and logging sections. Every section defaults sensibly so a
//! completely empty `{}` file is valid. Environment variables are applied on
//! top of the file via [`Config::apply_env`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Selects the base directory that holds `public/uploads`.
pub const ENV_BASE_DIR: &str = "THUMBFORGE_BASE_DIR";
/// `production` switches logging to JSON; anything else is development.
pub const ENV_MODE: &str = "THUMBFORGE_ENV";
/// Overrides `server.host`.
pub const ENV_HOST: &str = "THUMBFORGE_HOST";
/// Overrides `server.port`.
pub const ENV_PORT: &str = "THUMBFORGE_PORT";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_BASE_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage.base_dir = PathBuf::from(dir);
        }

        if let Some(mode) = lookup(ENV_MODE) {
            self.logging.format = if mode.eq_ignore_ascii_case("production") {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            };
        }

        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(e) => tracing::warn!("Ignoring {ENV_PORT}={port}: {e}"),
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.max_upload_bytes == 0 {
            warnings.push("server.max_upload_bytes is 0; every upload will be rejected".into());
        }

        if self.storage.base_dir.as_os_str().is_empty() {
            warnings.push("storage.base_dir is empty; the working directory will be used".into());
        } else if !self.storage.base_dir.exists() {
            warnings.push(format!(
                "storage.base_dir {} does not exist yet",
                self.storage.base_dir.display()
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Ceiling on request bodies (multipart uploads included).
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8001,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Filesystem layout for uploads and generated thumbnails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub base_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./data"),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive; `RUST_LOG` still wins when set.
    pub filter: Option<String>,
}
