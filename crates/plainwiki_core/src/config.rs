//! Startup configuration.
//!
//! # Responsibility
//! - Hold the process-wide settings the server is built from.
//! - Reject unusable settings before any listener or store is opened.
//!
//! # Invariants
//! - Configuration is validated once at startup and never mutated afterwards.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default listen address (all interfaces, port 8080).
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Invalid startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidListenAddr(String),
    InvalidLogLevel(String),
    MissingDirectory { role: &'static str, path: PathBuf },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidListenAddr(value) => write!(f, "invalid listen address `{value}`"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::MissingDirectory { role, path } => {
                write!(f, "{role} directory `{}` does not exist", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiConfig {
    /// `host:port` to bind.
    pub listen_addr: String,
    /// Directory holding `<title>.txt` page files.
    pub data_dir: PathBuf,
    /// Directory holding `view.html` and `edit.html`.
    pub template_dir: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            data_dir: PathBuf::from("."),
            template_dir: PathBuf::from("."),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl WikiConfig {
    /// Checks every setting and returns the parsed listen address.
    ///
    /// # Errors
    /// - Returns [`ConfigError`] for the first invalid setting found.
    pub fn validate(&self) -> Result<SocketAddr, ConfigError> {
        let addr = self
            .listen_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidListenAddr(self.listen_addr.clone()))?;
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        require_dir("data", &self.data_dir)?;
        require_dir("template", &self.template_dir)?;
        Ok(addr)
    }
}

fn require_dir(role: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::MissingDirectory {
            role,
            path: path.to_path_buf(),
        })
    }
}
