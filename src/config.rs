//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file. Every field has
//! a default, so running without a config file listens on `0.0.0.0:5000` and
//! launches `deploy.sh` from the directory holding the server binary.
//! `AppConfig` is the root configuration struct containing all settings.

use serde::Deserialize;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

// =============================================================================
// HTTP Defaults
// =============================================================================

/// Default bind address (all interfaces)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Seconds to drain open connections after SIGTERM/SIGINT
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// Cache-Control value applied to every response
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Deploy Defaults
// =============================================================================

/// Default deployment script, relative to the server binary's directory
pub const DEFAULT_SCRIPT: &str = "deploy.sh";

// =============================================================================
// Logging Defaults
// =============================================================================

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "deploy_hook=info";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Deployment script settings
    #[serde(default)]
    pub deploy: DeployConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }

    /// Listen address. `host` is a bare IPv4 or IPv6 address, without brackets.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// Script to launch on POST /webhook. Relative paths resolve against the
    /// directory containing the server executable.
    #[serde(default = "DeployConfig::default_script")]
    pub script: PathBuf,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            script: Self::default_script(),
        }
    }
}

impl DeployConfig {
    fn default_script() -> PathBuf {
        PathBuf::from(DEFAULT_SCRIPT)
    }

    /// Resolve the script against `base_dir` unless it is already absolute.
    pub fn resolve_against(&self, base_dir: &Path) -> PathBuf {
        if self.script.is_absolute() {
            self.script.clone()
        } else {
            base_dir.join(&self.script)
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: Self::default_format(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> LogFormat {
        LogFormat::Text
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;

        if let Err(e) = config.http.socket_addr() {
            return Err(ConfigError::Validation(format!(
                "http.host {:?} is not an IP address: {}",
                config.http.host, e
            )));
        }

        if config.deploy.script.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "deploy.script must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Effective script path: `deploy.script` resolved against the directory
    /// of the running executable.
    pub fn script_path(&self) -> Result<PathBuf, ConfigError> {
        let exe = std::env::current_exe()?;
        let base_dir = exe.parent().ok_or_else(|| {
            ConfigError::Validation(format!(
                "Cannot determine directory of executable {}",
                exe.display()
            ))
        })?;
        Ok(self.deploy.resolve_against(base_dir))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
