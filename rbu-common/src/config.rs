//! Configuration loading
//!
//! The evaluator runs without any configuration file. When one exists it
//! only sets bootstrap concerns: where reports go and how much to log.
//!
//! Resolution priority:
//! 1. Command-line `--config` path
//! 2. `RBU_CONFIG` environment variable
//! 3. `<user config dir>/rbu/config.toml`
//! 4. Compiled defaults
//!
//! A file named at tiers 1 or 2 must exist and parse. A missing tier 3 file
//! is logged as a warning and the defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "RBU_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Report output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// EvALL TSV report path
    #[serde(default = "default_report_path")]
    pub path: PathBuf,

    /// JSON export path (no export if not specified)
    #[serde(default)]
    pub json: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: default_report_path(),
            json: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_report_path() -> PathBuf {
    PathBuf::from("Results.tsv")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserFile(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::CommandLine(path) => write!(f, "{} (command line)", path.display()),
            ConfigSource::Environment(path) => {
                write!(f, "{} ({})", path.display(), CONFIG_ENV_VAR)
            }
            ConfigSource::UserFile(path) => write!(f, "{} (user config)", path.display()),
            ConfigSource::Defaults => write!(f, "compiled defaults"),
        }
    }
}

/// Effective configuration and its origin
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Load and parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
}

/// Resolves the configuration file following the priority order
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    user_config: Option<PathBuf>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    /// Resolver using the platform user config directory
    pub fn new() -> Self {
        Self {
            user_config: dirs::config_dir().map(|d| d.join("rbu").join("config.toml")),
        }
    }

    /// Resolver with an explicit tier 3 path (None disables tier 3)
    pub fn with_user_config(user_config: Option<PathBuf>) -> Self {
        Self { user_config }
    }

    pub fn resolve(&self, cli_arg: Option<&Path>) -> Result<ResolvedConfig> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Ok(ResolvedConfig {
                config: load_toml_config(path)?,
                source: ConfigSource::CommandLine(path.to_path_buf()),
            });
        }

        // Priority 2: Environment variable
        if let Ok(value) = std::env::var(CONFIG_ENV_VAR) {
            if !value.is_empty() {
                let path = PathBuf::from(value);
                return Ok(ResolvedConfig {
                    config: load_toml_config(&path)?,
                    source: ConfigSource::Environment(path),
                });
            }
        }

        // Priority 3: User config file
        if let Some(path) = &self.user_config {
            if path.exists() {
                return Ok(ResolvedConfig {
                    config: load_toml_config(path)?,
                    source: ConfigSource::UserFile(path.clone()),
                });
            }
            warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            );
        }

        // Priority 4: Compiled defaults
        Ok(ResolvedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Defaults,
        })
    }
}
