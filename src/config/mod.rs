//! Settings for the `puppet-summary` binary
//!
//! Settings are read from a YAML file and then adjusted by
//! `PUPPET_SUMMARY_*` environment variables. Every key is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::services::ExportFormat;

const CONFIG_ENV: &str = "PUPPET_SUMMARY_CONFIG";

/// Places searched when neither `--config` nor `PUPPET_SUMMARY_CONFIG` is set
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("puppet-summary.yaml"),
        PathBuf::from("config/puppet-summary.yaml"),
        PathBuf::from("/etc/puppet-summary/config.yaml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("puppet-summary").join("config.yaml"));
    }
    paths
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where diagnostics go and how they look
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `puppet_summary=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub target: LogTarget,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    #[serde(default = "default_daily_rotation")]
    pub daily_rotation: bool,
}

/// `Console` writes to stderr
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Console,
    File,
    Both,
}

impl LogTarget {
    /// Lenient parse for environment values; unknown values mean `Console`
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "both" => Self::Both,
            _ => Self::Console,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl LogFormat {
    /// Lenient parse for environment values; unknown values mean `Pretty`
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    /// Used by `parse` when `--format` is absent
    #[serde(default)]
    pub format: ExportFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("/var/log/puppet-summary")
}

fn default_log_prefix() -> String {
    "puppet-summary".to_string()
}

fn default_daily_rotation() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_daily_rotation(),
        }
    }
}

impl AppConfig {
    /// Resolve, read and check the settings.
    ///
    /// An explicit `path` must exist. Without one, `PUPPET_SUMMARY_CONFIG`
    /// and then the search paths are tried, and a missing file just means
    /// defaults. Environment overrides always apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(explicit) => Self::from_file(explicit)?,
            None => match Self::discover() {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn discover() -> Option<PathBuf> {
        let candidate = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match candidate {
            Some(path) => Some(path).filter(|p| p.exists()),
            None => search_paths().into_iter().find(|p| p.exists()),
        }
    }

    fn apply_env_overrides(&mut self) {
        let var = |name: &str| std::env::var(name).ok();
        let logging = &mut self.logging;

        if let Some(level) = var("RUST_LOG") {
            logging.level = level;
        }
        if let Some(format) = var("PUPPET_SUMMARY_LOG_FORMAT") {
            logging.format = LogFormat::from_env_value(&format);
        }
        if let Some(target) = var("PUPPET_SUMMARY_LOG_TARGET") {
            logging.target = LogTarget::from_env_value(&target);
        }
        if let Some(dir) = var("PUPPET_SUMMARY_LOG_DIR") {
            logging.log_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = var("PUPPET_SUMMARY_LOG_PREFIX") {
            logging.log_prefix = prefix;
        }
        if let Some(rotation) = var("PUPPET_SUMMARY_LOG_ROTATION") {
            logging.daily_rotation = rotation.parse().unwrap_or(true);
        }

        if let Some(format) = var("PUPPET_SUMMARY_OUTPUT_FORMAT") {
            match format.parse() {
                Ok(format) => self.output.format = format,
                Err(e) => tracing::warn!("Ignoring PUPPET_SUMMARY_OUTPUT_FORMAT: {}", e),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let logging = &self.logging;

        if logging.level.trim().is_empty() {
            anyhow::bail!("Log level cannot be empty");
        }
        if logging.target == LogTarget::Console {
            return Ok(());
        }
        if logging.log_prefix.is_empty() {
            anyhow::bail!("Log prefix cannot be empty when logging to a file");
        }
        if logging.log_dir.as_os_str().is_empty() {
            anyhow::bail!("Log directory cannot be empty when logging to a file");
        }
        Ok(())
    }

    /// Write the defaults to `path`, creating parent directories
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_norway::to_string(&Self::default())?)?;
        Ok(())
    }
}
