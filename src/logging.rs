//! Logging System
//!
//! Structured logging built on `tracing`. Level, format and destination come from
//! [`LoggingConfig`], overridden by `CLUSTERWRIGHT_LOG*` environment variables, which
//! the binary in turn overrides from its command-line flags.

use crate::error::ApiError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const ENV_LOG: &str = "CLUSTERWRIGHT_LOG";
pub const ENV_LOG_FORMAT: &str = "CLUSTERWRIGHT_LOG_FORMAT";
pub const ENV_LOG_OUTPUT: &str = "CLUSTERWRIGHT_LOG_OUTPUT";
pub const ENV_LOG_MODULES: &str = "CLUSTERWRIGHT_LOG_MODULES";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install a subscriber at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is "file"; defaults to the user data directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// `$XDG_DATA_HOME/clusterwright/clusterwright.log` or the platform equivalent.
pub fn default_log_file() -> PathBuf {
    ProjectDirs::from("", "", "clusterwright")
        .map(|dirs| dirs.data_local_dir().join("clusterwright.log"))
        .unwrap_or_else(|| PathBuf::from(".clusterwright/clusterwright.log"))
}

/// Install the global `tracing` subscriber.
///
/// Environment variables (`CLUSTERWRIGHT_LOG`, `CLUSTERWRIGHT_LOG_FORMAT`,
/// `CLUSTERWRIGHT_LOG_OUTPUT`, `CLUSTERWRIGHT_LOG_MODULES`) win over `config`;
/// command-line flags are folded into `config` by the binary beforehand.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);
    if !config.enabled {
        return Ok(());
    }

    let filter = env_filter(config)?;
    let from_env = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .and_then(|value| LogFormat::parse(&value).ok());
    let format = match from_env {
        Some(format) => format,
        None => LogFormat::parse(&config.format)?,
    };
    let output = match std::env::var(ENV_LOG_OUTPUT) {
        Ok(value) => parse_output(&value)?,
        Err(_) => parse_output(&config.output)?,
    };

    let writer = match output {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
        Output::File => {
            let path = config.file.clone().unwrap_or_else(default_log_file);
            BoxMakeWriter::new(open_log_file(&path)?)
        }
    };

    let registry = Registry::default().with(filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color && output != Output::File)
                    .with_writer(writer),
            )
            .try_init(),
    };

    installed.map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}

fn open_log_file(path: &Path) -> Result<std::fs::File, ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ApiError::ConfigError(format!("Cannot create {}: {}", parent.display(), e)))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ApiError::ConfigError(format!("Cannot open log file {}: {}", path.display(), e)))
}

/// `CLUSTERWRIGHT_LOG` replaces the whole filter; otherwise the configured level
/// plus per-module directives from config and `CLUSTERWRIGHT_LOG_MODULES`.
fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_LOG) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let from_env = std::env::var(ENV_LOG_MODULES).unwrap_or_default();
    let env_pairs = from_env.split(',').filter_map(|pair| {
        let (module, level) = pair.split_once('=')?;
        Some((module.trim().to_string(), level.trim().to_string()))
    });
    let config_pairs = config
        .modules
        .iter()
        .map(|(module, level)| (module.clone(), level.clone()));

    config_pairs
        .chain(env_pairs)
        .try_fold(EnvFilter::new(&config.level), |filter, (module, level)| -> Result<EnvFilter, ApiError> {
            let directive: Directive = format!("{}={}", module, level)
                .parse()
                .map_err(|e| ApiError::ConfigError(format!("Invalid log directive {}={}: {}", module, level, e)))?;
            Ok(filter.add_directive(directive))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ApiError> {
        match value {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log format '{}'; expected text or json",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
    File,
}

fn parse_output(value: &str) -> Result<Output, ApiError> {
    match value {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        "file" => Ok(Output::File),
        other => Err(ApiError::ConfigError(format!(
            "Invalid log output '{}'; expected stdout, stderr or file",
            other
        ))),
    }
}
