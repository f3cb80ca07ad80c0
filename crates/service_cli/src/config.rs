//! CLI configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use pricer_models::analytical::barrier::{BarrierEngineConfig, DEFAULT_ZERO_TOLERANCE};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "barrier.toml";

const ENV_LOG_LEVEL: &str = "BARRIER_LOG_LEVEL";
const ENV_OUTPUT_FORMAT: &str = "BARRIER_OUTPUT_FORMAT";
const ENV_ZERO_TOLERANCE: &str = "BARRIER_ZERO_TOLERANCE";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidOutputFormat(String),

    #[error("Invalid zero tolerance: {0}")]
    InvalidZeroTolerance(String),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidOutputFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Report format
    #[serde(deserialize_with = "deserialize_output_format")]
    pub output_format: OutputFormat,
    /// Degenerate-branch tolerance handed to the engine
    pub zero_tolerance: f64,
    /// File the values were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_output_format<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OutputFormat::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            output_format: OutputFormat::Table,
            zero_tolerance: DEFAULT_ZERO_TOLERANCE,
            source: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut config: CliConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.source = Some(path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    /// Apply `BARRIER_*` overrides read through `lookup`.
    ///
    /// `lookup` is `std::env::var` in the binary; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(format) = lookup(ENV_OUTPUT_FORMAT) {
            self.output_format = OutputFormat::from_str(&format)?;
        }
        if let Some(tolerance) = lookup(ENV_ZERO_TOLERANCE) {
            self.zero_tolerance = tolerance
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidZeroTolerance(tolerance.clone()))?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(format) = &cli.output_format {
            self.output_format = OutputFormat::from_str(format)?;
        }
        if let Some(tolerance) = cli.zero_tolerance {
            self.zero_tolerance = tolerance;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine_config().map(|_| ())
    }

    /// Engine configuration derived from these settings.
    pub fn engine_config(&self) -> Result<BarrierEngineConfig, ConfigError> {
        BarrierEngineConfig::builder()
            .zero_tolerance(self.zero_tolerance)
            .build()
            .map_err(|e| ConfigError::InvalidZeroTolerance(e.to_string()))
    }
}

/// CLI arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Output format override
    pub output_format: Option<String>,
    /// Zero tolerance override
    pub zero_tolerance: Option<f64>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (`--config`, or `barrier.toml` when present)
/// 4. Default values
pub fn build_config<F>(cli: &CliArgs, lookup: F) -> Result<CliConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            CliConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => CliConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;

    // Final validation
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.output_format, OutputFormat::Table);
        assert_eq!(config.zero_tolerance, DEFAULT_ZERO_TOLERANCE);
        assert!(config.source.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str("table").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("csv").is_err());
        assert_eq!(format!("{}", OutputFormat::Json), "json");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env(env(&[
                ("BARRIER_LOG_LEVEL", "debug"),
                ("BARRIER_OUTPUT_FORMAT", "json"),
                ("BARRIER_ZERO_TOLERANCE", "1e-12"),
            ]))
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.zero_tolerance, 1e-12);
    }

    #[test]
    fn test_bad_env_value_is_error() {
        let mut config = CliConfig::default();
        let err = config
            .apply_env(env(&[("BARRIER_ZERO_TOLERANCE", "tiny")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidZeroTolerance(_)));
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = CliConfig::default();
        let cli = CliArgs {
            log_level: Some("info".to_string()),
            output_format: Some("json".to_string()),
            zero_tolerance: Some(1e-10),
            config_file: None,
        };

        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.zero_tolerance, 1e-10);
    }

    #[test]
    fn test_cli_beats_env() {
        let cli = CliArgs {
            log_level: Some("error".to_string()),
            ..Default::default()
        };
        let config = build_config(
            &cli,
            env(&[("BARRIER_LOG_LEVEL", "trace"), ("BARRIER_OUTPUT_FORMAT", "json")]),
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            log_level = "debug"
            output_format = "json"
            zero_tolerance = 1e-14
        "#;

        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.zero_tolerance, 1e-14);
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config: CliConfig = toml::from_str("output_format = \"json\"").unwrap();
        // Should use defaults for unspecified fields
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.zero_tolerance, DEFAULT_ZERO_TOLERANCE);
    }

    #[test]
    fn test_invalid_toml_value_rejected() {
        assert!(toml::from_str::<CliConfig>("log_level = \"loud\"").is_err());
    }

    #[test]
    fn test_file_then_env_then_cli() {
        let path = std::env::temp_dir().join(format!("barrier-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "log_level = \"info\"\nzero_tolerance = 1e-13\n").unwrap();

        let cli = CliArgs {
            config_file: Some(path.clone()),
            output_format: Some("json".to_string()),
            ..Default::default()
        };
        let config = build_config(&cli, env(&[("BARRIER_ZERO_TOLERANCE", "1e-15")])).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.zero_tolerance, 1e-15);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/barrier.toml")),
            ..Default::default()
        };
        let err = build_config(&cli, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_validate_zero_tolerance() {
        let mut config = CliConfig::default();
        config.zero_tolerance = -1.0;
        assert!(config.validate().is_err());

        config.zero_tolerance = f64::NAN;
        assert!(config.validate().is_err());

        config.zero_tolerance = 0.0;
        assert!(config.validate().is_ok());
    }
}
