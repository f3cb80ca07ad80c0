//! CLI error types

use pricer_core::types::PricingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `barrier` binary
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Pricing failed: {0}")]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to serialise report: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("Self-check failed: {0}")]
    SelfCheck(String),
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_conversion() {
        let err: CliError = PricingError::invalid_argument("barrier already breached").into();
        assert!(matches!(err, CliError::Pricing(_)));
        assert_eq!(
            err.to_string(),
            "Pricing failed: Invalid argument: barrier already breached"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: CliError = ConfigError::InvalidOutputFormat("csv".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Invalid output format: csv. Must be one of: table, json"
        );
    }
}
