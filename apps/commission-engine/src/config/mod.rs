//! Configuration module for the commission engine.
//!
//! Loads a YAML file, interpolates environment variables and validates the
//! result. Every section has defaults, so an empty file is a valid config.
//!
//! # Usage
//!
//! ```rust,ignore
//! use commission_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("deploy/config.yaml"))?;
//! ```

mod charging;
mod messaging;
mod observability;
mod rates;
mod scheduler;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use charging::ChargingConfig;
pub use messaging::MessagingConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use rates::{
    DefaultOnBehalfRate, DefaultOrderExecutionRate, DefaultRatesConfig, DefaultSwapRate,
};
pub use scheduler::SchedulerConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "COMMISSION_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Charging tracker configuration.
    #[serde(default)]
    pub charging: ChargingConfig,
    /// Message bus configuration.
    #[serde(default)]
    pub messaging: MessagingConfig,
    /// Scheduler configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Global fallback rates.
    #[serde(default)]
    pub default_rates: DefaultRatesConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `$COMMISSION_CONFIG`,
///   then `config.yaml`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(
        || std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.yaml".to_string()),
        str::to_string,
    );

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.charging.session_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "charging.session_timeout_secs must be positive".to_string(),
        ));
    }

    if config.charging.confirmation_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "charging.confirmation_buffer must be positive".to_string(),
        ));
    }

    if config.messaging.max_delivery_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "messaging.max_delivery_attempts must be at least 1".to_string(),
        ));
    }

    if config.messaging.handler_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "messaging.handler_concurrency must be at least 1".to_string(),
        ));
    }

    if config.scheduler.financing_days_per_year == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.financing_days_per_year must be positive".to_string(),
        ));
    }

    if config.scheduler.enabled && config.scheduler.tick_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.tick_interval_secs must be positive".to_string(),
        ));
    }

    let order = &config.default_rates.order_execution;
    if order.commission_floor > order.commission_cap {
        return Err(ConfigError::ValidationError(
            "default_rates.order_execution.commission_floor must not exceed commission_cap"
                .to_string(),
        ));
    }

    if order.commission_rate.is_sign_negative()
        || config.default_rates.on_behalf.commission.is_sign_negative()
    {
        return Err(ConfigError::ValidationError(
            "default commission rates must not be negative".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.charging.session_timeout_secs, 600);
        assert_eq!(config.messaging.max_delivery_attempts, 5);
        assert_eq!(config.scheduler.financing_days_per_year, 365);
        assert_eq!(config.default_rates.overnight_swap.fix_rate, dec!(0.01));
        assert_eq!(config.observability.logging.format, "json");
        assert_eq!(config.observability.metrics_port, 0);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_string("").unwrap();
        assert_eq!(config.charging.session_timeout_secs, 600);
    }

    #[test]
    fn test_load_partial_config() {
        let yaml = r#"
charging:
  session_timeout_secs: 30
default_rates:
  order_execution:
    commission_rate: "0.002"
    commission_asset: EUR
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load partial config: {e}"),
        };
        assert_eq!(config.charging.session_timeout_secs, 30);
        assert_eq!(config.default_rates.order_execution.commission_rate, dec!(0.002));
        assert_eq!(config.default_rates.order_execution.commission_asset.as_str(), "EUR");
        assert_eq!(config.messaging.handler_concurrency, 16);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${COMMISSION_CONFIG_TEST_NONEXISTENT_VAR:-debug}";
        assert_eq!(interpolate_env_vars(input), "level: debug");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "key: ${COMMISSION_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "key: ");
    }

    #[test]
    fn test_validation_zero_timeout() {
        let yaml = "charging:\n  session_timeout_secs: 0\n";
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validation_floor_above_cap() {
        let yaml = r#"
default_rates:
  order_execution:
    commission_floor: "10"
    commission_cap: "5"
"#;
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("commission_floor"));
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = "observability:\n  logging:\n    format: xml\n";
        assert!(load_config_from_string(yaml).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scheduler:\n  enabled: false\n  tick_interval_secs: 0").unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert!(!config.scheduler.enabled);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Some("/nonexistent/commission.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
