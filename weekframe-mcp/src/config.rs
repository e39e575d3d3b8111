//! Server configuration from the environment

use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};
use weekframe_plugin::CallContext;
use weekframe_range::{ColumnScheme, ValidTimeframes};

pub const ENV_LOG_LEVEL: &str = "WEEKFRAME_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "WEEKFRAME_LOG_FORMAT";
pub const ENV_SCHEME: &str = "WEEKFRAME_SCHEME";
pub const ENV_TIMEFRAMES: &str = "WEEKFRAME_TIMEFRAMES";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}='{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected pretty or json", other)),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over the configured level when set. Stdout carries the
    /// protocol, so nothing else may write there.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format {
            LogFormat::Json => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            LogFormat::Pretty => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerConfig {
    pub logging: LoggingConfig,
    /// Column scheme used when a call does not name one
    pub scheme: ColumnScheme,
    /// Timeframes accepted by range functions unless a call narrows them
    pub valid_timeframes: ValidTimeframes,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank variables keep their default
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.logging.level = level.trim().to_string();
        }
        if let Some(value) = get(ENV_LOG_FORMAT) {
            config.logging.format = value.parse().map_err(|reason| ConfigError::Invalid {
                var: ENV_LOG_FORMAT,
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(value) = get(ENV_SCHEME) {
            config.scheme = value.parse().map_err(|e: weekframe_range::RangeError| ConfigError::Invalid {
                var: ENV_SCHEME,
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(value) = get(ENV_TIMEFRAMES) {
            let valid: ValidTimeframes =
                value.parse().map_err(|e: weekframe_range::RangeError| ConfigError::Invalid {
                    var: ENV_TIMEFRAMES,
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            // A list of separators only would disable every range function
            if valid.allowed().is_empty() {
                return Err(ConfigError::Invalid {
                    var: ENV_TIMEFRAMES,
                    value,
                    reason: "no timeframe names listed".to_string(),
                });
            }
            config.valid_timeframes = valid;
        }

        Ok(config)
    }

    pub fn call_context(&self) -> CallContext {
        CallContext::new()
            .with_scheme(self.scheme)
            .with_valid_timeframes(self.valid_timeframes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use weekframe_range::Timeframe;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.logging, LoggingConfig::default());
        assert_eq!(c.scheme, ColumnScheme::Ikea);
        assert_eq!(c.valid_timeframes, ValidTimeframes::all());
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_FORMAT, "JSON"),
            (ENV_SCHEME, "iso"),
            (ENV_TIMEFRAMES, "week,month"),
        ])
        .unwrap();
        assert_eq!(c.logging.level, "debug");
        assert_eq!(c.logging.format, LogFormat::Json);
        assert_eq!(c.scheme, ColumnScheme::Iso);
        assert_eq!(c.valid_timeframes.allowed(), vec![Timeframe::Week, Timeframe::Month]);

        let ctx = c.call_context();
        assert_eq!(ctx.scheme, ColumnScheme::Iso);
        assert!(!ctx.valid_timeframes.allows(Timeframe::Day));
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let c = config(&[(ENV_SCHEME, "  "), (ENV_TIMEFRAMES, "")]).unwrap();
        assert_eq!(c.scheme, ColumnScheme::Ikea);
        assert_eq!(c.valid_timeframes, ValidTimeframes::all());
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[(ENV_SCHEME, "cdc")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_SCHEME, .. }));
        assert!(err.to_string().contains("cdc"));

        assert!(config(&[(ENV_LOG_FORMAT, "xml")]).is_err());
        assert!(config(&[(ENV_TIMEFRAMES, "week,decade")]).is_err());
    }

    #[test]
    fn test_timeframe_list_without_names() {
        for value in [",", " , ,", ",,,"] {
            let err = config(&[(ENV_TIMEFRAMES, value)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { var: ENV_TIMEFRAMES, .. }), "{:?}", value);
            assert!(err.to_string().contains("no timeframe names"));
        }
        let c = config(&[(ENV_TIMEFRAMES, ",day,")]).unwrap();
        assert_eq!(c.valid_timeframes.allowed(), vec![Timeframe::Day]);
    }
}
