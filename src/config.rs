use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::MatchScope;
use crate::types::{DUPLICATE_PENALTY, MAX_MISTAKES, MAX_PENALTIES, SKIP_PENALTY};

const DEFAULT_RETRY_DELAY_MS: u64 = 0;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_DIR: &str = "./logs";

/// What a scorer warning costs on an otherwise accepted stroke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningPolicy {
    #[default]
    Ignore,
    Penalize(u32),
}

impl WarningPolicy {
    pub fn penalty(&self) -> u32 {
        match self {
            WarningPolicy::Ignore => 0,
            WarningPolicy::Penalize(amount) => *amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyPolicy {
    pub max_mistakes: u32,
    pub reveal_penalty: u32,
    pub duplicate_penalty: u32,
    pub skip_penalty: u32,
    pub warning: WarningPolicy,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self {
            max_mistakes: MAX_MISTAKES,
            reveal_penalty: MAX_PENALTIES,
            duplicate_penalty: DUPLICATE_PENALTY,
            skip_penalty: SKIP_PENALTY,
            warning: WarningPolicy::Ignore,
        }
    }
}

/// Subscriber settings for [`init_tracing`](crate::logging::init_tracing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive
    pub level: String,
    /// Directory for the daily rolling file; `None` logs to stdout only
    pub file_dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file_dir: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_mistakes must be at least 1")]
    ZeroMistakeLimit,
}

#[derive(Debug, Clone)]
pub struct TeachConfig {
    pub penalties: PenaltyPolicy,
    pub match_scope: MatchScope,
    pub retry_delay: Duration,
    pub logging: LogSettings,
}

impl Default for TeachConfig {
    fn default() -> Self {
        Self {
            penalties: PenaltyPolicy::default(),
            match_scope: MatchScope::All,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            logging: LogSettings::default(),
        }
    }
}

impl TeachConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unparsable values keep their
    /// defaults.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let uint = |key: &str| string(key).and_then(|v| v.trim().parse::<u32>().ok());

        let defaults = PenaltyPolicy::default();
        let warning = match uint("HANDWRITING_WARNING_PENALTY") {
            None | Some(0) => WarningPolicy::Ignore,
            Some(amount) => WarningPolicy::Penalize(amount),
        };
        let penalties = PenaltyPolicy {
            max_mistakes: uint("HANDWRITING_MAX_MISTAKES").unwrap_or(defaults.max_mistakes),
            reveal_penalty: uint("HANDWRITING_REVEAL_PENALTY").unwrap_or(defaults.reveal_penalty),
            duplicate_penalty: uint("HANDWRITING_DUPLICATE_PENALTY")
                .unwrap_or(defaults.duplicate_penalty),
            skip_penalty: uint("HANDWRITING_SKIP_PENALTY").unwrap_or(defaults.skip_penalty),
            warning,
        };

        let match_scope = string("HANDWRITING_MATCH_SCOPE")
            .and_then(|v| MatchScope::from_str(&v))
            .unwrap_or_default();

        let retry_delay = Duration::from_millis(
            string("HANDWRITING_RETRY_DELAY_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_DELAY_MS),
        );

        let file_logs = string("ENABLE_FILE_LOGS")
            .map(|v| matches!(v.trim(), "true" | "1"))
            .unwrap_or(false);
        let logging = LogSettings {
            level: string("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            file_dir: file_logs.then(|| {
                PathBuf::from(string("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string()))
            }),
        };

        Self {
            penalties,
            match_scope,
            retry_delay,
            logging,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.penalties.max_mistakes == 0 {
            return Err(ConfigError::ZeroMistakeLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> TeachConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TeachConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_vars() {
        let config = config_from(&[]);
        assert_eq!(config.penalties, PenaltyPolicy::default());
        assert_eq!(config.match_scope, MatchScope::All);
        assert_eq!(config.retry_delay, Duration::ZERO);
        assert_eq!(config.logging, LogSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HANDWRITING_MAX_MISTAKES", "5"),
            ("HANDWRITING_REVEAL_PENALTY", "6"),
            ("HANDWRITING_WARNING_PENALTY", "1"),
            ("HANDWRITING_MATCH_SCOPE", "pending"),
            ("HANDWRITING_RETRY_DELAY_MS", "250"),
            ("RUST_LOG", "debug"),
        ]);
        assert_eq!(config.penalties.max_mistakes, 5);
        assert_eq!(config.penalties.reveal_penalty, 6);
        assert_eq!(config.penalties.warning, WarningPolicy::Penalize(1));
        assert_eq!(config.match_scope, MatchScope::Pending);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_file_logging_settings() {
        let off = config_from(&[("LOG_DIR", "/var/log/handwriting")]);
        assert_eq!(off.logging.file_dir, None);

        let default_dir = config_from(&[("ENABLE_FILE_LOGS", "1")]);
        assert_eq!(default_dir.logging.file_dir, Some(PathBuf::from("./logs")));

        let custom = config_from(&[
            ("ENABLE_FILE_LOGS", "true"),
            ("LOG_DIR", "/var/log/handwriting"),
        ]);
        assert_eq!(
            custom.logging.file_dir,
            Some(PathBuf::from("/var/log/handwriting"))
        );

        let unknown = config_from(&[("ENABLE_FILE_LOGS", "yes")]);
        assert_eq!(unknown.logging.file_dir, None);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("HANDWRITING_MAX_MISTAKES", "three"),
            ("HANDWRITING_SKIP_PENALTY", "-2"),
            ("HANDWRITING_MATCH_SCOPE", "nearby"),
            ("HANDWRITING_RETRY_DELAY_MS", "  "),
        ]);
        assert_eq!(config.penalties.max_mistakes, MAX_MISTAKES);
        assert_eq!(config.penalties.skip_penalty, SKIP_PENALTY);
        assert_eq!(config.match_scope, MatchScope::All);
        assert_eq!(config.retry_delay, Duration::ZERO);
    }

    #[test]
    fn test_zero_warning_penalty_is_ignore() {
        let config = config_from(&[("HANDWRITING_WARNING_PENALTY", "0")]);
        assert_eq!(config.penalties.warning, WarningPolicy::Ignore);
        assert_eq!(config.penalties.warning.penalty(), 0);
    }

    #[test]
    fn test_validate_rejects_zero_mistake_limit() {
        let config = config_from(&[("HANDWRITING_MAX_MISTAKES", "0")]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroMistakeLimit));
    }
}
