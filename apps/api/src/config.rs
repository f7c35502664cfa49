//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults:
//!
//! | Variable                       | Default         | Meaning                  |
//! |--------------------------------|-----------------|--------------------------|
//! | `PITSTOP_PORT`                 | `3000`          | HTTP listen port         |
//! | `PITSTOP_DATABASE_PATH`        | `./pitstop.db`  | SQLite file path         |
//! | `PITSTOP_SERIALIZE_ADMISSIONS` | `false`         | Per-(garage, day) locks  |
//! | `RUST_LOG`                     | `info`          | Log filter (tracing)     |

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port.
    pub port: u16,

    /// SQLite database file path.
    pub database_path: String,

    /// When on, admission + persist for a booking runs under a
    /// per-(garage, day) lock, closing the check-then-act window within
    /// this process. Off by default: the stock behavior allows concurrent
    /// admissions for the same day to overshoot capacity by one.
    pub serialize_admissions: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: parse_port("PITSTOP_PORT", env::var("PITSTOP_PORT").ok())?,

            database_path: env::var("PITSTOP_DATABASE_PATH")
                .unwrap_or_else(|_| "./pitstop.db".to_string()),

            serialize_admissions: parse_flag(
                "PITSTOP_SERIALIZE_ADMISSIONS",
                env::var("PITSTOP_SERIALIZE_ADMISSIONS").ok(),
            )?,
        };

        Ok(config)
    }
}

/// Parses an optional port value, defaulting to 3000.
fn parse_port(name: &str, value: Option<String>) -> Result<u16, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(3000),
    }
}

/// Parses an optional boolean flag, defaulting to false.
fn parse_flag(name: &str, value: Option<String>) -> Result<bool, ConfigError> {
    match value {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(name.to_string())),
        },
        None => Ok(false),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("PITSTOP_PORT", None).unwrap(), 3000);
        assert_eq!(parse_port("PITSTOP_PORT", Some("8080".to_string())).unwrap(), 8080);
        assert_eq!(parse_port("PITSTOP_PORT", Some(" 8080 ".to_string())).unwrap(), 8080);

        assert!(parse_port("PITSTOP_PORT", Some("http".to_string())).is_err());
        assert!(parse_port("PITSTOP_PORT", Some("99999".to_string())).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag("X", None).unwrap());

        for on in ["1", "true", "TRUE", "yes", "on"] {
            assert!(parse_flag("X", Some(on.to_string())).unwrap(), "{on}");
        }
        for off in ["0", "false", "False", "no", "off"] {
            assert!(!parse_flag("X", Some(off.to_string())).unwrap(), "{off}");
        }

        assert!(parse_flag("X", Some("maybe".to_string())).is_err());
    }
}
