use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Content store
    pub cms_repository: String,
    pub cms_endpoint: Option<String>,
    pub cms_access_token: Option<String>,
    pub http_timeout: Duration,

    // Listing
    pub page_size: u32,
    pub home_revalidate: Duration,
    pub post_revalidate: Duration,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Content store
            cms_repository: required_env("CMS_REPOSITORY")?,
            cms_endpoint: optional_env("CMS_ENDPOINT"),
            cms_access_token: optional_env("CMS_ACCESS_TOKEN"),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 10)?),

            // Listing
            page_size: parse_env_u32("PAGE_SIZE", 5)?,
            home_revalidate: Duration::from_secs(parse_env_u64(
                "HOME_REVALIDATE_SECS",
                60 * 60 * 24,
            )?),
            post_revalidate: Duration::from_secs(parse_env_u64("POST_REVALIDATE_SECS", 60 * 30)?),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cms_repository.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "CMS_REPOSITORY".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "PAGE_SIZE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// A configuration suitable for tests, without touching the environment.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            cms_repository: "spacetraveling-test".to_string(),
            cms_endpoint: None,
            cms_access_token: None,
            http_timeout: Duration::from_secs(10),
            page_size: 5,
            home_revalidate: Duration::from_secs(60 * 60 * 24),
            post_revalidate: Duration::from_secs(60 * 30),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_testing_validates() {
        let config = Config::for_testing();
        config.validate().expect("test config should be valid");
    }

    #[test]
    fn test_validate_rejects_empty_repository() {
        let config = Config {
            cms_repository: String::new(),
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_defaults() {
        assert_eq!(parse_env_u64("NONEXISTENT_SPACETRAVELING_VAR", 42).unwrap(), 42);
        assert_eq!(
            env_or_default("NONEXISTENT_SPACETRAVELING_VAR", "fallback"),
            "fallback"
        );
        assert!(optional_env("NONEXISTENT_SPACETRAVELING_VAR").is_none());
    }
}
