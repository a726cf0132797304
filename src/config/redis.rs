//! Redis configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,
}

impl RedisConfig {
    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self { url: String::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_fails_validation() {
        assert!(RedisConfig::default().validate().is_err());
    }

    #[test]
    fn non_redis_scheme_fails_validation() {
        let config = RedisConfig {
            url: "http://localhost:6379".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn redis_and_rediss_schemes_pass() {
        for url in ["redis://localhost:6379", "rediss://cache.example.com:6380"] {
            let config = RedisConfig {
                url: url.to_string(),
            };
            assert!(config.validate().is_ok());
        }
    }
}
