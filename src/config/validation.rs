use super::*;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &RelayConfig) -> ConfigResult<()> {
        Self::validate_server_settings(config)?;
        Self::validate_upstream_url(&config.upstream_url)?;
        Self::validate_timeout("request_timeout_secs", config.request_timeout_secs)?;
        Self::validate_timeout("connect_timeout_secs", config.connect_timeout_secs)?;
        Self::validate_log_level(&config.log_level)?;
        Ok(())
    }

    fn validate_server_settings(config: &RelayConfig) -> ConfigResult<()> {
        if config.host.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "host".to_string(),
            });
        }

        if config.max_payload_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_payload_size".to_string(),
                value: config.max_payload_size.to_string(),
                reason: "Must be > 0".to_string(),
            });
        }

        if config.workers == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "workers".to_string(),
                value: "0".to_string(),
                reason: "Must be > 0".to_string(),
            });
        }

        Ok(())
    }

    fn validate_upstream_url(url: &str) -> ConfigResult<()> {
        if url.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "upstream_url".to_string(),
            });
        }

        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "upstream_url".to_string(),
                value: url.to_string(),
                reason: "URL must start with http:// or https://".to_string(),
            })?;

        if rest.trim_end_matches('/').is_empty() || rest.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "upstream_url".to_string(),
                value: url.to_string(),
                reason: "URL must include a host".to_string(),
            });
        }

        Ok(())
    }

    fn validate_timeout(field: &str, secs: Option<u64>) -> ConfigResult<()> {
        if secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value: "0".to_string(),
                reason: "Must be > 0 when set".to_string(),
            });
        }
        Ok(())
    }

    fn validate_log_level(level: &str) -> ConfigResult<()> {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log_level".to_string(),
                value: level.to_string(),
                reason: format!("Must be one of {}", LOG_LEVELS.join(", ")),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> RelayConfig {
        RelayConfig {
            upstream_url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_upstream_url_requires_scheme_and_host() {
        assert!(ConfigValidator::validate(&with_url("http://localhost:11434")).is_ok());
        assert!(ConfigValidator::validate(&with_url("https://ollama.internal/")).is_ok());

        let result = ConfigValidator::validate(&with_url("localhost:11434"));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "upstream_url"
        ));

        assert!(ConfigValidator::validate(&with_url("http://")).is_err());
        assert!(matches!(
            ConfigValidator::validate(&with_url("")),
            Err(ConfigError::MissingRequired { .. })
        ));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let config = RelayConfig {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));

        let config = RelayConfig {
            connect_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_server_settings() {
        let config = RelayConfig {
            host: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ConfigValidator::validate(&config),
            Err(ConfigError::MissingRequired { .. })
        ));

        let config = RelayConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());

        let config = RelayConfig {
            max_payload_size: 0,
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_log_level() {
        let config = RelayConfig {
            log_level: "DEBUG".to_string(),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_ok());

        let config = RelayConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
