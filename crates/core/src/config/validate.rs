use super::{types::Config, ConfigError};

/// Validate configuration beyond what serde enforces:
/// - Server port is not 0
/// - Upstream API keys are non-empty
/// - Search limits are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.jackett.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "jackett.api_key cannot be empty".to_string(),
        ));
    }

    if config.omdb.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "omdb.api_key cannot be empty".to_string(),
        ));
    }

    if config.realdebrid.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "realdebrid.api_key cannot be empty".to_string(),
        ));
    }

    if config.search.movie_limit == 0 || config.search.series_limit == 0 {
        return Err(ConfigError::ValidationError(
            "search limits cannot be 0".to_string(),
        ));
    }

    if config.search.anime_indexers.is_empty() {
        return Err(ConfigError::ValidationError(
            "search.anime_indexers cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[jackett]
url = "http://localhost:9117/api/v2.0"
api_key = "jackett-key"

[omdb]
api_key = "omdb-key"

[realdebrid]
api_key = "rd-key"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = valid_config();
        config.realdebrid.api_key = String::new();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_anime_indexers_fails() {
        let mut config = valid_config();
        config.search.anime_indexers.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
