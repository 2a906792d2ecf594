use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,

    // Widget
    pub tick_interval: Duration,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` uses the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("ATTENDANCE_API_URL")
            .unwrap_or_else(|| "http://127.0.0.1:5000/api".to_string())
            .trim_end_matches('/')
            .to_string();
        if api_url.is_empty() {
            return Err(ConfigError::Missing("ATTENDANCE_API_URL"));
        }

        let tick_ms: u64 = parse(&lookup, "TICK_INTERVAL_MS", "1000")?; // default 1s
        if tick_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "TICK_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            api_url,
            api_token: lookup("ATTENDANCE_API_TOKEN").filter(|t| !t.trim().is_empty()),
            request_timeout: Duration::from_secs(parse(&lookup, "REQUEST_TIMEOUT_SECS", "10")?),
            tick_interval: Duration::from_millis(tick_ms),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse(&lookup, "LOG_LEVEL", "info")?,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:5000/api");
        assert_eq!(config.api_token, None);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.log_level, tracing::Level::INFO);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("ATTENDANCE_API_URL", "https://hr.example.com/api/"),
            ("ATTENDANCE_API_TOKEN", "secret"),
            ("TICK_INTERVAL_MS", "500"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://hr.example.com/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.tick_interval, Duration::from_millis(500));
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err(),
            ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                value: "soon".to_string()
            }
        );
        assert!(matches!(
            config(&[("TICK_INTERVAL_MS", "0")]),
            Err(ConfigError::Invalid { var: "TICK_INTERVAL_MS", .. })
        ));
        assert!(config(&[("LOG_LEVEL", "loud")]).is_err());
    }

    #[test]
    fn blank_token_is_ignored() {
        assert_eq!(config(&[("ATTENDANCE_API_TOKEN", "  ")]).unwrap().api_token, None);
    }
}
