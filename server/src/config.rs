use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Result, anyhow};
use tracing::{info, warn};
use youtube_client::DEFAULT_API_BASE;

pub struct Config {
    pub port: u16,
    pub api_key: Option<String>,
    pub api_base: String,
    pub proxy_base: Option<String>,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            port: try_load(&lookup, "PORT", "8080")?,
            api_key: optional(&lookup, "YOUTUBE_API_KEY"),
            api_base: try_load(&lookup, "YOUTUBE_API_BASE", DEFAULT_API_BASE)?,
            proxy_base: optional(&lookup, "YOUTUBE_PROXY_BASE"),
            data_dir: try_load(&lookup, "DATA_DIR", "./data")?,
        })
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    let value = lookup(key).filter(|v| !v.trim().is_empty());
    if value.is_none() {
        warn!("Environment variable {key} not set");
    }
    value
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.api_key.is_none());
        assert!(config.proxy_base.is_none());
    }

    #[test]
    fn values_are_read_from_environment() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("YOUTUBE_API_KEY", "abc123"),
            ("YOUTUBE_PROXY_BASE", "https://clone.example.com"),
            ("DATA_DIR", "/var/lib/yt-clone"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.proxy_base.as_deref(), Some("https://clone.example.com"));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/yt-clone"));
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let config = config_from(&[("YOUTUBE_API_KEY", "  ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config_from(&[("PORT", "not-a-port")]).err().unwrap();
        assert!(err.to_string().contains("Invalid PORT value"));
    }
}
