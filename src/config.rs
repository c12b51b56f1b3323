use crate::error::ConfigError;
use std::env;
use url::Url;

const DEFAULT_PORT: u16 = 8402;

/// Process-wide settings, read once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub vision_api_url: String,
    pub vision_api_key: String,
    pub event_grid_url: Url,
    pub event_grid_key: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let event_grid_url = required("eventGridUrl")?;
        let event_grid_url = Url::parse(&event_grid_url)
            .map_err(|e| ConfigError::InvalidUrl("eventGridUrl", e.to_string()))?;
        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ConfigError::InvalidPort(p.clone()))?,
            None => DEFAULT_PORT,
        };
        Ok(Config {
            vision_api_url: required("visionApiUrl")?
                .trim_end_matches('/')
                .to_string(),
            vision_api_key: required("visionApiKey")?,
            event_grid_url,
            event_grid_key: required("eventGridKey")?,
            port,
        })
    }
}
