use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::poll::MATCH_POLL_INTERVAL;

pub const POLL_SECS_ENV: &str = "BETTING_POLL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every endpoint path. Empty means same origin.
    pub api_base: String,
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            poll_interval: MATCH_POLL_INTERVAL,
        }
    }
}

impl ClientConfig {
    pub fn from_values(api_base: Option<&str>, poll_secs: Option<&str>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(base) = api_base {
            config.api_base = base.trim().to_string();
        }
        if let Some(secs) = poll_secs {
            config.poll_interval = parse_poll_secs(secs)?;
        }
        Ok(config)
    }

    /// Values baked in at compile time, used by the browser build.
    pub fn from_build_env() -> Result<Self> {
        Self::from_values(option_env!("BETTING_API_BASE"), option_env!("BETTING_POLL_SECS"))
    }
}

pub fn parse_poll_secs(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ClientError::Config(format!("{POLL_SECS_ENV} must be greater than zero"))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ClientError::Config(format!("{POLL_SECS_ENV}={raw:?}: {e}"))),
    }
}
