use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

use wealthplan_core::ProjectionSettings;
use wealthplan_remote::RemoteConfig;

pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    pub settings: ProjectionSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("WP_API_URL").unwrap_or_else(|| "http://localhost:8080/api".into());
        let api_token = lookup("WP_API_TOKEN").filter(|t| !t.trim().is_empty());
        let timeout_ms: u64 = lookup("WP_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);

        let defaults = ProjectionSettings::default();
        let settings = ProjectionSettings {
            current_age: parse_or(&lookup, "WP_CURRENT_AGE", defaults.current_age)?,
            retirement_age: parse_or(&lookup, "WP_RETIREMENT_AGE", defaults.retirement_age)?,
            projection_years: parse_or(&lookup, "WP_PROJECTION_YEARS", defaults.projection_years)?,
            inflation_rate: parse_or(&lookup, "WP_INFLATION_RATE", defaults.inflation_rate)?,
            average_return_rate: parse_or(
                &lookup,
                "WP_AVERAGE_RETURN_RATE",
                defaults.average_return_rate,
            )?,
        };
        settings
            .validate()
            .context("Invalid projection settings in environment")?;

        Ok(Self {
            api_url,
            api_token,
            request_timeout: Duration::from_millis(timeout_ms),
            settings,
        })
    }

    pub fn remote(&self) -> RemoteConfig {
        let config = RemoteConfig::new(&self.api_url).with_timeout(self.request_timeout);
        match &self.api_token {
            Some(token) => config.with_access_token(token),
            None => config,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key}: '{raw}'")),
        None => Ok(default),
    }
}
