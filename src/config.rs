use anyhow::{bail, Context, Result};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dashboard_url: Url,
    pub poll_interval_ms: u64,
    pub notification_ttl_ms: u64,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let raw_url = env_or("DASHBOARD_URL", "http://localhost:5000");
        let dashboard_url = Url::parse(&raw_url)
            .with_context(|| format!("invalid DASHBOARD_URL: {raw_url}"))?;

        let poll_interval_ms = u64_env("POLL_INTERVAL_MS", "3000")?;
        if poll_interval_ms == 0 {
            bail!("POLL_INTERVAL_MS must be greater than zero");
        }

        let log_format = match env_or("LOG_FORMAT", "text").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            dashboard_url,
            poll_interval_ms,
            notification_ttl_ms: u64_env("NOTIFICATION_TTL_MS", "5000")?,
            log_level: env_or("LOG_LEVEL", "info"),
            log_format,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn u64_env(key: &str, default: &str) -> Result<u64> {
    let raw = env_or(key, default);
    raw.parse().with_context(|| format!("invalid integer for {key}: {raw}"))
}
