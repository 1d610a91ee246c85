//! Environment configuration

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

use crate::gravatar::DEFAULT_GRAVATAR_BASE_URL;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// When false the handler skips signal recording entirely
    pub record_signals: bool,
    pub gravatar_base_url: String,
    pub upstream_timeout: Option<Duration>,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a valid socket address")?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => 5,
        };

        let record_signals = match lookup("RECORD_SIGNALS") {
            Some(raw) => parse_bool(&raw).context("RECORD_SIGNALS must be true or false")?,
            None => true,
        };

        if record_signals && database_url.is_none() {
            bail!("DATABASE_URL is required when RECORD_SIGNALS is enabled");
        }

        let gravatar_base_url = lookup("GRAVATAR_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GRAVATAR_BASE_URL.to_string());

        let upstream_timeout = lookup("UPSTREAM_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .context("UPSTREAM_TIMEOUT_SECS must be a number of seconds")
            })
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            bind_addr,
            database_url,
            database_max_connections,
            record_signals,
            gravatar_base_url,
            upstream_timeout,
        })
    }

    /// Database URL with the password replaced, for logging
    pub fn database_url_masked(&self) -> Option<String> {
        let url = self.database_url.as_ref()?;
        match reqwest::Url::parse(url) {
            Ok(mut parsed) if parsed.password().is_some() => {
                let _ = parsed.set_password(Some("****"));
                Some(parsed.to_string())
            }
            _ => Some(url.clone()),
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized boolean {:?}", other),
    }
}
