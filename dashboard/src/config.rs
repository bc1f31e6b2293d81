//! Environment configuration
//!
//! Read once at startup, after `.env` has been loaded. Command-line flags
//! override what is found here.

use std::str::FromStr;
use std::time::Duration;

use scheda_client::{ClientConfig, DEFAULT_API_URL};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub notice_duration: Duration,
    pub redirect_delay: Duration,
    pub assume_yes: bool,
}

fn parse_flag(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => parse_flag(&raw, default),
        Err(_) => default,
    }
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env_string("SCHEDA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            username: env_string("SCHEDA_USERNAME"),
            password: env_string("SCHEDA_PASSWORD"),
            notice_duration: Duration::from_secs(env_parse("SCHEDA_NOTICE_SECS", 5)),
            redirect_delay: Duration::from_millis(env_parse("SCHEDA_REDIRECT_DELAY_MS", 2000)),
            assume_yes: env_flag("SCHEDA_ASSUME_YES", false),
        }
    }

    /// Both halves of the login, when configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_redirect_delay(self.redirect_delay)
    }
}
