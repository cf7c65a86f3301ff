use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use super::display::DEFAULT_LABEL;

pub const DEFAULT_ENDPOINT: &str = "https://gdp5r90pv5.execute-api.eu-central-1.amazonaws.com/";
pub const DEFAULT_SELECTOR: &str = ".counter-container";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    /// page to rewrite; stdout when unset
    pub page: Option<PathBuf>,
    pub selector: String,
    pub label: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config, anyhow::Error> {
        let timeout_secs = match std::env::var("COUNTER_TIMEOUT_SECS") {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("invalid COUNTER_TIMEOUT_SECS: {}", v))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            endpoint: var_or("COUNTER_ENDPOINT", DEFAULT_ENDPOINT),
            page: std::env::var_os("COUNTER_PAGE").map(PathBuf::from),
            selector: var_or("COUNTER_SELECTOR", DEFAULT_SELECTOR),
            label: var_or("COUNTER_LABEL", DEFAULT_LABEL),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
