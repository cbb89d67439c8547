use std::env;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;
use crate::pipeline::DEFAULT_MAX_CONCURRENT_FETCHES;

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub bind_addr: SocketAddr,
    pub max_concurrent_fetches: usize,
    pub cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
    pub request_timeout: Duration,
    pub allowed_origins: Vec<String>,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_CACHE_SWEEP_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_KEY_FILE: &str = ".environment.env";
const DEFAULT_ALLOWED_ORIGINS: &str = "https://riftradar.vercel.app";

impl Config {
    /// Reads the process environment. `.env` loading is left to the binary.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let riot_api_key = match var("RIOT_API_KEY").filter(|k| !k.trim().is_empty()) {
            Some(key) => key.trim().to_string(),
            None => {
                let path = var("RIOT_API_KEY_FILE").unwrap_or_else(|| DEFAULT_KEY_FILE.into());
                read_key_file(&path)?.ok_or_else(|| {
                    AppError::Config(format!(
                        "RIOT_API_KEY must be set or '{path}' must contain an api_key= line"
                    ))
                })?
            }
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is not a socket address: {e}")))?;

        let max_concurrent_fetches = var("MAX_CONCURRENT_FETCHES")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONCURRENT_FETCHES);

        let secs = |name: &str, default: u64| {
            Duration::from_secs(
                var(name)
                    .and_then(|v| v.parse::<u64>().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(default),
            )
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            riot_api_key,
            bind_addr,
            max_concurrent_fetches,
            cache_ttl: secs("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS),
            cache_sweep_interval: secs(
                "CACHE_SWEEP_INTERVAL_SECS",
                DEFAULT_CACHE_SWEEP_INTERVAL_SECS,
            ),
            request_timeout: secs("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            allowed_origins,
        })
    }
}

/// Read the `api_key=` line of a key file. A missing file is not an error.
fn read_key_file(path: &str) -> Result<Option<String>, AppError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    Ok(content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("api_key="))
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(String::from))
}
