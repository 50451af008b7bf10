//! # Runtime Configuration
//!
//! Filter settings come from an optional JSON file and are then overridden by
//! individual environment variables:
//!
//! - `BLOOM_CONFIG`: path to a JSON `FilterConfig`
//! - `BLOOM_SIZE_BITS`: bitmap length m
//! - `BLOOM_HASH_COUNT`: offsets per value k
//! - `BLOOM_ENCODER`: `murmur3` | `sha256` | `siphash`
//! - `BLOOM_CALL_TIMEOUT_MS`: per store call deadline
//! - `BLOOM_REDIS_URL`: Redis endpoint (used with the `redis` feature)
//! - `BLOOM_LOG_LEVEL` or `RUST_LOG`: log filter (default: info)
//!
//! Unparsable overrides are logged and ignored.

use std::path::Path;

use anyhow::{Context, Result};
use bitmap_bloom::{EncoderKind, FilterConfig};
use tracing::{info, warn};

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Filter parameters and encoder.
    pub filter: FilterConfig,
    /// Redis endpoint; `None` selects the in-memory store.
    pub redis_url: Option<String>,
    /// Log filter directive.
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            redis_url: None,
            log_level: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            log_level: log_level_from(&lookup),
            ..Self::default()
        };

        if let Some(path) = lookup("BLOOM_CONFIG") {
            config.filter = load_filter_file(Path::new(&path))?;
            info!(path = %path, "Loaded filter configuration file");
        }

        if let Some(raw) = lookup("BLOOM_SIZE_BITS") {
            match raw.parse() {
                Ok(bits) => config.filter.size_bits = bits,
                Err(_) => warn!(value = %raw, "BLOOM_SIZE_BITS must be an unsigned integer"),
            }
        }

        if let Some(raw) = lookup("BLOOM_HASH_COUNT") {
            match raw.parse() {
                Ok(k) => config.filter.hash_count = k,
                Err(_) => warn!(value = %raw, "BLOOM_HASH_COUNT must be an unsigned integer"),
            }
        }

        if let Some(raw) = lookup("BLOOM_ENCODER") {
            match raw.parse::<EncoderKind>() {
                Ok(kind) => config.filter.encoder = kind,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring BLOOM_ENCODER"),
            }
        }

        if let Some(raw) = lookup("BLOOM_CALL_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => config.filter.call_timeout_ms = Some(ms),
                Err(_) => warn!(value = %raw, "BLOOM_CALL_TIMEOUT_MS must be an unsigned integer"),
            }
        }

        config.redis_url = lookup("BLOOM_REDIS_URL").filter(|url| !url.is_empty());

        config
            .filter
            .validate()
            .context("Invalid filter configuration")?;

        Ok(config)
    }
}

/// Log filter directive: `BLOOM_LOG_LEVEL`, then `RUST_LOG`, then `info`.
pub fn log_level_from<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("BLOOM_LOG_LEVEL")
        .or_else(|| lookup("RUST_LOG"))
        .unwrap_or_else(|| "info".to_string())
}

fn load_filter_file(path: &Path) -> Result<FilterConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = FilterConfig::from_json(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}
