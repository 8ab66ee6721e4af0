use std::env;
use std::time::{Duration, Instant};

use chrono::Utc;

pub const DEFAULT_BANNER_IDS: &[&str] = &["lightning", "sparky"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub redis_url: Option<String>,
    pub banner_ids: Vec<String>,
    pub banner_duration: Duration,
    pub pubsub_channel: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "30212".into())
                .parse()?,
            redis_url: env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            banner_ids: env::var("BANNER_IDS")
                .ok()
                .map(|v| parse_ids(&v))
                .filter(|ids| !ids.is_empty())
                .unwrap_or_else(default_ids),
            banner_duration: check_duration(Duration::from_secs(
                env::var("BANNER_DURATION_SECONDS")
                    .unwrap_or_else(|_| "60".into())
                    .parse()?,
            ))?,
            pubsub_channel: env::var("PUBSUB_CHANNEL")
                .unwrap_or_else(|_| "banner_updated".into()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
        })
    }

    /// Everything in memory, default ids and duration. Used by tests.
    pub fn in_memory() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            redis_url: None,
            banner_ids: default_ids(),
            banner_duration: Duration::from_secs(60),
            pubsub_channel: "banner_updated".into(),
            static_dir: "static".into(),
        }
    }
}

/// Rejects expiry durations that cannot be added to the current time.
pub fn check_duration(duration: Duration) -> anyhow::Result<Duration> {
    let out_of_range =
        || anyhow::anyhow!("BANNER_DURATION_SECONDS out of range: {}", duration.as_secs());
    let expiry = chrono::Duration::from_std(duration).map_err(|_| out_of_range())?;
    Utc::now()
        .checked_add_signed(expiry)
        .ok_or_else(out_of_range)?;
    Instant::now().checked_add(duration).ok_or_else(out_of_range)?;
    Ok(duration)
}

fn default_ids() -> Vec<String> {
    DEFAULT_BANNER_IDS.iter().map(|s| s.to_string()).collect()
}

fn parse_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_trims_and_skips_blanks() {
        assert_eq!(parse_ids(" lightning, ,sparky ,"), vec!["lightning", "sparky"]);
        assert!(parse_ids(" , ").is_empty());
    }

    #[test]
    fn test_check_duration_bounds() {
        assert_eq!(
            check_duration(Duration::from_secs(60)).unwrap(),
            Duration::from_secs(60)
        );
        // Accepted by chrono::Duration but past the last representable date.
        assert!(check_duration(Duration::from_secs(10_000_000_000_000)).is_err());
        assert!(check_duration(Duration::from_secs(u64::MAX)).is_err());
    }

    #[test]
    fn test_in_memory_defaults() {
        let config = Config::in_memory();
        assert_eq!(config.banner_ids, vec!["lightning", "sparky"]);
        assert_eq!(config.banner_duration, Duration::from_secs(60));
        assert!(config.redis_url.is_none());
    }
}
