use std::{env, fmt::Display, str::FromStr};

use chrono::Duration;
use tracing::{info, warn};

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub invite_ttl_days: i64,
    pub session_ttl_days: i64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_url: try_load("DATABASE_URL", "culinaria.sqlite"),
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3000"),
            invite_ttl_days: load_ttl_days("INVITE_TTL_DAYS", 7),
            session_ttl_days: load_ttl_days("SESSION_TTL_DAYS", 30),
        }
    }

    pub fn invite_ttl(&self) -> Duration {
        Duration::days(self.invite_ttl_days)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::days(self.session_ttl_days)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "culinaria.sqlite".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            invite_ttl_days: 7,
            session_ttl_days: 30,
        }
    }
}

/// Longest lifetime accepted for invites and sessions.
const MAX_TTL_DAYS: i64 = 3650;

fn load_ttl_days(key: &str, default: i64) -> i64 {
    let days: i64 = try_load(key, &default.to_string());
    if (1..=MAX_TTL_DAYS).contains(&days) {
        days
    } else {
        warn!(
            "{key} must be between 1 and {MAX_TTL_DAYS} days, got {days}, using default: {default}"
        );
        default
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
            .parse()
            .unwrap_or_else(|_| panic!("default for {key} must parse"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.invite_ttl(), Duration::days(7));
        assert_eq!(config.session_ttl(), Duration::days(30));
    }

    #[test]
    fn test_try_load_falls_back_on_missing_var() {
        let value: i64 = try_load("CULINARIA_TEST_UNSET_VARIABLE", "42");
        assert_eq!(value, 42);
    }

    #[test]
    fn test_ttl_days_out_of_range_fall_back() {
        for (raw, expected) in [
            ("14", 14),
            ("3650", 3650),
            ("0", 5),
            ("-3", 5),
            ("3651", 5),
            ("9223372036854775807", 5),
        ] {
            std::env::set_var("CULINARIA_TEST_TTL_DAYS", raw);
            assert_eq!(load_ttl_days("CULINARIA_TEST_TTL_DAYS", 5), expected, "{raw}");
        }
        std::env::remove_var("CULINARIA_TEST_TTL_DAYS");
    }
}
