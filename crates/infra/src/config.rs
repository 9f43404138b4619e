//! Configuration loading and representation.
//!
//! Everything comes from the process environment. Loading goes through a
//! lookup function so tests never have to touch real env vars.

use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3001;
const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
const DEFAULT_GEOCODING_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub geocoding: GeocodingConfig,
    /// `None` runs the service on the in-memory store.
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodingConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(&get, "PORT", DEFAULT_PORT)?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let api_key = get("GOOGLE_API_KEY");
        if api_key.is_none() {
            tracing::warn!("GOOGLE_API_KEY not set; coordinate lookups will fail");
        }
        let geocoding = GeocodingConfig {
            api_key,
            base_url: get("GOOGLE_MAPS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_MAPS_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_or(
                &get,
                "GEOCODING_TIMEOUT_SECS",
                DEFAULT_GEOCODING_TIMEOUT_SECS,
            )?),
        };

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
                acquire_timeout: Duration::from_secs(parse_or(
                    &get,
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
                )?),
            }),
            None => {
                tracing::warn!("DATABASE_URL not set; data is kept in memory and lost on exit");
                None
            }
        };

        Ok(Self {
            port,
            jwt_secret,
            geocoding,
            database,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.jwt_secret, "dev-secret");
        assert_eq!(cfg.geocoding.api_key, None);
        assert_eq!(cfg.geocoding.base_url, "https://maps.googleapis.com/maps/api");
        assert_eq!(cfg.geocoding.timeout, Duration::from_secs(10));
        assert_eq!(cfg.database, None);
    }

    #[test]
    fn reads_all_values() {
        let cfg = load(&[
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("GOOGLE_API_KEY", "key-1"),
            ("GOOGLE_MAPS_BASE_URL", "http://localhost:9000"),
            ("GEOCODING_TIMEOUT_SECS", "3"),
            ("DATABASE_URL", "postgres://localhost/dreams"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECS", "2"),
        ])
        .unwrap();

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.geocoding.api_key.as_deref(), Some("key-1"));
        assert_eq!(cfg.geocoding.base_url, "http://localhost:9000");
        assert_eq!(cfg.geocoding.timeout, Duration::from_secs(3));
        assert_eq!(
            cfg.database,
            Some(DatabaseConfig {
                url: "postgres://localhost/dreams".into(),
                max_connections: 4,
                acquire_timeout: Duration::from_secs(2),
            })
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = load(&[("JWT_SECRET", "  "), ("DATABASE_URL", "")]).unwrap();
        assert_eq!(cfg.jwt_secret, "dev-secret");
        assert_eq!(cfg.database, None);
    }

    #[test]
    fn unparseable_port_is_an_error() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
