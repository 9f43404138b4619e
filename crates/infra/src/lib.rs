//! Infrastructure layer: config, database, persistence, external services.

pub mod config;
pub mod db;
pub mod geocoding;
pub mod store;

pub use config::{AppConfig, ConfigError, DatabaseConfig, GeocodingConfig};
pub use geocoding::{GeocodeError, Geocoder, GoogleGeocoder};
pub use store::{DreamStore, InMemoryStore, PostgresStore, Store, StoreError, UserStore};
