//! `dreammap-core`: domain types for the dream map backend.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod dream;
pub mod entity;
pub mod error;
pub mod geo;
pub mod id;
pub mod user;

pub use dream::{Dream, DreamChanges, NewDream};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use geo::{GeocodedAddress, Location};
pub use id::{DreamId, UserId};
pub use user::{NewUser, User, UserProfile, validate_credentials};
