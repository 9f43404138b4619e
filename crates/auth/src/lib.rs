//! `dreammap-auth`: credentials and bearer tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod password;
pub mod token;

pub use claims::{TOKEN_TTL_SECS, TokenClaims, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use token::{Hs256TokenService, TokenError, TokenService};
