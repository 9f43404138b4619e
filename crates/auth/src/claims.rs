use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dreammap_core::UserId;

/// Lifetime of an issued bearer token.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Bearer token claims (transport-agnostic).
///
/// Timestamps use the registered JWT names and are encoded as unix seconds,
/// so tokens stay readable by any standard JWT tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Authenticated user.
    #[serde(rename = "userId")]
    pub user_id: UserId,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// Claims for a token issued at `now`, valid for [`TOKEN_TTL_SECS`].
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            issued_at: now,
            expires_at: now + Duration::seconds(TOKEN_TTL_SECS),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims against `now`.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::token`].
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
