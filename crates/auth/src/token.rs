//! Signed bearer tokens (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use dreammap_core::UserId;

use crate::claims::{TokenClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed token, or claims outside their time window.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenValidationError> for TokenError {
    fn from(value: TokenValidationError) -> Self {
        Self::InvalidToken(value.to_string())
    }
}

/// Issues and validates bearer tokens.
///
/// `now` is explicit so expiry is decided by the caller's clock, not the
/// library's.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, TokenError>;

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError>;
}

/// HMAC-SHA256 token service keyed by a shared secret.
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        let mut validation = Validation::new(Algorithm::HS256);
        // Time checks go through `validate_claims` with the caller's clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenService for Hs256TokenService {
    fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims::new(user_id, now);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn issued_token_round_trips_user_id() {
        let svc = Hs256TokenService::new("test-secret");
        let now = Utc::now();
        let token = svc.issue(UserId::new(42), now).unwrap();

        let claims = svc.validate(&token, now).unwrap();
        assert_eq!(claims.user_id, UserId::new(42));
        assert_eq!(claims.expires_at.timestamp() - claims.issued_at.timestamp(), 3_600);
    }

    #[test]
    fn token_older_than_an_hour_is_rejected() {
        let svc = Hs256TokenService::new("test-secret");
        let issued = Utc::now() - Duration::hours(2);
        let token = svc.issue(UserId::new(1), issued).unwrap();

        let err = svc.validate(&token, Utc::now()).unwrap_err();
        assert_eq!(err, TokenError::InvalidToken("token has expired".into()));
    }

    #[test]
    fn token_just_inside_the_hour_is_accepted() {
        let svc = Hs256TokenService::new("test-secret");
        let issued = Utc::now() - Duration::minutes(59);
        let token = svc.issue(UserId::new(1), issued).unwrap();
        assert!(svc.validate(&token, Utc::now()).is_ok());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuer = Hs256TokenService::new("secret-a");
        let verifier = Hs256TokenService::new("secret-b");
        let token = issuer.issue(UserId::new(1), Utc::now()).unwrap();

        assert!(matches!(
            verifier.validate(&token, Utc::now()),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = Hs256TokenService::new("test-secret");
        assert!(matches!(
            svc.validate("not.a.jwt", Utc::now()),
            Err(TokenError::InvalidToken(_))
        ));
    }
}
