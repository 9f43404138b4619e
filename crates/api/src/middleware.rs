use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use dreammap_auth::TokenService;

use crate::app::errors::ApiError;
use crate::context::UserContext;

const MISSING_TOKEN: &str = "Authorization token required";
const INVALID_TOKEN: &str = "Invalid or expired token";

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenService>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = {
        let _span = tracing::info_span!("authenticate", operation = "authenticate").entered();
        authenticate(state.tokens.as_ref(), req.headers())?
    };

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn authenticate(tokens: &dyn TokenService, headers: &HeaderMap) -> Result<UserContext, ApiError> {
    let token = extract_bearer(headers)?;
    let claims = tokens.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "token validation failed");
        ApiError::unauthorized(INVALID_TOKEN)
    })?;
    Ok(UserContext::new(claims.user_id))
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let unauthorized = || ApiError::unauthorized(MISSING_TOKEN);

    let header = headers.get(header::AUTHORIZATION).ok_or_else(unauthorized)?;
    let header = header.to_str().map_err(|_| unauthorized())?;
    let header = header.strip_prefix("Bearer ").ok_or_else(unauthorized)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(unauthorized());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(extract_bearer(&headers("Bearer  abc ")).unwrap(), "abc");
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert!(extract_bearer(&HeaderMap::new()).is_err());
        assert!(extract_bearer(&headers("Basic dXNlcjpwdw==")).is_err());
        assert!(extract_bearer(&headers("Bearer ")).is_err());
        assert!(extract_bearer(&headers("abc.def")).is_err());
    }
}
