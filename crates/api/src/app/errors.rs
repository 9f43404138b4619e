use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use dreammap_core::DomainError;
use dreammap_infra::GeocodeError;

/// Everything a handler can fail with, folded into one HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input (400).
    #[error("{0}")]
    Validation(String),

    /// Missing/invalid credentials or token (401).
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(&'static str),

    /// Storage or upstream failure (500). `detail` is logged, never sent.
    #[error("{operation}: {detail}")]
    Internal {
        operation: &'static str,
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// 400. Logged in the current span, which carries the handler's `operation`.
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::info!(error = %message, "request rejected");
        Self::Validation(message)
    }

    /// 401. Logged like [`ApiError::validation`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::info!(error = %message, "request unauthorized");
        Self::Unauthorized(message)
    }

    pub fn internal(
        operation: &'static str,
        message: &'static str,
        detail: impl std::fmt::Display,
    ) -> Self {
        Self::Internal {
            operation,
            message,
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Validation(message) | Self::Unauthorized(message) => json_error(status, message),
            Self::NotFound(message) => json_error(status, message),
            Self::Internal {
                operation,
                message,
                detail,
            } => {
                tracing::error!(operation, error = %detail, "request failed");
                json_error(status, message)
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::validation(msg),
            DomainError::InvalidId(msg) => Self::validation(format!("invalid id: {msg}")),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        if err.is_upstream() {
            Self::internal("geocode", "Failed to fetch coordinates or Street View", err)
        } else {
            Self::validation(err.to_string())
        }
    }
}

/// Error body shared by every failing route: `{ "error": "<message>" }`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("op", "Failed", "boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn geocoder_errors_split_on_origin() {
        assert!(matches!(
            ApiError::from(GeocodeError::InvalidAddress),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(GeocodeError::NoResults),
            ApiError::Internal { operation: "geocode", .. }
        ));
    }

    /// Log sink shared between the subscriber and the assertion.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logged_within_operation(operation: &'static str, f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = tracing::info_span!("handler", operation).entered();
            f();
        });
        logs.contents()
    }

    #[test]
    fn client_errors_are_logged_with_operation() {
        let out = logged_within_operation("create_dream", || {
            let _ = ApiError::from(DomainError::validation("latitude must be within [-90, 90]"));
        });
        assert!(out.contains("create_dream"), "{out}");
        assert!(out.contains("latitude must be within [-90, 90]"), "{out}");

        let out = logged_within_operation("login", || {
            let _ = ApiError::unauthorized("Invalid credentials");
        });
        assert!(out.contains("login"), "{out}");
        assert!(out.contains("Invalid credentials"), "{out}");
    }

    #[test]
    fn invalid_id_is_a_validation_error() {
        let err = ApiError::from(DomainError::invalid_id("DreamId: abc"));
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
