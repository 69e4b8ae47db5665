//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>` for failures that cannot be
//! expressed as an in-page toast. Server-side errors are captured to Sentry
//! before responding.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::supabase::SupabaseError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Supabase operation failed.
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        let status = match &self {
            Self::Supabase(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Supabase(_) => "Error del servicio externo",
            Self::Session(_) | Self::Internal(_) => "Error interno del servidor",
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.to_string(), "Internal error: boom");

        let err = AppError::Supabase(SupabaseError::CatalogUnavailable);
        assert_eq!(
            err.to_string(),
            "Supabase error: No hay productos disponibles en este momento"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Supabase(SupabaseError::NetworkUnavailable)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
