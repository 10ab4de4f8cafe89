use axum::{
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::AuthError;

#[derive(Debug)]
pub enum AppError {
    Sqlx(sqlx::Error),
    Auth(AuthError),
    /// No usable `Authorization: Bearer` header.
    MissingBearer,
    Validation(String),
    /// A body or query string the extractors could not decode.
    Rejected { status: StatusCode, message: String },
}

impl From<sqlx::Error> for AppError {
    fn from(inner: sqlx::Error) -> Self {
        AppError::Sqlx(inner)
    }
}

impl From<AuthError> for AppError {
    fn from(inner: AuthError) -> Self {
        match inner {
            AuthError::Store(e) => AppError::Sqlx(e),
            other => AppError::Auth(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(json!({ "error": message })),
    )
        .into_response()
}

const CREDENTIALS_REJECTED: &str = "Could not validate credentials";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Sqlx(e) => {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"error": "Email already registered"})),
                        )
                            .into_response();
                    }
                }
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::MissingBearer => {
                tracing::debug!(reason = "missing_bearer", "request not authenticated");
                return unauthorized(CREDENTIALS_REJECTED);
            }
            AppError::Auth(AuthError::AuthenticationFailed) => {
                return unauthorized("Incorrect email or password");
            }
            AppError::Auth(e) if e.is_token_rejection() => {
                tracing::debug!(reason = e.reason(), "bearer token rejected");
                return unauthorized(CREDENTIALS_REJECTED);
            }
            AppError::Auth(e @ AuthError::InvalidHashFormat(_)) => {
                // Already logged with the user id where it was detected.
                tracing::error!(reason = e.reason(), "credential data integrity failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Auth(e) => {
                tracing::error!(reason = e.reason(), error = %e, "auth failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Rejected { status, message } => (status, message),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
