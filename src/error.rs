use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Error kinds surfaced by the domain operations. Handlers return these
/// directly; the `IntoResponse` impl translates them to transport codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("You are not enrolled in this course")]
    NotEnrolled,

    #[error("No passing quiz attempt exists for this course")]
    QuizNotPassed,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) | ApiError::NotEnrolled | ApiError::QuizNotPassed => {
                StatusCode::FORBIDDEN
            }
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                "Internal server error".to_string()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::NotFound("course").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Unauthorized("Invalid credentials").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("nope").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotEnrolled.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::QuizNotPassed.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::InvalidInput("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Conflict("quiz").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Database(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let resp = ApiError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(ApiError::NotFound("quiz").to_string(), "quiz not found");
    }
}
