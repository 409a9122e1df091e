use crate::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Every failure a workflow can report. Callers branch on the variant,
/// clients see the status code and the rendered message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invite code has expired")]
    Expired,

    #[error("{0}")]
    AlreadyExists(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Invalid(&'static str),

    #[error("Internal error: {0}")]
    Unknown(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Invalid(_) => StatusCode::BAD_REQUEST,
            AppError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a unique violation to `AlreadyExists` with a caller-specific message.
    pub fn on_conflict(message: &'static str) -> impl FnOnce(DieselError) -> AppError {
        move |e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::AlreadyExists(message)
            }
            other => AppError::from(other),
        }
    }
}

impl From<DieselError> for AppError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => AppError::NotFound("Record"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::AlreadyExists("Record already exists")
            }
            other => AppError::Unknown(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        AppError::Unknown(format!("database connection failed: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            AppError::Unknown(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("Invite").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Expired.status(), StatusCode::GONE);
        assert_eq!(
            AppError::AlreadyExists("dup").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unauthorized("no").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Invalid("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Unknown("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_the_record() {
        assert_eq!(AppError::NotFound("Invite").to_string(), "Invite not found");
    }

    #[test]
    fn test_diesel_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(DieselError::NotFound),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_on_conflict_passes_other_errors_through() {
        let mapped = AppError::on_conflict("Already a member")(DieselError::NotFound);
        assert!(matches!(mapped, AppError::NotFound(_)));
    }
}
