//! # API Error Types
//!
//! Translation of domain and storage errors into HTTP responses.
//!
//! ## Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error → Response Mapping                            │
//! │                                                                         │
//! │  ScheduleError::InvalidDate        → 400 INVALID_DATE                   │
//! │  ScheduleError::Validation         → 400 VALIDATION_ERROR               │
//! │  ScheduleError::CarNotFound        → 404 CAR_NOT_FOUND                  │
//! │  ScheduleError::GarageNotFound     → 404 GARAGE_NOT_FOUND               │
//! │  ScheduleError::CarNotInGarage     → 409 CAR_NOT_IN_GARAGE              │
//! │  ScheduleError::CapacityExhausted  → 409 CAPACITY_EXHAUSTED             │
//! │  DbError::NotFound                 → 404 NOT_FOUND                      │
//! │  everything else                   → 500 INTERNAL                       │
//! │                                                                         │
//! │  Body: {"code": "...", "message": "..."}                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! 1. Rejection errors carry their real message to the client
//! 2. Storage and internal failures are logged in full but answered with a
//!    generic "Something went wrong" so nothing about the backend leaks
//! 3. Status codes and JSON shapes live here, never in pitstop-core

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use pitstop_core::{ScheduleError, ValidationError};
use pitstop_db::DbError;

// =============================================================================
// Error Codes
// =============================================================================

/// Machine-readable codes carried in the error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidDate,
    CarNotFound,
    GarageNotFound,
    CarNotInGarage,
    CapacityExhausted,
    ValidationError,
    NotFound,
    Internal,
}

// =============================================================================
// Api Error
// =============================================================================

/// An error ready to become an HTTP response.
///
/// Handlers return `Result<_, ApiError>`; the `From` impls below let them use
/// `?` on core and database calls directly.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    /// 404 with the generic NOT_FOUND code.
    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            code: ErrorCode::NotFound,
            message: format!("{entity} not found: {id}"),
        }
    }

    /// Generic 500. The real cause goes to the log, never to the client.
    pub fn internal() -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: ErrorCode::Internal,
            message: "Something went wrong".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        let (status, code) = match &err {
            ScheduleError::InvalidDate { .. } => (StatusCode::BAD_REQUEST, ErrorCode::InvalidDate),
            ScheduleError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
            ScheduleError::CarNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::CarNotFound),
            ScheduleError::GarageNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::GarageNotFound),
            ScheduleError::CarNotInGarage { .. } => {
                (StatusCode::CONFLICT, ErrorCode::CarNotInGarage)
            }
            ScheduleError::CapacityExhausted { .. } => {
                (StatusCode::CONFLICT, ErrorCode::CapacityExhausted)
            }
            ScheduleError::Lookup(_) => {
                error!(error = %err, "storage lookup failed during admission");
                return ApiError::internal();
            }
        };

        ApiError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            code: ErrorCode::ValidationError,
            message: err.to_string(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::NotFound { .. } => ApiError {
                status: StatusCode::NOT_FOUND,
                code: ErrorCode::NotFound,
                message: err.to_string(),
            },
            _ => {
                error!(error = %err, "database operation failed");
                ApiError::internal()
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pitstop_core::LookupError;

    #[test]
    fn test_error_codes_serialize_screaming_snake() {
        let code = serde_json::to_value(ErrorCode::CapacityExhausted).unwrap();
        assert_eq!(code, serde_json::json!("CAPACITY_EXHAUSTED"));

        let code = serde_json::to_value(ErrorCode::CarNotInGarage).unwrap();
        assert_eq!(code, serde_json::json!("CAR_NOT_IN_GARAGE"));
    }

    #[test]
    fn test_schedule_error_mapping() {
        let err: ApiError = ScheduleError::InvalidDate {
            value: "2024-13-01".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::InvalidDate);
        assert!(err.message.contains("2024-13-01"));

        let err: ApiError = ScheduleError::CarNotFound("car-9".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, ErrorCode::CarNotFound);

        let err: ApiError = ScheduleError::CarNotInGarage {
            car_id: "car-1".to_string(),
            garage_id: "garage-1".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, ErrorCode::CarNotInGarage);

        let err: ApiError = ScheduleError::CapacityExhausted {
            garage_id: "garage-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            capacity: 5,
            booked: 5,
        }
        .into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, ErrorCode::CapacityExhausted);
    }

    #[test]
    fn test_lookup_failure_is_opaque() {
        let err: ApiError = ScheduleError::Lookup(LookupError::new("connection reset")).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, "Something went wrong");
        assert!(!err.message.contains("connection reset"));
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Car", "car-42").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("car-42"));

        let err: ApiError = DbError::QueryFailed("syntax error near SELECT".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Something went wrong");
    }

    #[test]
    fn test_validation_error_mapping() {
        let err: ApiError = ValidationError::Required {
            field: "carMake".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "carMake is required");
    }
}
