//! # Error Types
//!
//! Scheduling-domain error types for pitstop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pitstop-core errors (this file)                                       │
//! │  ├── ScheduleError    - Admission rejections + report input failures   │
//! │  ├── ValidationError  - Field-level input violations                   │
//! │  └── LookupError      - Opaque storage-capability failure              │
//! │                                                                         │
//! │  pitstop-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → ScheduleError → ApiError → HTTP client        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, dates, counts)
//! 3. Errors are enum variants, never String
//! 4. Rejections are expected outcomes: callers match on them, nothing panics

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Schedule Error
// =============================================================================

/// Scheduling and admission errors.
///
/// Every admission rejection is one of these variants. They are ordinary,
/// recoverable outcomes for the caller; only [`ScheduleError::Lookup`] signals
/// that something outside the engine actually broke.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A date or month input string failed to parse.
    ///
    /// ## When This Occurs
    /// - `scheduledDate` on a booking is not a valid `yyyy-mm-dd`
    /// - A report range boundary is malformed (`2024-13-01`, `2024-02-30`, ...)
    #[error("Invalid date input: {value}")]
    InvalidDate { value: String },

    /// Referenced car does not exist.
    #[error("Car not found: {0}")]
    CarNotFound(String),

    /// Referenced garage does not exist.
    #[error("Garage not found: {0}")]
    GarageNotFound(String),

    /// The car is not assigned to the garage it is being booked into.
    ///
    /// Membership is an external fact owned by storage; the engine only
    /// queries it.
    #[error("Car {car_id} is not assigned to garage {garage_id}")]
    CarNotInGarage { car_id: String, garage_id: String },

    /// The target day has no capacity left at this garage.
    ///
    /// ## When This Occurs
    /// `capacity - booked <= 0` for the booking's calendar day. `booked` can
    /// exceed `capacity` when records were inserted out-of-band; the day then
    /// reports negative availability and keeps rejecting new bookings.
    #[error(
        "Garage {garage_id} is fully booked on {date}: capacity {capacity}, booked {booked}"
    )]
    CapacityExhausted {
        garage_id: String,
        date: NaiveDate,
        capacity: i64,
        booked: i64,
    },

    /// Field-level validation failed (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An injected storage capability failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request fields do not meet requirements.
/// Used for early validation before any storage is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (unexpected characters, bad shape).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Lookup Error
// =============================================================================

/// Opaque failure from an injected storage capability.
///
/// The engine never inspects the cause; it carries the message through so the
/// calling layer can log it and answer with a generic, non-leaking error.
#[derive(Debug, Error)]
#[error("Storage lookup failed: {0}")]
pub struct LookupError(String);

impl LookupError {
    /// Wraps a storage failure description.
    pub fn new(message: impl Into<String>) -> Self {
        LookupError(message.into())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ScheduleError.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScheduleError::CapacityExhausted {
            garage_id: "garage-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            capacity: 5,
            booked: 5,
        };
        assert_eq!(
            err.to_string(),
            "Garage garage-1 is fully booked on 2024-06-10: capacity 5, booked 5"
        );

        let err = ScheduleError::InvalidDate {
            value: "2024-13-01".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid date input: 2024-13-01");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "serviceType".to_string(),
        };
        assert_eq!(err.to_string(), "serviceType is required");

        let err = ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 0,
            max: 10_000,
        };
        assert_eq!(err.to_string(), "capacity must be between 0 and 10000");
    }

    #[test]
    fn test_validation_converts_to_schedule_error() {
        let validation_err = ValidationError::Required {
            field: "make".to_string(),
        };
        let err: ScheduleError = validation_err.into();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[test]
    fn test_lookup_error_is_opaque() {
        let err: ScheduleError = LookupError::new("connection reset").into();
        assert_eq!(err.to_string(), "Storage lookup failed: connection reset");
    }
}
