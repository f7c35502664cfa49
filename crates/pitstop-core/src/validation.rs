//! # Validation Module
//!
//! Input validation utilities for Pitstop.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (axum)                                                   │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Missing / mistyped fields rejected before handlers run            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Handler (Rust)                                               │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE constraints                                                │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use pitstop_core::validation::{validate_capacity, validate_license_plate};
//!
//! // Validate capacity before garage insert
//! validate_capacity(10).unwrap();
//!
//! // Validate plate before car insert
//! validate_license_plate("CA-1234-XP").unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Car Validators
// =============================================================================

/// Validates a car make.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
pub fn validate_make(make: &str) -> ValidationResult<()> {
    let make = make.trim();

    if make.is_empty() {
        return Err(ValidationError::Required {
            field: "make".to_string(),
        });
    }

    if make.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "make".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a car model.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
pub fn validate_model(model: &str) -> ValidationResult<()> {
    let model = model.trim();

    if model.is_empty() {
        return Err(ValidationError::Required {
            field: "model".to_string(),
        });
    }

    if model.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "model".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a license plate.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 20 characters
/// - Should contain only alphanumeric characters, hyphens, spaces
///
/// ## Example
/// ```rust
/// use pitstop_core::validation::validate_license_plate;
///
/// assert!(validate_license_plate("CA-1234-XP").is_ok());
/// assert!(validate_license_plate("").is_err());
/// assert!(validate_license_plate("CA_1234").is_err());
/// ```
pub fn validate_license_plate(plate: &str) -> ValidationResult<()> {
    let plate = plate.trim();

    if plate.is_empty() {
        return Err(ValidationError::Required {
            field: "licensePlate".to_string(),
        });
    }

    if plate.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "licensePlate".to_string(),
            max: 20,
        });
    }

    // Check for valid characters (alphanumeric, hyphen, space)
    if !plate
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "licensePlate".to_string(),
            reason: "must contain only letters, numbers, hyphens, and spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a car production year.
///
/// ## Rules
/// - Must be between 1886 (the Benz Patent-Motorwagen) and 2100
///
/// ## Example
/// ```rust
/// use pitstop_core::validation::validate_production_year;
///
/// assert!(validate_production_year(2018).is_ok());
/// assert!(validate_production_year(1700).is_err());
/// ```
pub fn validate_production_year(year: i64) -> ValidationResult<()> {
    if !(1886..=2100).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "productionYear".to_string(),
            min: 1886,
            max: 2100,
        });
    }

    Ok(())
}

// =============================================================================
// Garage Validators
// =============================================================================

/// Validates a garage name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 100 characters
pub fn validate_garage_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a garage street location.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_location(location: &str) -> ValidationResult<()> {
    let location = location.trim();

    if location.is_empty() {
        return Err(ValidationError::Required {
            field: "location".to_string(),
        });
    }

    if location.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "location".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a garage city.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 100 characters
pub fn validate_city(city: &str) -> ValidationResult<()> {
    let city = city.trim();

    if city.is_empty() {
        return Err(ValidationError::Required {
            field: "city".to_string(),
        });
    }

    if city.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "city".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a garage's daily capacity.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (a garage that accepts no bookings)
///
/// ## Example
/// ```rust
/// use pitstop_core::validation::validate_capacity;
///
/// assert!(validate_capacity(10).is_ok());
/// assert!(validate_capacity(0).is_ok());
/// assert!(validate_capacity(-1).is_err());
/// ```
pub fn validate_capacity(capacity: i64) -> ValidationResult<()> {
    if capacity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Maintenance Validators
// =============================================================================

/// Validates a maintenance service type description.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 100 characters
pub fn validate_service_type(service_type: &str) -> ValidationResult<()> {
    let service_type = service_type.trim();

    if service_type.is_empty() {
        return Err(ValidationError::Required {
            field: "serviceType".to_string(),
        });
    }

    if service_type.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "serviceType".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Query Validators
// =============================================================================

/// Validates a search filter term (car make/model, garage city).
///
/// ## Rules
/// - Can be empty (filter not applied)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed term.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(term.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
