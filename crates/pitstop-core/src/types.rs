//! # Domain Types
//!
//! Core domain types used throughout Pitstop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │      Car        │   │     Garage      │   │ MaintenanceRequest  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)          │   │
//! │  │  make           │   │  name           │   │  car_id (FK)        │   │
//! │  │  model          │   │  location       │   │  garage_id (FK)     │   │
//! │  │  production_year│   │  city           │   │  service_type       │   │
//! │  │  license_plate  │   │  capacity       │   │  scheduled_date     │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  Garage.capacity is a static ceiling on bookings per calendar day.     │
//! │  It is never reconciled against historical bookings.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `MaintenanceDetails` is the read model: a request decorated with its car's
//! make and its garage's name by the persistence layer's read-side join. The
//! engine treats those as plain, already-denormalized fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Car
// =============================================================================

/// A vehicle registered with the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Car {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Manufacturer name.
    pub make: String,

    /// Model name.
    pub model: String,

    /// Year the vehicle was produced.
    pub production_year: i64,

    /// Registration plate.
    pub license_plate: String,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Garage
// =============================================================================

/// A service garage with a fixed daily booking capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Garage {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Street address.
    pub location: String,

    /// City, used for search.
    pub city: String,

    /// Maximum bookings this garage can service per calendar day.
    /// Non-negative; never adjusted retroactively when days overrun it.
    pub capacity: i64,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Maintenance Request
// =============================================================================

/// A maintenance booking for one car at one garage on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MaintenanceRequest {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The booked car.
    pub car_id: String,

    /// The garage performing the service.
    pub garage_id: String,

    /// Free-form description of the work ("Oil change", ...).
    pub service_type: String,

    /// The booked instant, UTC. Determines the request's calendar-day bucket.
    pub scheduled_date: DateTime<Utc>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceRequest {
    /// The calendar day this request occupies.
    #[inline]
    pub fn scheduled_day(&self) -> NaiveDate {
        self.scheduled_date.date_naive()
    }
}

// =============================================================================
// Maintenance Details (read model)
// =============================================================================

/// A maintenance request decorated with car and garage display fields.
///
/// Produced by the persistence layer's read-side join; the decorating fields
/// are `None` when the referenced row no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MaintenanceDetails {
    pub id: String,
    pub car_id: String,
    /// The car's make, joined in for display.
    pub car_make: Option<String>,
    pub garage_id: String,
    /// The garage's name, joined in for display.
    pub garage_name: Option<String>,
    pub service_type: String,
    pub scheduled_date: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_day_truncates_to_date() {
        let request = MaintenanceRequest {
            id: "m1".to_string(),
            car_id: "c1".to_string(),
            garage_id: "g1".to_string(),
            service_type: "Oil change".to_string(),
            scheduled_date: NaiveDate::from_ymd_opt(2024, 6, 10)
                .unwrap()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap()
                .and_utc(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(
            request.scheduled_day(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
    }
}
