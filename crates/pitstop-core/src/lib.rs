//! # pitstop-core: Scheduling Engine for Pitstop
//!
//! This crate is the **heart** of Pitstop. It decides whether a maintenance
//! booking may be admitted against a garage's daily capacity, and it produces
//! the availability and monthly workload reports, all without performing any
//! I/O of its own.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pitstop Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    /cars ──► /garages ──► /maintenance ──► report endpoints    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pitstop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ calendar  │  │  report   │  │ admission │  │ validation│  │   │
//! │  │   │ DayBucket │  │ Occupancy │  │   gate    │  │   rules   │  │   │
//! │  │   │MonthBucket│  │ counting  │  │ sequence  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • NO LOGGING                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ Directory + BookingLedger traits       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pitstop-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`calendar`] - Day/month bucketing over date ranges, boundary parsing
//! - [`types`] - Domain types (Car, Garage, MaintenanceRequest, ...)
//! - [`report`] - Daily availability and monthly request reports
//! - [`admission`] - The pre-persist admission gate for bookings
//! - [`validation`] - Field-level input validation
//! - [`error`] - Scheduling and validation error types
//!
//! ## Design Principles
//!
//! 1. **Pure Computation**: bucketing and counting are deterministic functions
//!    of their inputs; buckets are recomputed per call, never cached
//! 2. **Injected Storage**: the admission gate reaches storage only through the
//!    [`admission::Directory`] and [`admission::BookingLedger`] traits
//! 3. **UTC Everywhere**: day and month boundaries are computed in UTC; the
//!    last counted instant of a day is 23:59:59.999
//! 4. **Explicit Errors**: every rejection is a typed [`ScheduleError`] variant,
//!    never a string or a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use pitstop_core::calendar::{self, chunk_to_days};
//!
//! let start = calendar::parse_date("2024-02-27").unwrap();
//! let end = calendar::parse_date("2024-03-01").unwrap();
//!
//! // 2024 is a leap year, so the range spans four days including Feb 29.
//! let days = chunk_to_days(start, end);
//! assert_eq!(days.len(), 4);
//! assert_eq!(days[2].date.to_string(), "2024-02-29");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod admission;
pub mod calendar;
pub mod error;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pitstop_core::DayBucket` instead of
// `use pitstop_core::calendar::DayBucket`

pub use admission::{Admission, AdmissionController, BookingLedger, BookingProposal, Directory};
pub use calendar::{chunk_to_days, chunk_to_months, DayBucket, MonthBucket};
pub use error::{LookupError, ScheduleError, ScheduleResult, ValidationError};
pub use report::{
    daily_availability_report, monthly_requests_report, DayOccupancy, MonthOccupancy,
};
pub use types::*;
