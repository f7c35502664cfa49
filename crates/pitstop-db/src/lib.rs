//! # pitstop-db: Database Layer for Pitstop
//!
//! This crate provides database access for the Pitstop booking system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pitstop Data Flow                                │
//! │                                                                         │
//! │  HTTP Handler (create_maintenance)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    pitstop-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (car.rs ...) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CarRepo       │    │ 001_init.sql │  │   │
//! │  │   │ Directory +   │◄───│ GarageRepo    │    │ ...          │  │   │
//! │  │   │ BookingLedger │    │ Maintenance   │    │              │  │   │
//! │  │   │ impls         │    │ Assignment    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./pitstop.db (WAL)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration, capability impls
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (car, garage, maintenance,
//!   assignment)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pitstop_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/db.sqlite");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let garages = db.garages().search_by_city("Sofia").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::assignment::AssignmentRepository;
pub use repository::car::CarRepository;
pub use repository::garage::GarageRepository;
pub use repository::maintenance::MaintenanceRepository;
