//! # Repository Module
//!
//! Database repository implementations for Pitstop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.garages().search_by_city("Sofia")                          │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  GarageRepository                                                      │
//! │  ├── search_by_city(&self, city)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, garage)                                             │
//! │  └── update(&self, garage)                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • Repository tests run against in-memory SQLite                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`car::CarRepository`] - Car CRUD and filtered search
//! - [`garage::GarageRepository`] - Garage CRUD, city search, bulk fetch
//! - [`maintenance::MaintenanceRepository`] - Booking CRUD, range fetch,
//!   detail joins
//! - [`assignment::AssignmentRepository`] - Car/garage membership rows

pub mod assignment;
pub mod car;
pub mod garage;
pub mod maintenance;

/// Upper bound on concurrent assignment inserts in
/// [`assignment::AssignmentRepository::set_car_garages`].
pub const ASSIGN_CONCURRENCY: usize = 5;

/// Ids-per-query chunk size for bulk fetches such as
/// [`garage::GarageRepository::get_by_ids`]. Keeps the bound-parameter count
/// well under SQLite's limit.
pub const ID_CHUNK_SIZE: usize = 20;
