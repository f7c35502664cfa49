//! # Maintenance Repository
//!
//! Database operations for maintenance requests.
//!
//! ## Key Operations
//! - CRUD operations
//! - Inclusive range fetch for a garage (the admission gate's read)
//! - Denormalized detail reads (car make + garage name joined in)
//!
//! ## The Range Fetch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              for_garage_between(garage, start, end)                     │
//! │                                                                         │
//! │  scheduled_date BETWEEN start AND end   (both ends inclusive)          │
//! │                                                                         │
//! │  Callers pass bucket boundaries from pitstop-core::calendar:           │
//! │  - one day:   [2024-06-10 00:00:00.000, 2024-06-10 23:59:59.999]       │
//! │  - a report:  [range start day 00:00:00.000, end day 23:59:59.999]     │
//! │                                                                         │
//! │  Timestamps are stored in sqlx's fixed chrono TEXT encoding, so the    │
//! │  string BETWEEN compares chronologically.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pitstop_core::{MaintenanceDetails, MaintenanceRequest};

/// Repository for maintenance request database operations.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    pool: SqlitePool,
}

impl MaintenanceRepository {
    /// Creates a new MaintenanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MaintenanceRepository { pool }
    }

    /// Gets a maintenance request by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MaintenanceRequest>> {
        let request = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT id, car_id, garage_id, service_type, scheduled_date,
                   created_at, updated_at
            FROM maintenance_requests
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Gets a maintenance request decorated with car make and garage name.
    ///
    /// LEFT JOINs keep the row visible when the car or garage has since been
    /// deleted; the decoration fields come back as `None`.
    pub async fn get_details(&self, id: &str) -> DbResult<Option<MaintenanceDetails>> {
        let details = sqlx::query_as::<_, MaintenanceDetails>(
            r#"
            SELECT m.id, m.car_id, c.make AS car_make,
                   m.garage_id, g.name AS garage_name,
                   m.service_type, m.scheduled_date
            FROM maintenance_requests m
            LEFT JOIN cars c ON c.id = m.car_id
            LEFT JOIN garages g ON g.id = m.garage_id
            WHERE m.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    /// All of a garage's requests with `scheduled_date` in `[start, end]`,
    /// both ends inclusive, in chronological order.
    ///
    /// This is the read behind the admission gate (single-day bounds) and
    /// the report endpoints (whole-range bounds).
    pub async fn for_garage_between(
        &self,
        garage_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<MaintenanceRequest>> {
        debug!(garage_id = %garage_id, %start, %end, "Fetching garage bookings");

        let requests = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT id, car_id, garage_id, service_type, scheduled_date,
                   created_at, updated_at
            FROM maintenance_requests
            WHERE garage_id = ?1
              AND scheduled_date BETWEEN ?2 AND ?3
            ORDER BY scheduled_date
            "#,
        )
        .bind(garage_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Searches maintenance requests by car, garage, and date range, all
    /// filters required, returning decorated detail rows.
    pub async fn search(
        &self,
        car_id: &str,
        garage_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<MaintenanceDetails>> {
        debug!(car_id = %car_id, garage_id = %garage_id, %start, %end, "Searching maintenance");

        let details = sqlx::query_as::<_, MaintenanceDetails>(
            r#"
            SELECT m.id, m.car_id, c.make AS car_make,
                   m.garage_id, g.name AS garage_name,
                   m.service_type, m.scheduled_date
            FROM maintenance_requests m
            LEFT JOIN cars c ON c.id = m.car_id
            LEFT JOIN garages g ON g.id = m.garage_id
            WHERE m.car_id = ?1
              AND m.garage_id = ?2
              AND m.scheduled_date BETWEEN ?3 AND ?4
            ORDER BY m.scheduled_date
            "#,
        )
        .bind(car_id)
        .bind(garage_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = details.len(), "Maintenance search returned rows");
        Ok(details)
    }

    /// Inserts a new maintenance request.
    ///
    /// Capacity checks happen before this call (the admission gate); the
    /// insert itself is unconditional.
    pub async fn insert(&self, request: &MaintenanceRequest) -> DbResult<()> {
        debug!(
            id = %request.id,
            garage_id = %request.garage_id,
            scheduled = %request.scheduled_date,
            "Inserting maintenance request"
        );

        sqlx::query(
            r#"
            INSERT INTO maintenance_requests (
                id, car_id, garage_id, service_type, scheduled_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&request.id)
        .bind(&request.car_id)
        .bind(&request.garage_id)
        .bind(&request.service_type)
        .bind(request.scheduled_date)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing maintenance request.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Request doesn't exist
    pub async fn update(&self, request: &MaintenanceRequest) -> DbResult<()> {
        debug!(id = %request.id, "Updating maintenance request");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE maintenance_requests SET
                car_id = ?2,
                garage_id = ?3,
                service_type = ?4,
                scheduled_date = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&request.id)
        .bind(&request.car_id)
        .bind(&request.garage_id)
        .bind(&request.service_type)
        .bind(request.scheduled_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Maintenance request", &request.id));
        }

        Ok(())
    }

    /// Deletes a maintenance request.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting maintenance request");

        let result = sqlx::query("DELETE FROM maintenance_requests WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Maintenance request", id));
        }

        Ok(())
    }

    /// Counts total maintenance requests (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_requests")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new maintenance request ID.
pub fn generate_maintenance_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
