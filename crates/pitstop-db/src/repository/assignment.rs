//! # Assignment Repository
//!
//! Database operations for car/garage membership rows.
//!
//! ## Membership Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    garage_assignments                                   │
//! │                                                                         │
//! │  car-1 ──┬── garage-1        A car may be assigned to many garages,    │
//! │          └── garage-2        a garage serves many cars.                │
//! │  car-2 ──┬── garage-1                                                  │
//! │          │                   UNIQUE (car_id, garage_id): at most one   │
//! │  car-3 ──┘                   row per pair.                             │
//! │                                                                         │
//! │  The admission gate's membership check is one indexed COUNT over       │
//! │  this table.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Replacing a Car's Assignments
//! `set_car_garages` is delete-then-insert: clear the car's rows, then insert
//! the new set with at most [`ASSIGN_CONCURRENCY`] inserts in flight. The two
//! phases are not one transaction; a reader in between may see the car
//! unassigned.

use chrono::Utc;
use futures::stream::{self, TryStreamExt};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::ASSIGN_CONCURRENCY;

/// Repository for garage assignment database operations.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: SqlitePool,
}

impl AssignmentRepository {
    /// Creates a new AssignmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AssignmentRepository { pool }
    }

    /// Whether the car is currently assigned to the garage.
    pub async fn is_assigned(&self, car_id: &str, garage_id: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM garage_assignments
            WHERE car_id = ?1 AND garage_id = ?2
            "#,
        )
        .bind(car_id)
        .bind(garage_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// IDs of all garages the car is assigned to.
    pub async fn garages_for_car(&self, car_id: &str) -> DbResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT garage_id
            FROM garage_assignments
            WHERE car_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// IDs of all cars assigned to the garage.
    pub async fn cars_for_garage(&self, garage_id: &str) -> DbResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT car_id
            FROM garage_assignments
            WHERE garage_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(garage_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Assigns a car to a garage.
    ///
    /// Garage existence is not checked here; assignments may reference any
    /// ID. The membership check simply returns false for rows that were
    /// never created.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The pair is already assigned
    pub async fn assign(&self, car_id: &str, garage_id: &str) -> DbResult<()> {
        debug!(car_id = %car_id, garage_id = %garage_id, "Assigning car to garage");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO garage_assignments (id, car_id, garage_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(car_id)
        .bind(garage_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replaces the car's assignment set with the given garages.
    ///
    /// Delete-then-insert; inserts run with at most [`ASSIGN_CONCURRENCY`]
    /// in flight. The input is deduplicated so repeated IDs don't trip the
    /// UNIQUE index.
    pub async fn set_car_garages(&self, car_id: &str, garage_ids: &[String]) -> DbResult<()> {
        debug!(car_id = %car_id, count = garage_ids.len(), "Replacing car assignments");

        self.clear_car(car_id).await?;

        let mut unique = garage_ids.to_vec();
        unique.sort();
        unique.dedup();

        stream::iter(unique.into_iter().map(Ok::<_, DbError>))
            .try_for_each_concurrent(ASSIGN_CONCURRENCY, |garage_id| async move {
                self.assign(car_id, &garage_id).await
            })
            .await?;

        Ok(())
    }

    /// Removes all of the car's assignments. Returns the number removed.
    pub async fn clear_car(&self, car_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM garage_assignments WHERE car_id = ?1")
            .bind(car_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes all of the garage's assignments. Returns the number removed.
    pub async fn clear_garage(&self, garage_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM garage_assignments WHERE garage_id = ?1")
            .bind(garage_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_assign_and_is_assigned() {
        let db = test_db().await;
        let repo = db.assignments();

        assert!(!repo.is_assigned("car-1", "garage-1").await.unwrap());

        repo.assign("car-1", "garage-1").await.unwrap();
        assert!(repo.is_assigned("car-1", "garage-1").await.unwrap());
        assert!(!repo.is_assigned("car-1", "garage-2").await.unwrap());
        assert!(!repo.is_assigned("car-2", "garage-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_assignment_is_unique_violation() {
        let db = test_db().await;
        let repo = db.assignments();

        repo.assign("car-1", "garage-1").await.unwrap();
        let err = repo.assign("car-1", "garage-1").await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_set_car_garages_replaces_the_set() {
        let db = test_db().await;
        let repo = db.assignments();

        repo.assign("car-1", "garage-1").await.unwrap();
        repo.assign("car-1", "garage-2").await.unwrap();

        // Duplicated input IDs are tolerated
        repo.set_car_garages(
            "car-1",
            &[
                "garage-2".to_string(),
                "garage-3".to_string(),
                "garage-3".to_string(),
            ],
        )
        .await
        .unwrap();

        assert!(!repo.is_assigned("car-1", "garage-1").await.unwrap());
        assert!(repo.is_assigned("car-1", "garage-2").await.unwrap());
        assert!(repo.is_assigned("car-1", "garage-3").await.unwrap());

        let mut garages = repo.garages_for_car("car-1").await.unwrap();
        garages.sort();
        assert_eq!(garages, vec!["garage-2", "garage-3"]);

        // Empty set clears everything
        repo.set_car_garages("car-1", &[]).await.unwrap();
        assert!(repo.garages_for_car("car-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_car_and_clear_garage() {
        let db = test_db().await;
        let repo = db.assignments();

        repo.assign("car-1", "garage-1").await.unwrap();
        repo.assign("car-1", "garage-2").await.unwrap();
        repo.assign("car-2", "garage-1").await.unwrap();

        assert_eq!(repo.clear_car("car-1").await.unwrap(), 2);
        assert!(!repo.is_assigned("car-1", "garage-1").await.unwrap());
        assert!(repo.is_assigned("car-2", "garage-1").await.unwrap());

        assert_eq!(repo.clear_garage("garage-1").await.unwrap(), 1);
        assert!(!repo.is_assigned("car-2", "garage-1").await.unwrap());

        assert_eq!(repo.clear_car("unknown").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cars_for_garage() {
        let db = test_db().await;
        let repo = db.assignments();

        repo.assign("car-1", "garage-1").await.unwrap();
        repo.assign("car-2", "garage-1").await.unwrap();
        repo.assign("car-3", "garage-2").await.unwrap();

        let mut cars = repo.cars_for_garage("garage-1").await.unwrap();
        cars.sort();
        assert_eq!(cars, vec!["car-1", "car-2"]);
    }
}
