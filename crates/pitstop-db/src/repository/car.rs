//! # Car Repository
//!
//! Database operations for cars.
//!
//! ## Key Operations
//! - CRUD operations
//! - Filtered search (make + garage + production year range)
//!
//! ## Search Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Car Search Works                                 │
//! │                                                                         │
//! │  Filters: make="Hyundai", garageId=G1, fromYear=2015, toYear=2020      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cars INNER JOIN garage_assignments                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ Hyundai Accent  2018  assigned to G1   │ ← MATCH!                  │
//! │  │ Hyundai i30     2013  assigned to G1   │   (year out of range)     │
//! │  │ Hyundai Accent  2018  assigned to G2   │   (wrong garage)          │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  All four filters are required; the year range bounds                  │
//! │  production_year on both ends.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pitstop_core::Car;

/// Repository for car database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CarRepository::new(pool);
///
/// let car = repo.get_by_id("uuid-here").await?;
/// let hits = repo.search("Hyundai", "garage-id", 2015, 2020).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CarRepository {
    pool: SqlitePool,
}

impl CarRepository {
    /// Creates a new CarRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CarRepository { pool }
    }

    /// Gets a car by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Car))` - Car found
    /// * `Ok(None)` - Car not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            SELECT id, make, model, production_year, license_plate,
                   created_at, updated_at
            FROM cars
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(car)
    }

    /// Searches cars by make, assigned garage, and production year range.
    ///
    /// All four filters are required and ANDed together. Cars with no
    /// garage assignment never match (INNER JOIN).
    pub async fn search(
        &self,
        make: &str,
        garage_id: &str,
        from_year: i64,
        to_year: i64,
    ) -> DbResult<Vec<Car>> {
        debug!(
            make = %make,
            garage_id = %garage_id,
            from_year,
            to_year,
            "Searching cars"
        );

        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT c.id, c.make, c.model, c.production_year, c.license_plate,
                   c.created_at, c.updated_at
            FROM cars c
            INNER JOIN garage_assignments ga ON ga.car_id = c.id
            WHERE c.make = ?1
              AND ga.garage_id = ?2
              AND c.production_year >= ?3
              AND c.production_year <= ?4
            ORDER BY c.production_year, c.model
            "#,
        )
        .bind(make)
        .bind(garage_id)
        .bind(from_year)
        .bind(to_year)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = cars.len(), "Car search returned rows");
        Ok(cars)
    }

    /// Inserts a new car.
    pub async fn insert(&self, car: &Car) -> DbResult<()> {
        debug!(id = %car.id, make = %car.make, "Inserting car");

        sqlx::query(
            r#"
            INSERT INTO cars (
                id, make, model, production_year, license_plate,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&car.id)
        .bind(&car.make)
        .bind(&car.model)
        .bind(car.production_year)
        .bind(&car.license_plate)
        .bind(car.created_at)
        .bind(car.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing car.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Car doesn't exist
    pub async fn update(&self, car: &Car) -> DbResult<()> {
        debug!(id = %car.id, "Updating car");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                make = ?2,
                model = ?3,
                production_year = ?4,
                license_plate = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&car.id)
        .bind(&car.make)
        .bind(&car.model)
        .bind(car.production_year)
        .bind(&car.license_plate)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", &car.id));
        }

        Ok(())
    }

    /// Deletes a car.
    ///
    /// Assignment cleanup is the caller's job (see
    /// `AssignmentRepository::clear_car`); maintenance history is kept.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting car");

        let result = sqlx::query("DELETE FROM cars WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }

        Ok(())
    }

    /// Counts total cars (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new car ID.
pub fn generate_car_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::assignment::AssignmentRepository;

    fn sample_car(id: &str, make: &str, year: i64) -> Car {
        let now = Utc::now();
        Car {
            id: id.to_string(),
            make: make.to_string(),
            model: "Accent".to_string(),
            production_year: year,
            license_plate: "CA-1234-XP".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.cars();

        repo.insert(&sample_car("car-1", "Hyundai", 2018)).await.unwrap();

        let found = repo.get_by_id("car-1").await.unwrap().unwrap();
        assert_eq!(found.make, "Hyundai");
        assert_eq!(found.production_year, 2018);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update() {
        let db = test_db().await;
        let repo = db.cars();

        repo.insert(&sample_car("car-1", "Hyundai", 2018)).await.unwrap();

        let mut car = repo.get_by_id("car-1").await.unwrap().unwrap();
        car.model = "i30".to_string();
        car.production_year = 2020;
        repo.update(&car).await.unwrap();

        let found = repo.get_by_id("car-1").await.unwrap().unwrap();
        assert_eq!(found.model, "i30");
        assert_eq!(found.production_year, 2020);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;

        let err = db.cars().update(&sample_car("ghost", "VW", 2015)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.cars();

        repo.insert(&sample_car("car-1", "Hyundai", 2018)).await.unwrap();
        repo.delete("car-1").await.unwrap();

        assert!(repo.get_by_id("car-1").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("car-1").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_search_applies_all_filters() {
        let db = test_db().await;
        let cars = db.cars();
        let assignments = AssignmentRepository::new(db.pool().clone());

        cars.insert(&sample_car("car-1", "Hyundai", 2018)).await.unwrap();
        cars.insert(&sample_car("car-2", "Hyundai", 2013)).await.unwrap();
        cars.insert(&sample_car("car-3", "Toyota", 2018)).await.unwrap();
        cars.insert(&sample_car("car-4", "Hyundai", 2018)).await.unwrap();

        assignments.assign("car-1", "garage-1").await.unwrap();
        assignments.assign("car-2", "garage-1").await.unwrap();
        assignments.assign("car-3", "garage-1").await.unwrap();
        // car-4 is in a different garage
        assignments.assign("car-4", "garage-2").await.unwrap();

        let hits = cars.search("Hyundai", "garage-1", 2015, 2020).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "car-1");
    }

    #[tokio::test]
    async fn test_search_year_bounds_are_inclusive() {
        let db = test_db().await;
        let cars = db.cars();
        let assignments = AssignmentRepository::new(db.pool().clone());

        cars.insert(&sample_car("car-1", "Hyundai", 2015)).await.unwrap();
        cars.insert(&sample_car("car-2", "Hyundai", 2020)).await.unwrap();
        assignments.assign("car-1", "garage-1").await.unwrap();
        assignments.assign("car-2", "garage-1").await.unwrap();

        let hits = cars.search("Hyundai", "garage-1", 2015, 2020).await.unwrap();
        assert_eq!(hits.len(), 2);
    }
}
