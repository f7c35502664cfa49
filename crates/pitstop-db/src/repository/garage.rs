//! # Garage Repository
//!
//! Database operations for garages.
//!
//! ## Key Operations
//! - CRUD operations
//! - City search
//! - Bulk fetch by ID list (chunked)
//!
//! ## Chunked Bulk Fetch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    get_by_ids Chunking                                  │
//! │                                                                         │
//! │  45 garage IDs requested                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Chunk 1: IN (?1..?20)  ──► 20 rows                                    │
//! │  Chunk 2: IN (?1..?20)  ──► 20 rows                                    │
//! │  Chunk 3: IN (?1..?5)   ──►  5 rows                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Concatenated result (unknown IDs silently skipped)                    │
//! │                                                                         │
//! │  Bound-parameter count stays small and predictable regardless of       │
//! │  how many garages a car is assigned to.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::ID_CHUNK_SIZE;
use pitstop_core::Garage;

/// Repository for garage database operations.
#[derive(Debug, Clone)]
pub struct GarageRepository {
    pool: SqlitePool,
}

impl GarageRepository {
    /// Creates a new GarageRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GarageRepository { pool }
    }

    /// Gets a garage by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Garage))` - Garage found
    /// * `Ok(None)` - Garage not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Garage>> {
        let garage = sqlx::query_as::<_, Garage>(
            r#"
            SELECT id, name, location, city, capacity, created_at, updated_at
            FROM garages
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(garage)
    }

    /// Gets garages for a list of IDs, in chunks of [`ID_CHUNK_SIZE`].
    ///
    /// IDs with no matching row are skipped; the result may be shorter than
    /// the input. Duplicated input IDs produce one row.
    pub async fn get_by_ids(&self, ids: &[String]) -> DbResult<Vec<Garage>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = ids.len(), "Bulk-fetching garages");

        let mut garages = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let placeholders = (1..=chunk.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT id, name, location, city, capacity, created_at, updated_at \
                 FROM garages WHERE id IN ({placeholders})"
            );

            let mut query = sqlx::query_as::<_, Garage>(&sql);
            for id in chunk {
                query = query.bind(id);
            }

            let mut rows = query.fetch_all(&self.pool).await?;
            garages.append(&mut rows);
        }

        Ok(garages)
    }

    /// Searches garages by city (exact match).
    pub async fn search_by_city(&self, city: &str) -> DbResult<Vec<Garage>> {
        debug!(city = %city, "Searching garages by city");

        let garages = sqlx::query_as::<_, Garage>(
            r#"
            SELECT id, name, location, city, capacity, created_at, updated_at
            FROM garages
            WHERE city = ?1
            ORDER BY name
            "#,
        )
        .bind(city)
        .fetch_all(&self.pool)
        .await?;

        Ok(garages)
    }

    /// Inserts a new garage.
    pub async fn insert(&self, garage: &Garage) -> DbResult<()> {
        debug!(id = %garage.id, name = %garage.name, "Inserting garage");

        sqlx::query(
            r#"
            INSERT INTO garages (
                id, name, location, city, capacity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&garage.id)
        .bind(&garage.name)
        .bind(&garage.location)
        .bind(&garage.city)
        .bind(garage.capacity)
        .bind(garage.created_at)
        .bind(garage.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing garage.
    ///
    /// Capacity changes apply to future admission checks only; existing
    /// bookings are never revisited.
    pub async fn update(&self, garage: &Garage) -> DbResult<()> {
        debug!(id = %garage.id, "Updating garage");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE garages SET
                name = ?2,
                location = ?3,
                city = ?4,
                capacity = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&garage.id)
        .bind(&garage.name)
        .bind(&garage.location)
        .bind(&garage.city)
        .bind(garage.capacity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Garage", &garage.id));
        }

        Ok(())
    }

    /// Deletes a garage.
    ///
    /// Assignment cleanup is the caller's job (see
    /// `AssignmentRepository::clear_garage`); maintenance history is kept.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting garage");

        let result = sqlx::query("DELETE FROM garages WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Garage", id));
        }

        Ok(())
    }

    /// Counts total garages (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM garages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new garage ID.
pub fn generate_garage_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_garage(id: &str, city: &str, capacity: i64) -> Garage {
        let now = Utc::now();
        Garage {
            id: id.to_string(),
            name: format!("Garage {id}"),
            location: "12 Main St".to_string(),
            city: city.to_string(),
            capacity,
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
        let repo = db.garages();

        repo.insert(&sample_garage("garage-1", "Sofia", 10)).await.unwrap();

        let found = repo.get_by_id("garage-1").await.unwrap().unwrap();
        assert_eq!(found.city, "Sofia");
        assert_eq!(found.capacity, 10);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_by_city() {
        let db = test_db().await;
        let repo = db.garages();

        repo.insert(&sample_garage("garage-1", "Sofia", 10)).await.unwrap();
        repo.insert(&sample_garage("garage-2", "Plovdiv", 5)).await.unwrap();
        repo.insert(&sample_garage("garage-3", "Sofia", 3)).await.unwrap();

        let hits = repo.search_by_city("Sofia").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|g| g.city == "Sofia"));

        assert!(repo.search_by_city("Varna").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_ids_chunks_large_lists() {
        let db = test_db().await;
        let repo = db.garages();

        // More than two chunks' worth
        let mut ids = Vec::new();
        for i in 0..45 {
            let id = format!("garage-{i}");
            repo.insert(&sample_garage(&id, "Sofia", 5)).await.unwrap();
            ids.push(id);
        }
        // Unknown IDs are skipped, not errors
        ids.push("missing".to_string());

        let garages = repo.get_by_ids(&ids).await.unwrap();
        assert_eq!(garages.len(), 45);

        assert!(repo.get_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let repo = db.garages();

        repo.insert(&sample_garage("garage-1", "Sofia", 10)).await.unwrap();

        let mut garage = repo.get_by_id("garage-1").await.unwrap().unwrap();
        garage.capacity = 2;
        repo.update(&garage).await.unwrap();
        assert_eq!(repo.get_by_id("garage-1").await.unwrap().unwrap().capacity, 2);

        repo.delete("garage-1").await.unwrap();
        assert!(repo.get_by_id("garage-1").await.unwrap().is_none());

        assert!(matches!(
            repo.update(&garage).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            repo.delete("garage-1").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
