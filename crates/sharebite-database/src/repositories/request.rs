//! Food request repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use sharebite_core::error::{AppError, ErrorKind};
use sharebite_core::result::AppResult;
use sharebite_core::traits::RequestStore;
use sharebite_entity::request::{CreateFoodRequest, FoodRequest, RequestStatus};

/// Repository for food request records.
///
/// Requests are written exclusively through the reservation engine; the
/// analytics rollups at the bottom are read-only.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    /// Create a new request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of requests a user has made.
    pub async fn count_by_requester(&self, requester_email: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE requester_email = $1")
            .bind(requester_email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count requests", e))
    }

    /// Number of requests received against a donor's listings.
    pub async fn count_by_donor(&self, donor_email: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE donor_email = $1")
            .bind(donor_email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count received", e))
    }
}

#[async_trait]
impl RequestStore for RequestRepository {
    async fn insert(&self, record: &CreateFoodRequest) -> AppResult<FoodRequest> {
        sqlx::query_as::<_, FoodRequest>(
            "INSERT INTO requests (listing_id, food_name, image_url, location, expiration_date, \
                donor_email, donor_name, requester_email, requested_quantity, status, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(record.listing_id)
        .bind(&record.food_name)
        .bind(&record.image_url)
        .bind(&record.location)
        .bind(record.expiration_date)
        .bind(&record.donor_email)
        .bind(&record.donor_name)
        .bind(&record.requester_email)
        .bind(record.requested_quantity)
        .bind(RequestStatus::Pending)
        .bind(&record.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert request", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FoodRequest>> {
        sqlx::query_as::<_, FoodRequest>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch request", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete request", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_status(&self, id: Uuid, status: RequestStatus) -> AppResult<bool> {
        let result = sqlx::query("UPDATE requests SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update request status", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_requester(&self, requester_email: &str) -> AppResult<Vec<FoodRequest>> {
        sqlx::query_as::<_, FoodRequest>(
            "SELECT * FROM requests WHERE requester_email = $1 ORDER BY created_at DESC",
        )
        .bind(requester_email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list my requests", e))
    }

    async fn find_by_donor(&self, donor_email: &str) -> AppResult<Vec<FoodRequest>> {
        sqlx::query_as::<_, FoodRequest>(
            "SELECT * FROM requests WHERE donor_email = $1 ORDER BY created_at DESC",
        )
        .bind(donor_email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list received requests", e)
        })
    }

    async fn find_by_listing(&self, listing_id: Uuid) -> AppResult<Vec<FoodRequest>> {
        sqlx::query_as::<_, FoodRequest>(
            "SELECT * FROM requests WHERE listing_id = $1 ORDER BY created_at DESC",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list listing requests", e)
        })
    }
}
