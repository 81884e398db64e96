//! Listing repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use sharebite_core::error::{AppError, ErrorKind};
use sharebite_core::result::AppResult;
use sharebite_core::traits::ListingStore;
use sharebite_core::types::filter::{ListingFilter, ListingSort};
use sharebite_entity::listing::{CreateListing, Listing, ListingStatus, UpdateListing};

/// Number of listings returned by the featured query.
const FEATURED_LIMIT: i64 = 6;

/// Repository for listing CRUD and the quantity mutations of the
/// reservation engine.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: PgPool,
}

impl ListingRepository {
    /// Create a new listing repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Publish a new listing.
    pub async fn create(&self, listing: &CreateListing) -> AppResult<Listing> {
        let status = ListingStatus::for_quantity(listing.quantity);
        sqlx::query_as::<_, Listing>(
            "INSERT INTO listings (donor_email, donor_name, food_name, image_url, location, expiration_date, notes, quantity, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&listing.donor_email)
        .bind(&listing.donor_name)
        .bind(&listing.food_name)
        .bind(&listing.image_url)
        .bind(&listing.location)
        .bind(listing.expiration_date)
        .bind(&listing.notes)
        .bind(listing.quantity)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create listing", e))
    }

    /// Update the donor-editable fields of a listing.
    ///
    /// When the quantity is edited the status is recomputed in the same
    /// statement so the quantity/status invariant holds.
    pub async fn update(&self, id: Uuid, update: &UpdateListing) -> AppResult<Option<Listing>> {
        sqlx::query_as::<_, Listing>(
            "UPDATE listings SET \
                food_name = COALESCE($2, food_name), \
                image_url = COALESCE($3, image_url), \
                location = COALESCE($4, location), \
                expiration_date = COALESCE($5, expiration_date), \
                notes = COALESCE($6, notes), \
                quantity = COALESCE($7, quantity), \
                status = CASE WHEN COALESCE($7, quantity) = 0 \
                    THEN 'unavailable'::listing_status \
                    ELSE 'available'::listing_status END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.food_name)
        .bind(&update.image_url)
        .bind(&update.location)
        .bind(update.expiration_date)
        .bind(&update.notes)
        .bind(update.quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update listing", e))
    }

    /// Delete a listing. Returns `true` if a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete listing", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// All listings published by a donor.
    pub async fn find_by_donor(&self, donor_email: &str) -> AppResult<Vec<Listing>> {
        sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE donor_email = $1 ORDER BY created_at DESC",
        )
        .bind(donor_email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list donor foods", e))
    }

    /// Browse available listings with filters and sort order.
    pub async fn find_available(&self, filter: &ListingFilter) -> AppResult<Vec<Listing>> {
        let mut query = QueryBuilder::new("SELECT * FROM listings WHERE status = ");
        query.push_bind(ListingStatus::Available);

        if let Some(food_name) = &filter.food_name {
            query.push(" AND food_name ILIKE ");
            query.push_bind(format!("%{food_name}%"));
        }
        if let Some(location) = &filter.location {
            query.push(" AND location ILIKE ");
            query.push_bind(format!("%{location}%"));
        }
        if let Some(min) = filter.min_quantity {
            query.push(" AND quantity >= ");
            query.push_bind(min);
        }
        if let Some(max) = filter.max_quantity {
            query.push(" AND quantity <= ");
            query.push_bind(max);
        }
        if let Some(start) = filter.start_date {
            query.push(" AND expiration_date >= ");
            query.push_bind(start);
        }
        if let Some(end) = filter.end_date {
            query.push(" AND expiration_date <= ");
            query.push_bind(end);
        }

        query.push(match filter.sort {
            ListingSort::ExpiryNearest => " ORDER BY expiration_date ASC NULLS LAST",
            ListingSort::ExpiryFarthest => " ORDER BY expiration_date DESC NULLS LAST",
            ListingSort::QuantityHigh => " ORDER BY quantity DESC",
            ListingSort::QuantityLow => " ORDER BY quantity ASC",
            ListingSort::NameAsc => " ORDER BY food_name ASC",
            ListingSort::NameDesc => " ORDER BY food_name DESC",
        });

        query
            .build_query_as::<Listing>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to browse listings", e))
    }

    /// The available listings with the most portions remaining.
    pub async fn find_featured(&self) -> AppResult<Vec<Listing>> {
        sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE status = $1 ORDER BY quantity DESC LIMIT $2",
        )
        .bind(ListingStatus::Available)
        .bind(FEATURED_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list featured", e))
    }

    // ── Analytics rollups ────────────────────────────────────────

    /// Number of listings a donor has published.
    pub async fn count_by_donor(&self, donor_email: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE donor_email = $1")
            .bind(donor_email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count listings", e))
    }

    /// Number of currently available listings from a donor.
    pub async fn count_available_by_donor(&self, donor_email: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE donor_email = $1 AND status = $2")
            .bind(donor_email)
            .bind(ListingStatus::Available)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count available", e))
    }

    /// Total portions a donor has published across all listings.
    pub async fn total_quantity_by_donor(&self, donor_email: &str) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM listings WHERE donor_email = $1",
        )
        .bind(donor_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sum quantity", e))
    }

    /// Total number of listings in the system.
    pub async fn count_all(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM listings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count listings", e))
    }

    /// Total number of available listings in the system.
    pub async fn count_available(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE status = $1")
            .bind(ListingStatus::Available)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count available", e))
    }

    /// Donors ranked by number of listings published.
    pub async fn top_donors(&self, limit: i64) -> AppResult<Vec<(String, Option<String>, i64)>> {
        sqlx::query_as(
            "SELECT donor_email, MIN(donor_name), COUNT(*) FROM listings \
             GROUP BY donor_email ORDER BY COUNT(*) DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rank donors", e))
    }

    /// Locations ranked by number of listings.
    pub async fn listings_by_location(&self, limit: i64) -> AppResult<Vec<(Option<String>, i64)>> {
        sqlx::query_as(
            "SELECT location, COUNT(*) FROM listings \
             GROUP BY location ORDER BY COUNT(*) DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to group by location", e))
    }
}

#[async_trait]
impl ListingStore for ListingRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch listing", e))
    }

    async fn try_reserve(
        &self,
        id: Uuid,
        expected_quantity: i32,
        new_quantity: i32,
    ) -> AppResult<bool> {
        // The quantity guard makes this a compare-and-swap: a concurrent
        // claim that committed first changes the quantity and fails the
        // WHERE clause, so at most one writer wins per observed value.
        let result = sqlx::query(
            "UPDATE listings SET quantity = $3, status = $4, updated_at = NOW() \
             WHERE id = $1 AND quantity = $2",
        )
        .bind(id)
        .bind(expected_quantity)
        .bind(new_quantity)
        .bind(ListingStatus::for_quantity(new_quantity))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reserve quantity", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn release(&self, id: Uuid, amount: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE listings SET quantity = quantity + $2, status = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .bind(ListingStatus::Available)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release quantity", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn withdraw(&self, id: Uuid, amount: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE listings SET quantity = GREATEST(quantity - $2, 0), \
                status = CASE WHEN GREATEST(quantity - $2, 0) = 0 \
                    THEN 'unavailable'::listing_status \
                    ELSE 'available'::listing_status END, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to withdraw quantity", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
