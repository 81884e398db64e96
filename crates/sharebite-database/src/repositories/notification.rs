//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use sharebite_core::error::{AppError, ErrorKind};
use sharebite_core::result::AppResult;
use sharebite_core::traits::NotificationSink;
use sharebite_core::types::pagination::PageRequest;
use sharebite_entity::notification::{CreateNotification, Notification};

/// Repository for notification CRUD operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of a recipient's notifications, newest first.
    pub async fn find_by_recipient(
        &self,
        recipient_email: &str,
        page: &PageRequest,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_email = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(recipient_email)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    /// Count all notifications for a recipient.
    pub async fn count_by_recipient(&self, recipient_email: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipient_email = $1")
            .bind(recipient_email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
            })
    }

    /// Count unread notifications for a recipient.
    pub async fn count_unread(&self, recipient_email: &str) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_email = $1 AND is_read = FALSE",
        )
        .bind(recipient_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    /// Mark a notification as read. Returns `true` if a row was updated.
    pub async fn mark_read(&self, id: Uuid, recipient_email: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND recipient_email = $2",
        )
        .bind(id)
        .bind(recipient_email)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all notifications as read for a recipient. Returns the count.
    pub async fn mark_all_read(&self, recipient_email: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE \
             WHERE recipient_email = $1 AND is_read = FALSE",
        )
        .bind(recipient_email)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    /// Delete a notification owned by the recipient.
    pub async fn delete(&self, id: Uuid, recipient_email: &str) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_email = $2")
                .bind(id)
                .bind(recipient_email)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NotificationSink for NotificationRepository {
    async fn insert(&self, record: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (recipient_email, event_type, message, listing_id, \
                food_name, requester_email, requested_quantity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&record.recipient_email)
        .bind(&record.event_type)
        .bind(&record.message)
        .bind(record.listing_id)
        .bind(&record.food_name)
        .bind(&record.requester_email)
        .bind(record.requested_quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert notification", e))
    }
}
