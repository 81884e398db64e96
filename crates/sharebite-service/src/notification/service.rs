//! Notification read-state bookkeeping.

use std::sync::Arc;

use uuid::Uuid;

use sharebite_core::error::AppError;
use sharebite_core::types::pagination::{PageRequest, PageResponse};
use sharebite_database::repositories::NotificationRepository;
use sharebite_entity::notification::Notification;

use crate::context::RequestContext;

/// Manages a recipient's notification inbox.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// Lists one page of the current user's notifications, newest first.
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        let items = self
            .notification_repo
            .find_by_recipient(&ctx.email, &page)
            .await?;
        let total = self
            .notification_repo
            .count_by_recipient(&ctx.email)
            .await?;
        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total.max(0) as u64,
        ))
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        self.notification_repo.count_unread(&ctx.email).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> Result<(), AppError> {
        if !self
            .notification_repo
            .mark_read(notification_id, &ctx.email)
            .await?
        {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Marks all notifications as read for the current user.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.notification_repo.mark_all_read(&ctx.email).await
    }

    /// Deletes a notification owned by the current user.
    pub async fn delete(&self, ctx: &RequestContext, notification_id: Uuid) -> Result<(), AppError> {
        if !self
            .notification_repo
            .delete(notification_id, &ctx.email)
            .await?
        {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }
}
