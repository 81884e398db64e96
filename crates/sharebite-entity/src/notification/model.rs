//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::request::CreateFoodRequest;

/// Event type recorded when a claim is made against a listing.
pub const EVENT_FOOD_REQUESTED: &str = "food_requested";

/// A notification delivered to a user's in-app inbox.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Email of the recipient.
    pub recipient_email: String,
    /// Event type that triggered this notification.
    pub event_type: String,
    /// Human-readable message.
    pub message: String,
    /// The listing involved, if any.
    pub listing_id: Option<Uuid>,
    /// Denormalized food name for display.
    pub food_name: Option<String>,
    /// The requester who triggered the event, if any.
    pub requester_email: Option<String>,
    /// Portions involved in the triggering event.
    pub requested_quantity: Option<i32>,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a new notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// Recipient identity.
    pub recipient_email: String,
    /// Event type.
    pub event_type: String,
    /// Message body.
    pub message: String,
    /// Listing reference.
    pub listing_id: Option<Uuid>,
    /// Denormalized food name.
    pub food_name: Option<String>,
    /// Triggering requester.
    pub requester_email: Option<String>,
    /// Portions involved.
    pub requested_quantity: Option<i32>,
}

impl CreateNotification {
    /// Notification sent to the donor when a claim succeeds.
    pub fn food_requested(record: &CreateFoodRequest) -> Self {
        Self {
            recipient_email: record.donor_email.clone(),
            event_type: EVENT_FOOD_REQUESTED.to_string(),
            message: format!(
                "{} has requested {} portion(s) of your food: {}",
                record.requester_email, record.requested_quantity, record.food_name
            ),
            listing_id: Some(record.listing_id),
            food_name: Some(record.food_name.clone()),
            requester_email: Some(record.requester_email.clone()),
            requested_quantity: Some(record.requested_quantity),
        }
    }
}
