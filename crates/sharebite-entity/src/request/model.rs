//! Food request entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::RequestStatus;
use crate::listing::Listing;

/// A requester's claim against a listing's quantity.
///
/// Display fields are denormalized from the listing at claim time so the
/// record stays renderable even if the listing is later deleted. The
/// `listing_id` reference may therefore dangle; cancellation handles that.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// The listing this request reserves quantity from.
    pub listing_id: Uuid,
    /// Denormalized food name.
    pub food_name: String,
    /// Denormalized image URL.
    pub image_url: Option<String>,
    /// Denormalized pickup location.
    pub location: Option<String>,
    /// Denormalized expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// Email of the donor, copied from the listing at claim time.
    pub donor_email: String,
    /// Display name of the donor.
    pub donor_name: Option<String>,
    /// Email of the requester.
    pub requester_email: String,
    /// Number of portions reserved by this request.
    pub requested_quantity: i32,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Free-text note from the requester.
    pub note: Option<String>,
    /// When the claim was made.
    pub created_at: DateTime<Utc>,
}

/// Data captured by a successful claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFoodRequest {
    /// The claimed listing.
    pub listing_id: Uuid,
    /// Denormalized food name.
    pub food_name: String,
    /// Denormalized image URL.
    pub image_url: Option<String>,
    /// Denormalized pickup location.
    pub location: Option<String>,
    /// Denormalized expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// Donor identity.
    pub donor_email: String,
    /// Donor display name.
    pub donor_name: Option<String>,
    /// Requester identity.
    pub requester_email: String,
    /// Portions reserved.
    pub requested_quantity: i32,
    /// Requester note.
    pub note: Option<String>,
}

impl CreateFoodRequest {
    /// Build the claim record for `quantity` portions of `listing`.
    pub fn for_claim(
        listing: &Listing,
        requester_email: &str,
        quantity: i32,
        note: Option<String>,
    ) -> Self {
        Self {
            listing_id: listing.id,
            food_name: listing.food_name.clone(),
            image_url: listing.image_url.clone(),
            location: listing.location.clone(),
            expiration_date: listing.expiration_date,
            donor_email: listing.donor_email.clone(),
            donor_name: listing.donor_name.clone(),
            requester_email: requester_email.to_string(),
            requested_quantity: quantity,
            note,
        }
    }
}
