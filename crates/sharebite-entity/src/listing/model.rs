//! Listing entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ListingStatus;

/// A donor's published food item with a finite claimable quantity.
///
/// The descriptive fields are opaque to the reservation engine; only
/// `quantity` and `status` carry invariants (`status == Unavailable` iff
/// `quantity == 0`, and `quantity >= 0`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    /// Unique listing identifier.
    pub id: Uuid,
    /// Email of the donor who published the listing.
    pub donor_email: String,
    /// Display name of the donor.
    pub donor_name: Option<String>,
    /// Name of the food item.
    pub food_name: String,
    /// URL of the food image.
    pub image_url: Option<String>,
    /// Pickup location.
    pub location: Option<String>,
    /// Date after which the food should not be claimed.
    pub expiration_date: Option<NaiveDate>,
    /// Free-text notes from the donor.
    pub notes: Option<String>,
    /// Remaining claimable portions.
    pub quantity: i32,
    /// Availability status.
    pub status: ListingStatus,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Whether the listing still has claimable portions.
    pub fn is_available(&self) -> bool {
        self.status == ListingStatus::Available
    }
}

/// Data required to publish a new listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListing {
    /// Email of the publishing donor.
    pub donor_email: String,
    /// Display name of the donor.
    pub donor_name: Option<String>,
    /// Name of the food item.
    pub food_name: String,
    /// URL of the food image.
    pub image_url: Option<String>,
    /// Pickup location.
    pub location: Option<String>,
    /// Expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Initial number of portions.
    pub quantity: i32,
}

/// Donor-editable fields of an existing listing.
///
/// Quantity is included because the original owner may restock; the
/// reservation engine is still the only writer on the claim/cancel paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateListing {
    /// New food name.
    pub food_name: Option<String>,
    /// New image URL.
    pub image_url: Option<String>,
    /// New pickup location.
    pub location: Option<String>,
    /// New expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
    /// New portion count.
    pub quantity: Option<i32>,
}
