//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use sharebite_core::types::filter::{ListingFilter, ListingSort};
use sharebite_entity::listing::{CreateListing, UpdateListing};

/// Create listing request body.
///
/// The donor identity never comes from the body; it is taken from the
/// verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    /// Name of the food item.
    #[validate(length(min = 1, max = 255, message = "Food name is required"))]
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
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
}

impl CreateListingRequest {
    /// Converts to the entity-level create record. The donor fields are
    /// filled in by the service from the request context.
    pub fn into_create(self) -> CreateListing {
        CreateListing {
            donor_email: String::new(),
            donor_name: None,
            food_name: self.food_name,
            image_url: self.image_url,
            location: self.location,
            expiration_date: self.expiration_date,
            notes: self.notes,
            quantity: self.quantity,
        }
    }
}

/// Update listing request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateListingRequest {
    /// New food name.
    #[validate(length(min = 1, max = 255))]
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
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,
}

impl UpdateListingRequest {
    /// Converts to the entity-level update record.
    pub fn into_update(self) -> UpdateListing {
        UpdateListing {
            food_name: self.food_name,
            image_url: self.image_url,
            location: self.location,
            expiration_date: self.expiration_date,
            notes: self.notes,
            quantity: self.quantity,
        }
    }
}

/// Claim request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClaimRequest {
    /// Portions to reserve.
    #[validate(range(min = 1, message = "Requested quantity must be greater than 0"))]
    pub quantity: i32,
    /// Optional note from the requester.
    pub note: Option<String>,
}

/// Request status update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRequestStatusBody {
    /// Target status: pending, accepted, rejected, or completed.
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

/// Query parameters when browsing available listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowseQuery {
    /// Substring match on the food name.
    pub food_name: Option<String>,
    /// Substring match on the location.
    pub location: Option<String>,
    /// Minimum remaining quantity.
    pub min_quantity: Option<i32>,
    /// Maximum remaining quantity.
    pub max_quantity: Option<i32>,
    /// Earliest acceptable expiration date.
    pub start_date: Option<NaiveDate>,
    /// Latest acceptable expiration date.
    pub end_date: Option<NaiveDate>,
    /// Sort key; unknown keys fall back to the default.
    pub sort: Option<String>,
}

impl BrowseQuery {
    /// Converts to the core-level filter.
    pub fn into_filter(self) -> ListingFilter {
        let sort = self
            .sort
            .as_deref()
            .and_then(|s| s.parse::<ListingSort>().ok())
            .unwrap_or_default();

        ListingFilter {
            food_name: self.food_name,
            location: self.location,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
            start_date: self.start_date,
            end_date: self.end_date,
            sort,
        }
    }
}
