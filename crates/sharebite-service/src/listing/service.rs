//! Listing CRUD service.
//!
//! Field-level CRUD on listings, outside the reservation core except for
//! the quantity/status invariant, which the repository keeps when the
//! donor edits the quantity.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use sharebite_core::error::AppError;
use sharebite_core::traits::ListingStore;
use sharebite_core::types::filter::ListingFilter;
use sharebite_database::repositories::ListingRepository;
use sharebite_entity::listing::{CreateListing, Listing, UpdateListing};

use crate::context::RequestContext;

/// Manages listing publication, editing, and browsing.
#[derive(Debug, Clone)]
pub struct ListingService {
    /// Listing repository.
    listing_repo: Arc<ListingRepository>,
}

impl ListingService {
    /// Creates a new listing service.
    pub fn new(listing_repo: Arc<ListingRepository>) -> Self {
        Self { listing_repo }
    }

    /// Publish a new listing for the caller.
    pub async fn create_listing(
        &self,
        ctx: &RequestContext,
        mut listing: CreateListing,
    ) -> Result<Listing, AppError> {
        if listing.quantity < 0 {
            return Err(AppError::validation("Quantity must not be negative"));
        }

        // The donor identity comes from the verified principal, never
        // from the request body.
        listing.donor_email = ctx.email.clone();
        if listing.donor_name.is_none() {
            listing.donor_name = ctx.display_name.clone();
        }

        let created = self.listing_repo.create(&listing).await?;
        info!(listing_id = %created.id, donor = %ctx.email, "Listing published");
        Ok(created)
    }

    /// Fetch a single listing by id.
    pub async fn get_listing(&self, id: Uuid) -> Result<Listing, AppError> {
        self.listing_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Food listing not found"))
    }

    /// Update a listing's descriptive fields. Donor only.
    pub async fn update_listing(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        update: UpdateListing,
    ) -> Result<Listing, AppError> {
        if let Some(quantity) = update.quantity {
            if quantity < 0 {
                return Err(AppError::validation("Quantity must not be negative"));
            }
        }

        let listing = self.get_listing(id).await?;
        if listing.donor_email != ctx.email {
            return Err(AppError::forbidden(
                "You can only update your own food items",
            ));
        }

        self.listing_repo
            .update(id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("Food listing not found"))
    }

    /// Delete a listing. Donor only; requests against it are left in
    /// place and dangle by design.
    pub async fn delete_listing(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let listing = self.get_listing(id).await?;
        if listing.donor_email != ctx.email {
            return Err(AppError::forbidden(
                "You can only delete your own food items",
            ));
        }

        if !self.listing_repo.delete(id).await? {
            return Err(AppError::not_found("Food listing not found"));
        }
        info!(listing_id = %id, donor = %ctx.email, "Listing deleted");
        Ok(())
    }

    /// Listings published by the caller.
    pub async fn my_listings(&self, ctx: &RequestContext) -> Result<Vec<Listing>, AppError> {
        self.listing_repo.find_by_donor(&ctx.email).await
    }

    /// Browse available listings with filters and sort order.
    pub async fn browse(&self, filter: &ListingFilter) -> Result<Vec<Listing>, AppError> {
        self.listing_repo.find_available(filter).await
    }

    /// The available listings with the most portions remaining.
    pub async fn featured(&self) -> Result<Vec<Listing>, AppError> {
        self.listing_repo.find_featured().await
    }
}
