//! Analytics reader: pure aggregation over the listing and request
//! stores, no invariants of its own.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sharebite_core::error::AppError;
use sharebite_database::repositories::{ListingRepository, RequestRepository};

use crate::context::RequestContext;

/// Donors shown in the global top-donor ranking.
const TOP_DONOR_LIMIT: i64 = 5;
/// Locations shown in the global distribution.
const TOP_LOCATION_LIMIT: i64 = 10;

/// Per-user donation and request statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAnalytics {
    /// Listings the user has published.
    pub total_donated: i64,
    /// Requests the user has made.
    pub total_requested: i64,
    /// The user's listings currently available.
    pub available_foods: i64,
    /// Requests received against the user's listings.
    pub requests_received: i64,
    /// Total portions the user has published.
    pub total_quantity_donated: i64,
}

/// A donor in the global ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorStat {
    /// Donor identity.
    pub donor_email: String,
    /// Donor display name, when known.
    pub donor_name: Option<String>,
    /// Number of listings published.
    pub total_donations: i64,
}

/// A location in the global distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationStat {
    /// Location label (None for listings without one).
    pub location: Option<String>,
    /// Number of listings at this location.
    pub count: i64,
}

/// Platform-wide statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalAnalytics {
    /// Listings in the system.
    pub total_foods: i64,
    /// Currently available listings.
    pub available_foods: i64,
    /// Most active donors.
    pub top_donors: Vec<DonorStat>,
    /// Listing distribution by location.
    pub foods_by_location: Vec<LocationStat>,
}

/// Read-only rollups over listings and requests.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    /// Listing repository.
    listing_repo: Arc<ListingRepository>,
    /// Request repository.
    request_repo: Arc<RequestRepository>,
}

impl AnalyticsService {
    /// Creates a new analytics service.
    pub fn new(listing_repo: Arc<ListingRepository>, request_repo: Arc<RequestRepository>) -> Self {
        Self {
            listing_repo,
            request_repo,
        }
    }

    /// Statistics for the current user.
    pub async fn user_analytics(&self, ctx: &RequestContext) -> Result<UserAnalytics, AppError> {
        let email = ctx.email.as_str();
        Ok(UserAnalytics {
            total_donated: self.listing_repo.count_by_donor(email).await?,
            total_requested: self.request_repo.count_by_requester(email).await?,
            available_foods: self.listing_repo.count_available_by_donor(email).await?,
            requests_received: self.request_repo.count_by_donor(email).await?,
            total_quantity_donated: self.listing_repo.total_quantity_by_donor(email).await?,
        })
    }

    /// Platform-wide statistics.
    pub async fn global_analytics(&self) -> Result<GlobalAnalytics, AppError> {
        let top_donors = self
            .listing_repo
            .top_donors(TOP_DONOR_LIMIT)
            .await?
            .into_iter()
            .map(|(donor_email, donor_name, total_donations)| DonorStat {
                donor_email,
                donor_name,
                total_donations,
            })
            .collect();

        let foods_by_location = self
            .listing_repo
            .listings_by_location(TOP_LOCATION_LIMIT)
            .await?
            .into_iter()
            .map(|(location, count)| LocationStat { location, count })
            .collect();

        Ok(GlobalAnalytics {
            total_foods: self.listing_repo.count_all().await?,
            available_foods: self.listing_repo.count_available().await?,
            top_donors,
            foods_by_location,
        })
    }
}
