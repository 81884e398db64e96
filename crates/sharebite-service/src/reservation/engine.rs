//! The reservation engine: claim, cancel, and status transitions.
//!
//! The engine is the sole authority over listing quantity and request
//! records. Claims decrement quantity through a compare-and-swap on the
//! listing store; cancellations restore it. No cross-store transaction is
//! assumed, so every multi-step path carries a compensating write for the
//! step that can fail after quantity has moved.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use sharebite_core::error::AppError;
use sharebite_core::result::AppResult;
use sharebite_core::traits::{ListingStore, NotificationSink, RequestStore};
use sharebite_entity::notification::CreateNotification;
use sharebite_entity::request::{CreateFoodRequest, FoodRequest, RequestStatus};

use crate::context::RequestContext;

/// Claim attempts before a compare-and-swap race surfaces as `Conflict`.
const CLAIM_RETRY_LIMIT: u32 = 3;

/// Result of a successful claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimOutcome {
    /// The request record created by the claim.
    pub request: FoodRequest,
    /// Portions left on the listing after the claim.
    pub remaining_quantity: i32,
    /// Human-readable confirmation.
    pub message: String,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOutcome {
    /// Human-readable confirmation.
    pub message: String,
}

/// Orchestrates the claim/cancel/status-transition workflow against the
/// listing and request stores.
#[derive(Clone)]
pub struct ReservationEngine {
    /// Listing store.
    listings: Arc<dyn ListingStore>,
    /// Request store.
    requests: Arc<dyn RequestStore>,
    /// Notification sink for state-changing events.
    notifications: Arc<dyn NotificationSink>,
}

impl std::fmt::Debug for ReservationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationEngine").finish()
    }
}

impl ReservationEngine {
    /// Creates a new reservation engine.
    pub fn new(
        listings: Arc<dyn ListingStore>,
        requests: Arc<dyn RequestStore>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            listings,
            requests,
            notifications,
        }
    }

    /// Reserve `quantity` portions of a listing for the caller.
    ///
    /// The decrement is a compare-and-swap against the quantity observed
    /// at the start of the attempt; a CAS miss re-reads and revalidates
    /// the whole claim, so two concurrent claims can never jointly
    /// reserve more than was available. If the request insert fails after
    /// the decrement committed, the reserved amount is released again
    /// before the error surfaces.
    pub async fn claim(
        &self,
        ctx: &RequestContext,
        listing_id: Uuid,
        quantity: i32,
        note: Option<String>,
    ) -> AppResult<ClaimOutcome> {
        for attempt in 0..CLAIM_RETRY_LIMIT {
            let listing = self
                .listings
                .find_by_id(listing_id)
                .await?
                .ok_or_else(|| AppError::not_found("Food listing not found"))?;

            let available = listing.quantity;
            if available < 0 {
                return Err(AppError::internal(format!(
                    "Listing {listing_id} has a negative quantity",
                )));
            }
            if quantity < 1 {
                return Err(AppError::validation(
                    "Requested quantity must be greater than 0",
                ));
            }
            if quantity > available {
                return Err(AppError::capacity_exceeded(available));
            }

            let remaining = available - quantity;
            if !self
                .listings
                .try_reserve(listing_id, available, remaining)
                .await?
            {
                debug!(%listing_id, attempt, "Quantity moved under us, retrying claim");
                continue;
            }

            let record = CreateFoodRequest::for_claim(&listing, &ctx.email, quantity, note);
            let request = match self.requests.insert(&record).await {
                Ok(request) => request,
                Err(e) => {
                    // The decrement committed but the request record did
                    // not; put the reserved amount back before failing.
                    if let Err(release_err) = self.listings.release(listing_id, quantity).await {
                        error!(
                            %listing_id,
                            error = %release_err,
                            "Compensating release failed after request insert error"
                        );
                    }
                    return Err(e);
                }
            };

            // The claim is committed at this point; a lost notification is
            // not worth failing it over.
            if let Err(e) = self
                .notifications
                .insert(&CreateNotification::food_requested(&record))
                .await
            {
                warn!(%listing_id, error = %e, "Failed to notify donor of claim");
            }

            info!(
                %listing_id,
                requester = %ctx.email,
                quantity,
                remaining,
                "Claim reserved"
            );

            return Ok(ClaimOutcome {
                request,
                remaining_quantity: remaining,
                message: format!(
                    "Successfully requested {quantity} portion(s). {remaining} portion(s) remaining."
                ),
            });
        }

        Err(AppError::conflict(
            "Listing is being claimed concurrently, please retry",
        ))
    }

    /// Cancel a request, restoring its quantity to the listing.
    ///
    /// Restoration is skipped when the listing has been deleted in the
    /// meantime; the request record is removed either way. A failed
    /// delete after a successful restore is compensated by withdrawing
    /// the restored amount, so a retried cancel cannot double-restore.
    pub async fn cancel(&self, ctx: &RequestContext, request_id: Uuid) -> AppResult<CancelOutcome> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Request not found"))?;

        if request.requester_email != ctx.email {
            return Err(AppError::forbidden(
                "Only the requester may cancel this request",
            ));
        }

        let restored = self
            .listings
            .release(request.listing_id, request.requested_quantity)
            .await?;
        if !restored {
            debug!(
                listing_id = %request.listing_id,
                "Listing gone before cancel, skipping quantity restore"
            );
        }

        let deleted = match self.requests.delete(request_id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                if restored {
                    self.compensate_restore(&request).await;
                }
                return Err(e);
            }
        };
        if !deleted {
            // A concurrent cancel beat us to the delete; our restore is
            // surplus and must be taken back.
            if restored {
                self.compensate_restore(&request).await;
            }
            return Err(AppError::not_found("Request not found"));
        }

        info!(
            %request_id,
            listing_id = %request.listing_id,
            requester = %ctx.email,
            quantity = request.requested_quantity,
            restored,
            "Request cancelled"
        );

        Ok(CancelOutcome {
            message: "Request cancelled successfully. Quantity returned to food item.".to_string(),
        })
    }

    /// Move a request to a new lifecycle status.
    ///
    /// Only the donor of the listing may drive the lifecycle. Any parsed
    /// status is accepted as a target, including `pending -> completed`
    /// directly; quantity never changes here.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        status: &str,
    ) -> AppResult<FoodRequest> {
        let status: RequestStatus = status.parse()?;

        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Request not found"))?;

        if request.donor_email != ctx.email {
            return Err(AppError::forbidden(
                "Only the donor may update the request status",
            ));
        }

        if !self.requests.update_status(request_id, status).await? {
            return Err(AppError::not_found("Request not found"));
        }

        info!(%request_id, donor = %ctx.email, status = %status, "Request status updated");

        Ok(FoodRequest { status, ..request })
    }

    /// Requests made by the caller, newest first.
    pub async fn my_requests(&self, ctx: &RequestContext) -> AppResult<Vec<FoodRequest>> {
        self.requests.find_by_requester(&ctx.email).await
    }

    /// Requests received against the caller's listings, newest first.
    pub async fn received_requests(&self, ctx: &RequestContext) -> AppResult<Vec<FoodRequest>> {
        self.requests.find_by_donor(&ctx.email).await
    }

    /// Requests against a specific listing, newest first.
    pub async fn requests_for_listing(&self, listing_id: Uuid) -> AppResult<Vec<FoodRequest>> {
        self.requests.find_by_listing(listing_id).await
    }

    /// Take back a quantity restore whose cancellation did not commit.
    async fn compensate_restore(&self, request: &FoodRequest) {
        if let Err(e) = self
            .listings
            .withdraw(request.listing_id, request.requested_quantity)
            .await
        {
            error!(
                listing_id = %request.listing_id,
                error = %e,
                "Compensating withdraw failed after cancel error"
            );
        }
    }
}
