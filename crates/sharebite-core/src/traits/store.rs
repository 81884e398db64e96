//! Store traits that the reservation engine is written against.
//!
//! The sqlx repositories in `sharebite-database` provide the production
//! implementations; tests drive the engine against in-memory doubles.
//! Every mutation that touches the listing quantity is expressed here as
//! a single atomic store operation, so the engine never holds a lock
//! across a read-modify-write.

use async_trait::async_trait;
use uuid::Uuid;

use sharebite_entity::listing::Listing;
use sharebite_entity::notification::{CreateNotification, Notification};
use sharebite_entity::request::{CreateFoodRequest, FoodRequest, RequestStatus};

use crate::result::AppResult;

/// Persistent collection of listings keyed by identifier.
#[async_trait]
pub trait ListingStore: Send + Sync + 'static {
    /// Find a listing by its primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>>;

    /// Compare-and-swap decrement of a listing's quantity.
    ///
    /// Sets the quantity to `new_quantity` (recomputing the status:
    /// unavailable iff zero) only if the stored quantity still equals
    /// `expected_quantity`. Returns `false` when the guard fails, either
    /// because a concurrent claim moved the quantity or because the
    /// listing no longer exists; the caller re-reads and retries.
    async fn try_reserve(
        &self,
        id: Uuid,
        expected_quantity: i32,
        new_quantity: i32,
    ) -> AppResult<bool>;

    /// Atomically add `amount` back to a listing's quantity and force the
    /// status to available. Returns `false` if the listing is absent.
    async fn release(&self, id: Uuid, amount: i32) -> AppResult<bool>;

    /// Atomically subtract `amount` from a listing's quantity, recomputing
    /// the status. Compensation path only: reverses a `release` whose
    /// surrounding operation failed. Returns `false` if the listing is
    /// absent.
    async fn withdraw(&self, id: Uuid, amount: i32) -> AppResult<bool>;
}

/// Persistent collection of food requests keyed by identifier.
#[async_trait]
pub trait RequestStore: Send + Sync + 'static {
    /// Insert a new request record with pending status.
    async fn insert(&self, record: &CreateFoodRequest) -> AppResult<FoodRequest>;

    /// Find a request by its primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FoodRequest>>;

    /// Delete a request. Returns `true` if a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Update a request's lifecycle status. Returns `true` if a record
    /// was updated.
    async fn update_status(&self, id: Uuid, status: RequestStatus) -> AppResult<bool>;

    /// All requests made by a requester, newest first.
    async fn find_by_requester(&self, requester_email: &str) -> AppResult<Vec<FoodRequest>>;

    /// All requests received by a donor, newest first.
    async fn find_by_donor(&self, donor_email: &str) -> AppResult<Vec<FoodRequest>>;

    /// All requests against a listing, newest first.
    async fn find_by_listing(&self, listing_id: Uuid) -> AppResult<Vec<FoodRequest>>;
}

/// Accepts notification records produced by state-changing events.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    /// Record a notification.
    async fn insert(&self, record: &CreateNotification) -> AppResult<Notification>;
}
