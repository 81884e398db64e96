//! Integration tests for the reservation engine.
//!
//! Run against in-memory store doubles so the claim/cancel/status
//! workflow and its compensation paths are exercised without a database.

mod helpers;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use sharebite_core::error::ErrorKind;
use sharebite_core::result::AppResult;
use sharebite_core::traits::ListingStore;
use sharebite_entity::listing::{Listing, ListingStatus};
use sharebite_entity::request::RequestStatus;
use sharebite_service::ReservationEngine;

use helpers::{ctx, listing, MemoryListings, MemoryNotifications, MemoryRequests, TestEngine};

#[tokio::test]
async fn claim_reserves_quantity_and_records_request() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let outcome = t
        .engine
        .claim(&ctx("alice@example.com"), id, 3, Some("For the shelter".into()))
        .await
        .unwrap();

    assert_eq!(outcome.remaining_quantity, 2);
    assert_eq!(outcome.request.requested_quantity, 3);
    assert_eq!(outcome.request.requester_email, "alice@example.com");
    assert_eq!(outcome.request.status, RequestStatus::Pending);
    assert_eq!(
        outcome.message,
        "Successfully requested 3 portion(s). 2 portion(s) remaining."
    );

    let stored = t.listings.get(id).unwrap();
    assert_eq!(stored.quantity, 2);
    assert_eq!(stored.status, ListingStatus::Available);

    // The donor is notified about the claim.
    let notifications = t.notifications.all();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].recipient_email, "donor@example.com");
    assert_eq!(notifications[0].requested_quantity, Some(3));
}

#[tokio::test]
async fn claiming_the_entire_quantity_marks_the_listing_unavailable() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 4);
    let id = item.id;
    t.listings.add(item);

    let outcome = t
        .engine
        .claim(&ctx("alice@example.com"), id, 4, None)
        .await
        .unwrap();

    assert_eq!(outcome.remaining_quantity, 0);
    let stored = t.listings.get(id).unwrap();
    assert_eq!(stored.quantity, 0);
    assert_eq!(stored.status, ListingStatus::Unavailable);
}

#[tokio::test]
async fn claim_rejects_non_positive_quantities() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    for bad in [0, -2] {
        let err = t
            .engine
            .claim(&ctx("alice@example.com"), id, bad, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    // Nothing moved.
    assert_eq!(t.listings.get(id).unwrap().quantity, 5);
    assert_eq!(t.requests.len(), 0);
    assert!(t.notifications.all().is_empty());
}

#[tokio::test]
async fn claim_beyond_availability_reports_what_is_left() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 2);
    let id = item.id;
    t.listings.add(item);

    let err = t
        .engine
        .claim(&ctx("alice@example.com"), id, 3, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    assert_eq!(
        err.details.as_ref().and_then(|d| d["available"].as_i64()),
        Some(2)
    );
    assert_eq!(t.listings.get(id).unwrap().quantity, 2);
    assert_eq!(t.requests.len(), 0);
}

#[tokio::test]
async fn claim_against_missing_listing_is_not_found() {
    let t = TestEngine::new();
    let err = t
        .engine
        .claim(&ctx("alice@example.com"), Uuid::new_v4(), 1, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn failed_request_insert_releases_the_reserved_quantity() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);
    t.requests.fail_inserts();

    let err = t
        .engine
        .claim(&ctx("alice@example.com"), id, 3, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
    // The decrement was compensated and no partial state remains.
    assert_eq!(t.listings.get(id).unwrap().quantity, 5);
    assert_eq!(t.requests.len(), 0);
    assert!(t.notifications.all().is_empty());
}

#[tokio::test]
async fn a_lost_donor_notification_does_not_fail_the_claim() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);
    t.notifications.fail_inserts();

    let outcome = t
        .engine
        .claim(&ctx("alice@example.com"), id, 2, None)
        .await
        .unwrap();

    // The claim committed in full even though the notify step failed.
    assert_eq!(outcome.remaining_quantity, 3);
    assert_eq!(t.listings.get(id).unwrap().quantity, 3);
    assert_eq!(t.requests.len(), 1);
    assert!(t.notifications.all().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_unit_claims_never_oversell() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let mut handles = Vec::new();
    for i in 0..12 {
        let engine = t.engine.clone();
        let requester = format!("user{i}@example.com");
        handles.push(tokio::spawn(async move {
            engine.claim(&ctx(&requester), id, 1, None).await
        }));
    }

    let mut succeeded = 0;
    let mut capacity_exceeded = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) if e.kind == ErrorKind::CapacityExceeded => capacity_exceeded += 1,
            Err(e) if e.kind == ErrorKind::Conflict => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    // Every committed claim is backed by exactly one request record and
    // one reserved portion; the store can never go negative or oversell.
    assert_eq!(succeeded, t.requests.len());
    assert!(succeeded <= 5);
    assert_eq!(succeeded + capacity_exceeded + conflicts, 12);
    let stored = t.listings.get(id).unwrap();
    assert_eq!(stored.quantity, 5 - succeeded as i32);
    if stored.quantity == 0 {
        assert_eq!(stored.status, ListingStatus::Unavailable);
    }
}

#[tokio::test]
async fn cancel_restores_quantity_and_removes_the_request() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let alice = ctx("alice@example.com");
    let outcome = t.engine.claim(&alice, id, 3, None).await.unwrap();
    assert_eq!(t.listings.get(id).unwrap().quantity, 2);

    let cancelled = t.engine.cancel(&alice, outcome.request.id).await.unwrap();
    assert_eq!(
        cancelled.message,
        "Request cancelled successfully. Quantity returned to food item."
    );

    let stored = t.listings.get(id).unwrap();
    assert_eq!(stored.quantity, 5);
    assert_eq!(stored.status, ListingStatus::Available);
    assert_eq!(t.requests.len(), 0);
}

#[tokio::test]
async fn cancel_revives_a_depleted_listing() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 2);
    let id = item.id;
    t.listings.add(item);

    let alice = ctx("alice@example.com");
    let outcome = t.engine.claim(&alice, id, 2, None).await.unwrap();
    assert_eq!(t.listings.get(id).unwrap().status, ListingStatus::Unavailable);

    t.engine.cancel(&alice, outcome.request.id).await.unwrap();

    let stored = t.listings.get(id).unwrap();
    assert_eq!(stored.quantity, 2);
    assert_eq!(stored.status, ListingStatus::Available);
}

#[tokio::test]
async fn only_the_requester_may_cancel() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let outcome = t
        .engine
        .claim(&ctx("alice@example.com"), id, 2, None)
        .await
        .unwrap();

    for other in ["mallory@example.com", "donor@example.com"] {
        let err = t
            .engine
            .cancel(&ctx(other), outcome.request.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    // The request and the reservation are untouched.
    assert_eq!(t.requests.len(), 1);
    assert_eq!(t.listings.get(id).unwrap().quantity, 3);
}

#[tokio::test]
async fn cancel_succeeds_after_the_listing_was_deleted() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let alice = ctx("alice@example.com");
    let outcome = t.engine.claim(&alice, id, 2, None).await.unwrap();
    t.listings.remove(id);

    t.engine.cancel(&alice, outcome.request.id).await.unwrap();

    assert_eq!(t.requests.len(), 0);
    assert!(t.listings.get(id).is_none());
}

#[tokio::test]
async fn failed_request_delete_withdraws_the_restored_quantity() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let alice = ctx("alice@example.com");
    let outcome = t.engine.claim(&alice, id, 3, None).await.unwrap();
    t.requests.fail_deletes();

    let err = t.engine.cancel(&alice, outcome.request.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);

    // The restore was taken back, so a later retry cannot double-restore.
    assert_eq!(t.listings.get(id).unwrap().quantity, 2);
    assert_eq!(t.requests.len(), 1);
}

#[tokio::test]
async fn cancel_of_unknown_request_is_not_found() {
    let t = TestEngine::new();
    let err = t
        .engine
        .cancel(&ctx("alice@example.com"), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn donor_drives_the_request_lifecycle() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let outcome = t
        .engine
        .claim(&ctx("alice@example.com"), id, 2, None)
        .await
        .unwrap();
    let request_id = outcome.request.id;
    let donor = ctx("donor@example.com");

    let accepted = t
        .engine
        .update_status(&donor, request_id, "accepted")
        .await
        .unwrap();
    assert_eq!(accepted.status, RequestStatus::Accepted);

    let completed = t
        .engine
        .update_status(&donor, request_id, "completed")
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert_eq!(
        t.requests.get(request_id).unwrap().status,
        RequestStatus::Completed
    );

    // Status transitions never touch the reserved quantity.
    assert_eq!(t.listings.get(id).unwrap().quantity, 3);
}

#[tokio::test]
async fn pending_requests_may_complete_directly() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 3);
    let id = item.id;
    t.listings.add(item);

    let outcome = t
        .engine
        .claim(&ctx("alice@example.com"), id, 1, None)
        .await
        .unwrap();

    let completed = t
        .engine
        .update_status(&ctx("donor@example.com"), outcome.request.id, "completed")
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
}

#[tokio::test]
async fn only_the_donor_may_update_the_status() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let outcome = t
        .engine
        .claim(&ctx("alice@example.com"), id, 2, None)
        .await
        .unwrap();

    for other in ["alice@example.com", "mallory@example.com"] {
        let err = t
            .engine
            .update_status(&ctx(other), outcome.request.id, "accepted")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }
    assert_eq!(
        t.requests.get(outcome.request.id).unwrap().status,
        RequestStatus::Pending
    );
}

#[tokio::test]
async fn unknown_status_values_are_rejected() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let outcome = t
        .engine
        .claim(&ctx("alice@example.com"), id, 2, None)
        .await
        .unwrap();

    let err = t
        .engine
        .update_status(&ctx("donor@example.com"), outcome.request.id, "approved")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn request_listings_are_scoped_to_the_caller() {
    let t = TestEngine::new();
    let item = listing("donor@example.com", 10);
    let id = item.id;
    t.listings.add(item);

    let alice = ctx("alice@example.com");
    let bob = ctx("bob@example.com");
    t.engine.claim(&alice, id, 1, None).await.unwrap();
    t.engine.claim(&bob, id, 2, None).await.unwrap();
    t.engine.claim(&alice, id, 3, None).await.unwrap();

    let mine = t.engine.my_requests(&alice).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r.requester_email == "alice@example.com"));

    let received = t
        .engine
        .received_requests(&ctx("donor@example.com"))
        .await
        .unwrap();
    assert_eq!(received.len(), 3);

    let for_listing = t.engine.requests_for_listing(id).await.unwrap();
    assert_eq!(for_listing.len(), 3);
}

#[tokio::test]
async fn claim_cancel_interleaving_keeps_the_ledger_balanced() {
    // Listing with 5 portions: A claims 3, B's claim for 3 is rejected
    // with the true availability, B claims 2 instead, A cancels, and the
    // listing ends back at 2 available portions for B's live request.
    let t = TestEngine::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    t.listings.add(item);

    let a = ctx("a@example.com");
    let b = ctx("b@example.com");

    let a_claim = t.engine.claim(&a, id, 3, None).await.unwrap();
    assert_eq!(a_claim.remaining_quantity, 2);

    let err = t.engine.claim(&b, id, 3, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    assert_eq!(
        err.details.as_ref().and_then(|d| d["available"].as_i64()),
        Some(2)
    );

    let b_claim = t.engine.claim(&b, id, 2, None).await.unwrap();
    assert_eq!(b_claim.remaining_quantity, 0);
    assert_eq!(t.listings.get(id).unwrap().status, ListingStatus::Unavailable);

    t.engine.cancel(&a, a_claim.request.id).await.unwrap();

    let stored = t.listings.get(id).unwrap();
    assert_eq!(stored.quantity, 3);
    assert_eq!(stored.status, ListingStatus::Available);
    assert_eq!(t.requests.len(), 1);
    assert_eq!(t.requests.get(b_claim.request.id).unwrap().requested_quantity, 2);
}

/// Listing store that loses the compare-and-swap a scripted number of
/// times, consuming one portion per loss as a racing claim would.
struct ContendedListings {
    inner: Arc<MemoryListings>,
    misses_left: AtomicU32,
    attempts: AtomicU32,
}

impl ContendedListings {
    fn new(inner: Arc<MemoryListings>, misses: u32) -> Arc<Self> {
        Arc::new(Self {
            inner,
            misses_left: AtomicU32::new(misses),
            attempts: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl ListingStore for ContendedListings {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        self.inner.find_by_id(id).await
    }

    async fn try_reserve(
        &self,
        id: Uuid,
        expected_quantity: i32,
        new_quantity: i32,
    ) -> AppResult<bool> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .misses_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            // A racing claim takes one portion between our read and swap.
            self.inner
                .try_reserve(id, expected_quantity, expected_quantity - 1)
                .await?;
            return Ok(false);
        }
        self.inner.try_reserve(id, expected_quantity, new_quantity).await
    }

    async fn release(&self, id: Uuid, amount: i32) -> AppResult<bool> {
        self.inner.release(id, amount).await
    }

    async fn withdraw(&self, id: Uuid, amount: i32) -> AppResult<bool> {
        self.inner.withdraw(id, amount).await
    }
}

#[tokio::test]
async fn claim_retries_after_losing_the_compare_and_swap() {
    let backing = MemoryListings::new();
    let item = listing("donor@example.com", 5);
    let id = item.id;
    backing.add(item);

    let listings = ContendedListings::new(backing.clone(), 1);
    let requests = MemoryRequests::new();
    let engine = ReservationEngine::new(
        listings.clone(),
        requests.clone(),
        MemoryNotifications::new(),
    );

    let outcome = engine
        .claim(&ctx("alice@example.com"), id, 2, None)
        .await
        .unwrap();

    // The racing claim took 1 of 5, so the retry saw 4 and left 2.
    assert_eq!(outcome.remaining_quantity, 2);
    assert_eq!(listings.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(backing.get(id).unwrap().quantity, 2);
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn claim_gives_up_after_repeated_compare_and_swap_losses() {
    let backing = MemoryListings::new();
    let item = listing("donor@example.com", 10);
    let id = item.id;
    backing.add(item);

    let listings = ContendedListings::new(backing.clone(), u32::MAX);
    let requests = MemoryRequests::new();
    let engine = ReservationEngine::new(
        listings.clone(),
        requests.clone(),
        MemoryNotifications::new(),
    );

    let err = engine
        .claim(&ctx("alice@example.com"), id, 1, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(listings.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(requests.len(), 0);
}
