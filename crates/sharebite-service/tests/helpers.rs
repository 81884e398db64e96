//! Shared in-memory store doubles for reservation engine tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use sharebite_core::error::AppError;
use sharebite_core::result::AppResult;
use sharebite_core::traits::{ListingStore, NotificationSink, RequestStore};
use sharebite_entity::listing::{Listing, ListingStatus};
use sharebite_entity::notification::{CreateNotification, Notification};
use sharebite_entity::request::{CreateFoodRequest, FoodRequest, RequestStatus};

use sharebite_service::{RequestContext, ReservationEngine};

/// In-memory listing store with the same atomicity per operation as the
/// SQL implementation (each call holds the lock for its whole critical
/// section).
#[derive(Default)]
pub struct MemoryListings {
    inner: Mutex<HashMap<Uuid, Listing>>,
}

impl MemoryListings {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, listing: Listing) {
        self.inner.lock().unwrap().insert(listing.id, listing);
    }

    pub fn get(&self, id: Uuid) -> Option<Listing> {
        self.inner.lock().unwrap().get(&id).cloned()
    }

    pub fn remove(&self, id: Uuid) {
        self.inner.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl ListingStore for MemoryListings {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        Ok(self.inner.lock().unwrap().get(&id).cloned())
    }

    async fn try_reserve(
        &self,
        id: Uuid,
        expected_quantity: i32,
        new_quantity: i32,
    ) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.get_mut(&id) {
            Some(listing) if listing.quantity == expected_quantity => {
                listing.quantity = new_quantity;
                listing.status = ListingStatus::for_quantity(new_quantity);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, id: Uuid, amount: i32) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.get_mut(&id) {
            Some(listing) => {
                listing.quantity += amount;
                listing.status = ListingStatus::Available;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn withdraw(&self, id: Uuid, amount: i32) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.get_mut(&id) {
            Some(listing) => {
                listing.quantity = (listing.quantity - amount).max(0);
                listing.status = ListingStatus::for_quantity(listing.quantity);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory request store with optional failure injection for the
/// compensating-write paths.
#[derive(Default)]
pub struct MemoryRequests {
    inner: Mutex<Vec<FoodRequest>>,
    fail_insert: AtomicBool,
    fail_delete: AtomicBool,
}

impl MemoryRequests {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next inserts fail with a database error.
    pub fn fail_inserts(&self) {
        self.fail_insert.store(true, Ordering::SeqCst);
    }

    /// Make the next deletes fail with a database error.
    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn get(&self, id: Uuid) -> Option<FoodRequest> {
        self.inner.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }
}

#[async_trait]
impl RequestStore for MemoryRequests {
    async fn insert(&self, record: &CreateFoodRequest) -> AppResult<FoodRequest> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::database("request store unavailable"));
        }
        let request = FoodRequest {
            id: Uuid::new_v4(),
            listing_id: record.listing_id,
            food_name: record.food_name.clone(),
            image_url: record.image_url.clone(),
            location: record.location.clone(),
            expiration_date: record.expiration_date,
            donor_email: record.donor_email.clone(),
            donor_name: record.donor_name.clone(),
            requester_email: record.requester_email.clone(),
            requested_quantity: record.requested_quantity,
            status: RequestStatus::Pending,
            note: record.note.clone(),
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().push(request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FoodRequest>> {
        Ok(self.get(id))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::database("request store unavailable"));
        }
        let mut inner = self.inner.lock().unwrap();
        let before = inner.len();
        inner.retain(|r| r.id != id);
        Ok(inner.len() < before)
    }

    async fn update_status(&self, id: Uuid, status: RequestStatus) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.iter_mut().find(|r| r.id == id) {
            Some(request) => {
                request.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_requester(&self, requester_email: &str) -> AppResult<Vec<FoodRequest>> {
        let mut found: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.requester_email == requester_email)
            .cloned()
            .collect();
        found.reverse();
        Ok(found)
    }

    async fn find_by_donor(&self, donor_email: &str) -> AppResult<Vec<FoodRequest>> {
        let mut found: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.donor_email == donor_email)
            .cloned()
            .collect();
        found.reverse();
        Ok(found)
    }

    async fn find_by_listing(&self, listing_id: Uuid) -> AppResult<Vec<FoodRequest>> {
        let mut found: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.listing_id == listing_id)
            .cloned()
            .collect();
        found.reverse();
        Ok(found)
    }
}

/// In-memory notification sink with optional failure injection.
#[derive(Default)]
pub struct MemoryNotifications {
    inner: Mutex<Vec<Notification>>,
    fail_insert: AtomicBool,
}

impl MemoryNotifications {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next inserts fail with a database error.
    pub fn fail_inserts(&self) {
        self.fail_insert.store(true, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Notification> {
        self.inner.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for MemoryNotifications {
    async fn insert(&self, record: &CreateNotification) -> AppResult<Notification> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::database("notification store unavailable"));
        }
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_email: record.recipient_email.clone(),
            event_type: record.event_type.clone(),
            message: record.message.clone(),
            listing_id: record.listing_id,
            food_name: record.food_name.clone(),
            requester_email: record.requester_email.clone(),
            requested_quantity: record.requested_quantity,
            is_read: false,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().push(notification.clone());
        Ok(notification)
    }
}

/// A listing published by `donor` with `quantity` portions.
pub fn listing(donor: &str, quantity: i32) -> Listing {
    let now = Utc::now();
    Listing {
        id: Uuid::new_v4(),
        donor_email: donor.to_string(),
        donor_name: Some("Test Donor".to_string()),
        food_name: "Vegetable curry".to_string(),
        image_url: None,
        location: Some("Downtown".to_string()),
        expiration_date: None,
        notes: None,
        quantity,
        status: ListingStatus::for_quantity(quantity),
        created_at: now,
        updated_at: now,
    }
}

/// An authenticated context for `email`.
pub fn ctx(email: &str) -> RequestContext {
    RequestContext::new(email.to_string(), None)
}

/// A full engine plus handles to its in-memory stores.
pub struct TestEngine {
    pub engine: ReservationEngine,
    pub listings: Arc<MemoryListings>,
    pub requests: Arc<MemoryRequests>,
    pub notifications: Arc<MemoryNotifications>,
}

impl TestEngine {
    pub fn new() -> Self {
        let listings = MemoryListings::new();
        let requests = MemoryRequests::new();
        let notifications = MemoryNotifications::new();
        let engine = ReservationEngine::new(
            listings.clone(),
            requests.clone(),
            notifications.clone(),
        );
        Self {
            engine,
            listings,
            requests,
            notifications,
        }
    }
}
