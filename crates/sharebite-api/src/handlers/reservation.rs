//! Reservation handlers: claim, cancel, and request lifecycle.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use sharebite_core::error::AppError;
use sharebite_entity::request::FoodRequest;
use sharebite_service::{CancelOutcome, ClaimOutcome};

use crate::dto::request::{ClaimRequest, UpdateRequestStatusBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/listings/{id}/claims
pub async fn claim_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ClaimRequest>,
) -> Result<Json<ApiResponse<ClaimOutcome>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let outcome = state
        .reservations
        .claim(&auth, id, req.quantity, req.note)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/listings/{id}/requests
pub async fn requests_for_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<FoodRequest>>>, ApiError> {
    // Only the donor sees who has claimed against their listing.
    let listing = state.listing_service.get_listing(id).await?;
    if listing.donor_email != auth.email {
        return Err(AppError::forbidden("You can only view requests for your own food items").into());
    }
    let requests = state.reservations.requests_for_listing(id).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// GET /api/requests/mine
pub async fn my_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FoodRequest>>>, ApiError> {
    let requests = state.reservations.my_requests(&auth).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// GET /api/requests/received
pub async fn received_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FoodRequest>>>, ApiError> {
    let requests = state.reservations.received_requests(&auth).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// DELETE /api/requests/{id}
pub async fn cancel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CancelOutcome>>, ApiError> {
    let outcome = state.reservations.cancel(&auth, id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// PUT /api/requests/{id}/status
pub async fn update_request_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRequestStatusBody>,
) -> Result<Json<ApiResponse<FoodRequest>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let request = state
        .reservations
        .update_status(&auth, id, &body.status)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}
