//! Listing handlers: publish, browse, edit, delete.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use sharebite_core::error::AppError;
use sharebite_entity::listing::Listing;

use crate::dto::request::{BrowseQuery, CreateListingRequest, UpdateListingRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/listings
pub async fn create_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateListingRequest>,
) -> Result<Json<ApiResponse<Listing>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let listing = state
        .listing_service
        .create_listing(&auth, req.into_create())
        .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/listings
pub async fn browse_listings(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ApiResponse<Vec<Listing>>>, ApiError> {
    let listings = state.listing_service.browse(&query.into_filter()).await?;
    Ok(Json(ApiResponse::ok(listings)))
}

/// GET /api/listings/featured
pub async fn featured_listings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Listing>>>, ApiError> {
    let listings = state.listing_service.featured().await?;
    Ok(Json(ApiResponse::ok(listings)))
}

/// GET /api/listings/mine
pub async fn my_listings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Listing>>>, ApiError> {
    let listings = state.listing_service.my_listings(&auth).await?;
    Ok(Json(ApiResponse::ok(listings)))
}

/// GET /api/listings/{id}
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Listing>>, ApiError> {
    let listing = state.listing_service.get_listing(id).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// PUT /api/listings/{id}
pub async fn update_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateListingRequest>,
) -> Result<Json<ApiResponse<Listing>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let listing = state
        .listing_service
        .update_listing(&auth, id, req.into_update())
        .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// DELETE /api/listings/{id}
pub async fn delete_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.listing_service.delete_listing(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Food item deleted successfully".to_string(),
    })))
}
