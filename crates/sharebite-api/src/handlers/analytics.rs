//! Analytics handlers.

use axum::extract::State;
use axum::Json;

use sharebite_service::{GlobalAnalytics, UserAnalytics};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/analytics/me
pub async fn user_analytics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserAnalytics>>, ApiError> {
    let stats = state.analytics_service.user_analytics(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/analytics/global
pub async fn global_analytics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<GlobalAnalytics>>, ApiError> {
    let stats = state.analytics_service.global_analytics().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
