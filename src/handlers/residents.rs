use axum::{
    extract::{Path, State},
    Extension,
};

use crate::access::Scope;
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;
use crate::services::{LocationDrift, LocationResync};
use crate::types::EntityId;

/// GET /api/residents/location-audit
pub async fn location_audit(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
) -> ApiResult<Vec<LocationDrift>> {
    Ok(ApiResponse::success(
        state.service.audit_resident_locations(&scope).await?,
    ))
}

/// POST /api/residents/:id/resync-location
pub async fn resync_location(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<EntityId>,
) -> ApiResult<LocationResync> {
    Ok(ApiResponse::success(
        state.service.resync_resident_location(&scope, id).await?,
    ))
}
