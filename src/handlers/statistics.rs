use axum::{
    extract::{Path, State},
    Extension,
};

use crate::access::Scope;
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;
use crate::stats::{Statistics, StatsLevel};
use crate::types::EntityId;

async fn at_level(state: &AppState, scope: &Scope, level: StatsLevel) -> ApiResult<Statistics> {
    Ok(ApiResponse::success(state.service.statistics(scope, level).await?))
}

/// GET /api/statistics/system
pub async fn system(State(state): State<AppState>, Extension(scope): Extension<Scope>) -> ApiResult<Statistics> {
    at_level(&state, &scope, StatsLevel::System).await
}

/// GET /api/statistics/municipalities/:id
pub async fn municipality(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<EntityId>,
) -> ApiResult<Statistics> {
    at_level(&state, &scope, StatsLevel::Municipality(id)).await
}

/// GET /api/statistics/barangays/:id
pub async fn barangay(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<EntityId>,
) -> ApiResult<Statistics> {
    at_level(&state, &scope, StatsLevel::Barangay(id)).await
}

/// GET /api/statistics/zones/:id
pub async fn zone(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<EntityId>,
) -> ApiResult<Statistics> {
    at_level(&state, &scope, StatsLevel::Zone(id)).await
}
