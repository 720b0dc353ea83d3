use axum::{
    extract::{Path, State},
    Extension,
};

use crate::access::Scope;
use crate::middleware::{ApiResponse, ApiResult};
use crate::report::Report;
use crate::routes::AppState;
use crate::types::EntityId;

/// GET /api/reports/municipalities/:id - recomputed on every call
pub async fn municipality_report(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<EntityId>,
) -> ApiResult<Report> {
    Ok(ApiResponse::success(state.service.build_report(&scope, id).await?))
}
