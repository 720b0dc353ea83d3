use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::access::Scope;
use crate::database::store::{ChildTable, EntityStore, Table};
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;
use crate::services::Managed;
use crate::types::EntityId;

/// GET /api/{kind}
pub async fn list<T>(State(state): State<AppState>, Extension(scope): Extension<Scope>) -> ApiResult<Vec<T>>
where
    T: Managed,
    dyn EntityStore: Table<T>,
{
    Ok(ApiResponse::success(state.service.list::<T>(&scope).await?))
}

/// GET /api/{parent kind}/:id/{kind}
pub async fn list_children<T>(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(parent_id): Path<EntityId>,
) -> ApiResult<Vec<T>>
where
    T: Managed,
    dyn EntityStore: ChildTable<T>,
{
    Ok(ApiResponse::success(
        state.service.list_children::<T>(&scope, parent_id).await?,
    ))
}

/// GET /api/{kind}/:id
pub async fn show<T>(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<EntityId>,
) -> ApiResult<T>
where
    T: Managed,
    dyn EntityStore: Table<T>,
{
    Ok(ApiResponse::success(state.service.get::<T>(&scope, id).await?))
}

/// POST /api/{kind}
pub async fn create<T>(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    body: Result<Json<T>, JsonRejection>,
) -> ApiResult<T>
where
    T: Managed,
    dyn EntityStore: Table<T>,
{
    let Json(entity) = body?;
    Ok(ApiResponse::created(state.service.create(&scope, entity).await?))
}

/// PUT /api/{kind}/:id
pub async fn update<T>(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<EntityId>,
    body: Result<Json<T>, JsonRejection>,
) -> ApiResult<T>
where
    T: Managed,
    dyn EntityStore: Table<T>,
{
    let Json(entity) = body?;
    Ok(ApiResponse::success(state.service.update(&scope, id, entity).await?))
}

/// DELETE /api/{kind}/:id
pub async fn delete<T>(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<EntityId>,
) -> ApiResult<serde_json::Value>
where
    T: Managed,
    dyn EntityStore: Table<T>,
{
    state.service.delete::<T>(&scope, id).await?;
    Ok(ApiResponse::success(serde_json::json!({
        "kind": T::KIND,
        "id": id,
        "deleted": true
    })))
}
