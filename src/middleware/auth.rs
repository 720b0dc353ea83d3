use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::access::Scope;
use crate::error::{ApiError, RegistryError};
use crate::routes::AppState;

/// Resolves the caller's `Scope` from the bearer token and injects it into the
/// request. Nothing downstream runs without one.
pub async fn scope_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(|msg| {
        ApiError::from(RegistryError::Unauthenticated(msg.to_string()))
    })?;

    let scope = state.resolver.resolve(token).map_err(|err| {
        if matches!(err, RegistryError::ScopeMalformed(_)) {
            warn!(target: "audit", "rejected credential with malformed scope: {}", err);
        }
        ApiError::from(err)
    })?;

    request.extensions_mut().insert::<Scope>(scope);
    Ok(next.run(request).await)
}

/// `Ok(None)` when no Authorization header is present; the resolver decides
/// how to treat that
fn extract_bearer_token(headers: &HeaderMap) -> Result<Option<&str>, &'static str> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        Some(_) => Err("Empty bearer token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}
