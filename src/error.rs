// Core and HTTP error types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::store::StoreError;
use crate::types::{EntityId, EntityKind};

/// Outcome kinds of every administrative operation.
///
/// `NotFound` and `Forbidden` stay distinct here so audit logs and tests can
/// tell them apart; `ApiError` merges them at the HTTP boundary.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Scope malformed: {0}")]
    ScopeMalformed(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("{kind} {id} is outside the actor's scope")]
    Forbidden { kind: EntityKind, id: EntityId },

    #[error("{kind} {id} still has {dependent} records")]
    HasDependents {
        kind: EntityKind,
        id: EntityId,
        dependent: EntityKind,
    },

    #[error("cannot place a {kind} under {parent_kind} {parent_id}: outside the actor's scope")]
    ParentMismatch {
        kind: EntityKind,
        parent_kind: EntityKind,
        parent_id: EntityId,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        RegistryError::NotFound { kind, id }
    }

    pub fn forbidden(kind: EntityKind, id: EntityId) -> Self {
        RegistryError::Forbidden { kind, id }
    }

    /// Short machine label used in audit log lines
    pub fn audit_label(&self) -> &'static str {
        match self {
            RegistryError::Unauthenticated(_) => "unauthenticated",
            RegistryError::ScopeMalformed(_) => "scope_malformed",
            RegistryError::NotFound { .. } => "not_found",
            RegistryError::Forbidden { .. } => "forbidden",
            RegistryError::HasDependents { .. } => "has_dependents",
            RegistryError::ParentMismatch { .. } => "parent_mismatch",
            RegistryError::Validation(_) => "validation",
            RegistryError::Store(_) => "store",
        }
    }
}

impl From<AuthError> for RegistryError {
    fn from(err: AuthError) -> Self {
        RegistryError::Unauthenticated(err.to_string())
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

/// Message shown for both missing and out-of-scope entities so ids are not leaked
pub const NOT_FOUND_OR_DENIED: &str = "not found or access denied";

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Unauthenticated(_) | RegistryError::ScopeMalformed(_) => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            RegistryError::NotFound { .. } | RegistryError::Forbidden { .. } => {
                ApiError::NotFound(NOT_FOUND_OR_DENIED.to_string())
            }
            RegistryError::ParentMismatch { kind, .. } => {
                ApiError::Forbidden(format!("Cannot create or move this {} outside your scope", kind))
            }
            RegistryError::HasDependents { kind, dependent, .. } => ApiError::Conflict(format!(
                "Cannot delete this {} while {} records still reference it",
                kind, dependent
            )),
            RegistryError::Validation(msg) => ApiError::BadRequest(msg),
            RegistryError::Store(StoreError::Unavailable(msg)) => {
                tracing::error!("Store unavailable: {}", msg);
                ApiError::ServiceUnavailable("Storage temporarily unavailable".to_string())
            }
            RegistryError::Store(other) => {
                // Log the real error but return generic message
                tracing::error!("Store error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Malformed or mistyped request bodies get the same envelope as every other error
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
