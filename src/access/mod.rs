//! Scope resolution and enforcement.
//!
//! Every administrative operation runs the same sequence: resolve the actor's
//! `Scope`, authorize the target through `AccessGuard` (deriving ownership with
//! `OwnershipResolver`), and for deletes consult `CascadeGuard`.

pub mod cascade;
pub mod guard;
pub mod ownership;
pub mod scope;

pub use cascade::CascadeGuard;
pub use guard::{authorize, AccessGuard};
pub use ownership::{OwnerChain, OwnershipResolver};
pub use scope::{Scope, ScopeResolver};

use crate::config;
use crate::error::RegistryError;
use crate::types::{Action, EntityId, EntityKind};

fn audited(err: &RegistryError) -> bool {
    config::config().security.enable_audit_logging && !matches!(err, RegistryError::Store(_))
}

/// Audit trail for refused operations. Keeps the NotFound / Forbidden
/// distinction that the HTTP layer hides.
pub(crate) fn audit_denial(
    scope: &Scope,
    action: Action,
    kind: EntityKind,
    id: EntityId,
    err: &RegistryError,
) {
    if !audited(err) {
        return;
    }
    tracing::warn!(
        target: "audit",
        role = %scope.role(),
        scope_municipality = ?scope.municipality_id(),
        scope_barangay = ?scope.barangay_id(),
        %action,
        mutation = action.is_mutation(),
        %kind,
        id,
        outcome = err.audit_label(),
        "access denied: {}",
        err
    );
}

/// Refused placement of a `kind` under a declared parent. `err` is the real
/// cause, which may be a missing parent reported to the caller as a mismatch.
pub(crate) fn audit_parent_denial(
    scope: &Scope,
    action: Action,
    kind: EntityKind,
    parent_kind: EntityKind,
    parent_id: EntityId,
    err: &RegistryError,
) {
    if !audited(err) {
        return;
    }
    tracing::warn!(
        target: "audit",
        role = %scope.role(),
        scope_municipality = ?scope.municipality_id(),
        scope_barangay = ?scope.barangay_id(),
        %action,
        mutation = action.is_mutation(),
        %kind,
        %parent_kind,
        parent_id,
        outcome = err.audit_label(),
        "placement denied: {}",
        err
    );
}
