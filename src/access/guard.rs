use std::sync::Arc;

use tracing::debug;

use super::{audit_denial, audit_parent_denial};
use super::ownership::{OwnerChain, OwnershipResolver};
use super::scope::Scope;
use crate::database::store::EntityStore;
use crate::error::RegistryError;
use crate::types::{Action, EntityId, EntityKind, Role};

/// Pure decision for an existing entity whose chain is already known
pub fn authorize(
    scope: &Scope,
    action: Action,
    kind: EntityKind,
    id: EntityId,
    chain: &OwnerChain,
) -> Result<(), RegistryError> {
    if scope.covers(chain) {
        debug!("{} {} {} allowed for {}", action, kind, id, scope.role());
        Ok(())
    } else {
        Err(RegistryError::forbidden(kind, id))
    }
}

/// Decides Allow / Forbidden / NotFound for every read and write
#[derive(Clone)]
pub struct AccessGuard {
    ownership: OwnershipResolver,
}

impl AccessGuard {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            ownership: OwnershipResolver::new(store),
        }
    }

    pub fn ownership(&self) -> &OwnershipResolver {
        &self.ownership
    }

    /// Read, update or delete of an existing entity. Returns its owner chain.
    pub async fn authorize_existing(
        &self,
        scope: &Scope,
        action: Action,
        kind: EntityKind,
        id: EntityId,
    ) -> Result<OwnerChain, RegistryError> {
        let outcome = match self.ownership.owner_chain(kind, id).await {
            Ok(chain) => authorize(scope, action, kind, id, &chain).map(|_| chain),
            Err(err) => Err(err),
        };
        if let Err(err) = &outcome {
            audit_denial(scope, action, kind, id, err);
        }
        outcome
    }

    /// Placing a `kind` under `parent_id`, either on create or when an update
    /// moves the entity. The declared parent must lie inside the scope; a
    /// mismatch is reported as `ParentMismatch`, never as `Forbidden`. Below
    /// SuperAdmin a missing parent is a mismatch too, so placement cannot be
    /// used to learn which ids exist elsewhere.
    pub async fn authorize_parent(
        &self,
        scope: &Scope,
        action: Action,
        kind: EntityKind,
        parent_id: Option<EntityId>,
    ) -> Result<OwnerChain, RegistryError> {
        let (parent_kind, parent_id) = match (kind.parent(), parent_id) {
            (None, _) => {
                // new roots sit above every municipality; id 0 stands for "not yet assigned"
                return if scope.covers(&OwnerChain::root()) {
                    Ok(OwnerChain::root())
                } else {
                    let err = RegistryError::forbidden(kind, 0);
                    audit_denial(scope, action, kind, 0, &err);
                    Err(err)
                };
            }
            (Some(parent_kind), Some(parent_id)) => (parent_kind, parent_id),
            (Some(parent_kind), None) => {
                return Err(RegistryError::Validation(format!(
                    "a {} requires a {} id",
                    kind, parent_kind
                )));
            }
        };

        match self.check_parent(scope, kind, parent_kind, parent_id).await {
            Ok(chain) => Ok(chain),
            Err(err) => {
                audit_parent_denial(scope, action, kind, parent_kind, parent_id, &err);
                match err {
                    RegistryError::NotFound { .. } if !scope.covers(&OwnerChain::root()) => {
                        Err(RegistryError::ParentMismatch {
                            kind,
                            parent_kind,
                            parent_id,
                        })
                    }
                    err => Err(err),
                }
            }
        }
    }

    async fn check_parent(
        &self,
        scope: &Scope,
        kind: EntityKind,
        parent_kind: EntityKind,
        parent_id: EntityId,
    ) -> Result<OwnerChain, RegistryError> {
        let mismatch = RegistryError::ParentMismatch {
            kind,
            parent_kind,
            parent_id,
        };

        // Declared ids that can be compared with the scope directly are
        // rejected before touching the store.
        let declared_outside = match (scope.role(), parent_kind) {
            (Role::BarangayAdmin, EntityKind::Barangay) => scope.barangay_id() != Some(parent_id),
            (Role::MunicipalityAdmin | Role::BarangayAdmin, EntityKind::Municipality) => {
                scope.municipality_id() != Some(parent_id)
            }
            _ => false,
        };
        if declared_outside {
            return Err(mismatch);
        }

        let parent_chain = self.ownership.owner_chain(parent_kind, parent_id).await?;
        if scope.covers(&parent_chain) {
            Ok(parent_chain)
        } else {
            Err(mismatch)
        }
    }
}
