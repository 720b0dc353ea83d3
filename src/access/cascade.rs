use std::sync::Arc;

use crate::database::models::{Barangay, Household, Resident, Zone};
use crate::database::store::{ChildTable, EntityStore};
use crate::error::RegistryError;
use crate::types::{EntityId, EntityKind};

/// Blocks deletion of any entity that still has children
#[derive(Clone)]
pub struct CascadeGuard {
    store: Arc<dyn EntityStore>,
}

impl CascadeGuard {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Existence check only: the first dependent row is enough to refuse
    pub async fn can_delete(&self, kind: EntityKind, id: EntityId) -> Result<(), RegistryError> {
        let store = &*self.store;
        let has_dependents = match kind {
            EntityKind::Municipality => ChildTable::<Barangay>::has_children(store, id).await?,
            EntityKind::Barangay => ChildTable::<Zone>::has_children(store, id).await?,
            EntityKind::Zone => ChildTable::<Household>::has_children(store, id).await?,
            EntityKind::Household => ChildTable::<Resident>::has_children(store, id).await?,
            EntityKind::Resident => false,
        };

        match (has_dependents, kind.child()) {
            (true, Some(dependent)) => Err(RegistryError::HasDependents { kind, id, dependent }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryStore;
    use crate::database::store::Table;

    #[tokio::test]
    async fn barangay_with_zone_is_blocked_until_zone_is_gone() {
        let store = Arc::new(InMemoryStore::new());
        store
            .seed(Barangay {
                id: 10,
                name: "B1".into(),
                code: "B1".into(),
                municipality_id: 1,
            })
            .await;
        store
            .seed(Zone {
                id: 100,
                name: "Z1".into(),
                description: None,
                barangay_id: 10,
            })
            .await;
        let cascade = CascadeGuard::new(store.clone());

        assert!(matches!(
            cascade.can_delete(EntityKind::Barangay, 10).await,
            Err(RegistryError::HasDependents {
                kind: EntityKind::Barangay,
                id: 10,
                dependent: EntityKind::Zone
            })
        ));
        assert!(cascade.can_delete(EntityKind::Zone, 100).await.is_ok());

        Table::<Zone>::delete(&*store, 100).await.unwrap();
        assert!(cascade.can_delete(EntityKind::Barangay, 10).await.is_ok());
    }

    #[tokio::test]
    async fn residents_are_always_deletable() {
        let cascade = CascadeGuard::new(Arc::new(InMemoryStore::new()));
        assert!(cascade.can_delete(EntityKind::Resident, 1).await.is_ok());
    }
}
