use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::{
    AdminAccount, Barangay, Entity, Household, Municipality, Record, Resident, Zone,
};
use crate::database::store::{ChildTable, EntityStore, StoreError, Table};
use crate::types::EntityId;

#[doc(hidden)]
pub struct TableState<T> {
    rows: BTreeMap<EntityId, T>,
    next_id: EntityId,
}

impl<T> Default for TableState<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Process-local entity store used by tests, demos and the `memory` backend.
/// Rows are kept in id order so listings are deterministic.
#[derive(Default)]
pub struct InMemoryStore {
    municipalities: RwLock<TableState<Municipality>>,
    barangays: RwLock<TableState<Barangay>>,
    zones: RwLock<TableState<Zone>>,
    households: RwLock<TableState<Household>>,
    residents: RwLock<TableState<Resident>>,
    admins: RwLock<TableState<AdminAccount>>,
    offline: AtomicBool,
}

/// Maps a record type to the table that holds it
#[doc(hidden)]
pub trait Holds<T> {
    fn state(&self) -> &RwLock<TableState<T>>;
}

macro_rules! holds {
    ($ty:ty, $field:ident) => {
        impl Holds<$ty> for InMemoryStore {
            fn state(&self) -> &RwLock<TableState<$ty>> {
                &self.$field
            }
        }
    };
}

holds!(Municipality, municipalities);
holds!(Barangay, barangays);
holds!(Zone, zones);
holds!(Household, households);
holds!(Resident, residents);
holds!(AdminAccount, admins);

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row keeping its id, for fixtures that need known identifiers
    pub async fn seed<T: Record>(&self, entity: T) -> T
    where
        Self: Holds<T>,
    {
        let mut state = self.state().write().await;
        let id = if entity.id() > 0 { entity.id() } else { state.next_id };
        let mut entity = entity;
        entity.set_id(id);
        state.next_id = state.next_id.max(id + 1);
        state.rows.insert(id, entity.clone());
        entity
    }

    /// Simulate the backing storage going away; every call fails with `Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Record> Table<T> for InMemoryStore
where
    InMemoryStore: Holds<T>,
{
    async fn get_by_id(&self, id: EntityId) -> Result<Option<T>, StoreError> {
        self.check_online()?;
        Ok(self.state().read().await.rows.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        self.check_online()?;
        Ok(self.state().read().await.rows.values().cloned().collect())
    }

    async fn add(&self, mut entity: T) -> Result<T, StoreError> {
        self.check_online()?;
        let mut state = self.state().write().await;
        let id = state.next_id;
        state.next_id += 1;
        entity.set_id(id);
        state.rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, StoreError> {
        self.check_online()?;
        let mut state = self.state().write().await;
        match state.rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(entity)
            }
            None => Err(StoreError::MissingRow {
                table: T::TABLE,
                id: entity.id(),
            }),
        }
    }

    async fn delete(&self, id: EntityId) -> Result<bool, StoreError> {
        self.check_online()?;
        Ok(self.state().write().await.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl<T: Entity> ChildTable<T> for InMemoryStore
where
    InMemoryStore: Holds<T>,
{
    async fn get_by_parent_id(&self, parent_id: EntityId) -> Result<Vec<T>, StoreError> {
        self.check_online()?;
        Ok(self
            .state()
            .read()
            .await
            .rows
            .values()
            .filter(|row| row.parent_id() == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn has_children(&self, parent_id: EntityId) -> Result<bool, StoreError> {
        self.check_online()?;
        Ok(self
            .state()
            .read()
            .await
            .rows
            .values()
            .any(|row| row.parent_id() == Some(parent_id)))
    }
}

impl EntityStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: EntityId, barangay_id: EntityId) -> Zone {
        Zone {
            id,
            name: format!("Zone {}", id),
            description: None,
            barangay_id,
        }
    }

    #[tokio::test]
    async fn add_assigns_ids_after_seeded_rows() {
        let store = InMemoryStore::new();
        store.seed(zone(100, 10)).await;
        let added = Table::<Zone>::add(&store, zone(0, 10)).await.unwrap();
        assert_eq!(added.id, 101);
    }

    #[tokio::test]
    async fn children_are_found_by_parent() {
        let store = InMemoryStore::new();
        store.seed(zone(1, 10)).await;
        store.seed(zone(2, 20)).await;
        store.seed(zone(3, 10)).await;

        let under_ten = ChildTable::<Zone>::get_by_parent_id(&store, 10).await.unwrap();
        assert_eq!(under_ten.iter().map(|z| z.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(ChildTable::<Zone>::has_children(&store, 20).await.unwrap());
        assert!(!ChildTable::<Zone>::has_children(&store, 30).await.unwrap());
    }

    #[tokio::test]
    async fn update_of_missing_row_fails() {
        let store = InMemoryStore::new();
        let err = Table::<Zone>::update(&store, zone(5, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingRow { table: "zones", id: 5 }));
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        let err = Table::<Zone>::get_all(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
