use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::access::{audit_denial, AccessGuard, CascadeGuard, OwnerChain, OwnershipResolver, Scope};
use crate::access::ownership::fetch;
use crate::database::models::{
    Barangay, Entity, Household, Municipality, Resident, ResidentLocation, Zone,
};
use crate::database::store::{ChildTable, EntityStore, Table};
use crate::error::RegistryError;
use crate::report::{Report, ReportBuilder};
use crate::stats::{AggregationEngine, Statistics, StatsLevel};
use crate::types::{Action, EntityId, EntityKind};

/// Entity types the registry manages through the HTTP surface
#[async_trait]
pub trait Managed: Entity + Serialize + DeserializeOwned {
    /// Fill fields that are derived from the hierarchy before a write
    async fn derive(&mut self, _ownership: &OwnershipResolver) -> Result<(), RegistryError> {
        Ok(())
    }
}

impl Managed for Municipality {}
impl Managed for Barangay {}
impl Managed for Zone {}
impl Managed for Household {}

#[async_trait]
impl Managed for Resident {
    /// The cached location always comes from the household chain; whatever
    /// the client sent is overwritten
    async fn derive(&mut self, ownership: &OwnershipResolver) -> Result<(), RegistryError> {
        let location = ownership.household_location(self.household_id).await?;
        self.apply_location(location);
        Ok(())
    }
}

/// A resident whose cached location disagrees with its household chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDrift {
    pub resident_id: EntityId,
    pub household_id: EntityId,
    pub stored: ResidentLocation,
    /// `None` when the household chain is broken
    pub derived: Option<ResidentLocation>,
}

/// Result of rewriting one resident's cached location
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResync {
    pub resident: Resident,
    pub changed: bool,
}

/// Every administrative operation: scope check first, then the store or the engine
#[derive(Clone)]
pub struct RegistryService {
    store: Arc<dyn EntityStore>,
    guard: AccessGuard,
    cascade: CascadeGuard,
    engine: AggregationEngine,
    reports: ReportBuilder,
}

impl RegistryService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        let engine = AggregationEngine::new(store.clone());
        Self::with_engine(store, engine)
    }

    /// Use a preconfigured engine (e.g. one pinned to a reference date)
    pub fn with_engine(store: Arc<dyn EntityStore>, engine: AggregationEngine) -> Self {
        Self {
            guard: AccessGuard::new(store.clone()),
            cascade: CascadeGuard::new(store.clone()),
            reports: ReportBuilder::new(engine.clone()),
            engine,
            store,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Every `T` the scope can see
    pub async fn list<T>(&self, scope: &Scope) -> Result<Vec<T>, RegistryError>
    where
        T: Managed,
        dyn EntityStore: Table<T>,
    {
        let all = Table::<T>::get_all(&*self.store).await?;
        if scope.covers(&OwnerChain::root()) {
            return Ok(all);
        }

        let mut visible = Vec::new();
        for entity in all {
            match self.guard.ownership().owner_chain(T::KIND, entity.id()).await {
                Ok(chain) if scope.covers(&chain) => visible.push(entity),
                Ok(_) | Err(RegistryError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(visible)
    }

    /// Direct children of one parent; the parent must be readable
    pub async fn list_children<T>(&self, scope: &Scope, parent_id: EntityId) -> Result<Vec<T>, RegistryError>
    where
        T: Managed,
        dyn EntityStore: ChildTable<T>,
    {
        let parent_kind = T::KIND
            .parent()
            .ok_or_else(|| RegistryError::Validation(format!("{} has no parent level", T::KIND)))?;
        self.guard
            .authorize_existing(scope, Action::Read, parent_kind, parent_id)
            .await?;
        Ok(ChildTable::<T>::get_by_parent_id(&*self.store, parent_id).await?)
    }

    pub async fn get<T>(&self, scope: &Scope, id: EntityId) -> Result<T, RegistryError>
    where
        T: Managed,
        dyn EntityStore: Table<T>,
    {
        self.guard
            .authorize_existing(scope, Action::Read, T::KIND, id)
            .await?;
        fetch(&*self.store, id).await
    }

    pub async fn create<T>(&self, scope: &Scope, mut entity: T) -> Result<T, RegistryError>
    where
        T: Managed,
        dyn EntityStore: Table<T>,
    {
        self.guard
            .authorize_parent(scope, Action::Create, T::KIND, entity.parent_id())
            .await?;
        entity.derive(self.guard.ownership()).await?;
        entity.set_id(0);

        let created = Table::<T>::add(&*self.store, entity).await?;
        info!(
            "{} {} created by {} (parent {:?})",
            T::KIND,
            created.id(),
            scope.role(),
            created.parent_id()
        );
        Ok(created)
    }

    /// Replace entity `id`. The id in the path wins over one in the body; a
    /// changed parent must pass the same check as on create.
    pub async fn update<T>(&self, scope: &Scope, id: EntityId, mut entity: T) -> Result<T, RegistryError>
    where
        T: Managed,
        dyn EntityStore: Table<T>,
    {
        self.guard
            .authorize_existing(scope, Action::Update, T::KIND, id)
            .await?;
        let existing: T = fetch(&*self.store, id).await?;

        entity.set_id(id);
        if entity.parent_id() != existing.parent_id() {
            self.guard
                .authorize_parent(scope, Action::Update, T::KIND, entity.parent_id())
                .await?;
            info!(
                "{} {} moved from {:?} to {:?}",
                T::KIND,
                id,
                existing.parent_id(),
                entity.parent_id()
            );
        }
        entity.derive(self.guard.ownership()).await?;

        let updated = Table::<T>::update(&*self.store, entity).await?;
        info!("{} {} updated by {}", T::KIND, id, scope.role());
        Ok(updated)
    }

    pub async fn delete<T>(&self, scope: &Scope, id: EntityId) -> Result<(), RegistryError>
    where
        T: Managed,
        dyn EntityStore: Table<T>,
    {
        self.guard
            .authorize_existing(scope, Action::Delete, T::KIND, id)
            .await?;
        if let Err(err) = self.cascade.can_delete(T::KIND, id).await {
            audit_denial(scope, Action::Delete, T::KIND, id, &err);
            return Err(err);
        }

        if !Table::<T>::delete(&*self.store, id).await? {
            return Err(RegistryError::not_found(T::KIND, id));
        }
        info!("{} {} deleted by {}", T::KIND, id, scope.role());
        Ok(())
    }

    /// Statistics for one level; system-wide figures need an unrestricted scope
    pub async fn statistics(&self, scope: &Scope, level: StatsLevel) -> Result<Statistics, RegistryError> {
        match level {
            StatsLevel::Zone(id) => self.authorize_read(scope, EntityKind::Zone, id).await?,
            StatsLevel::Barangay(id) => self.authorize_read(scope, EntityKind::Barangay, id).await?,
            StatsLevel::Municipality(id) => {
                self.authorize_read(scope, EntityKind::Municipality, id).await?
            }
            StatsLevel::System => {
                if let Err(err) =
                    crate::access::authorize(scope, Action::Read, EntityKind::Municipality, 0, &OwnerChain::root())
                {
                    audit_denial(scope, Action::Read, EntityKind::Municipality, 0, &err);
                    return Err(err);
                }
            }
        }
        self.engine.aggregate(level).await
    }

    pub async fn build_report(&self, scope: &Scope, municipality_id: EntityId) -> Result<Report, RegistryError> {
        self.authorize_read(scope, EntityKind::Municipality, municipality_id)
            .await?;
        self.reports.build_report(municipality_id).await
    }

    /// Visible residents whose cached location has drifted from their household
    pub async fn audit_resident_locations(&self, scope: &Scope) -> Result<Vec<LocationDrift>, RegistryError> {
        let residents = Table::<Resident>::get_all(&*self.store).await?;
        let sees_everything = scope.covers(&OwnerChain::root());
        let mut derived_by_household: HashMap<EntityId, Option<ResidentLocation>> = HashMap::new();
        let mut drifts = Vec::new();

        for resident in residents {
            let derived = match derived_by_household.get(&resident.household_id).copied() {
                Some(derived) => derived,
                None => {
                    let derived = match self.guard.ownership().household_location(resident.household_id).await {
                        Ok(location) => Some(location),
                        Err(RegistryError::NotFound { .. }) => None,
                        Err(err) => return Err(err),
                    };
                    derived_by_household.insert(resident.household_id, derived);
                    derived
                }
            };

            let visible = match derived {
                Some(location) => scope.covers(&OwnerChain::barangay(
                    location.municipality_id,
                    location.barangay_id,
                )),
                None => sees_everything,
            };
            if !visible || derived == Some(resident.stored_location()) {
                continue;
            }

            drifts.push(LocationDrift {
                resident_id: resident.id,
                household_id: resident.household_id,
                stored: resident.stored_location(),
                derived,
            });
        }

        if !drifts.is_empty() {
            warn!("{} residents have a stale cached location", drifts.len());
        }
        Ok(drifts)
    }

    /// Rewrite one resident's cached location from its household chain
    pub async fn resync_resident_location(
        &self,
        scope: &Scope,
        resident_id: EntityId,
    ) -> Result<LocationResync, RegistryError> {
        self.guard
            .authorize_existing(scope, Action::Update, EntityKind::Resident, resident_id)
            .await?;
        let mut resident: Resident = fetch(&*self.store, resident_id).await?;
        let before = resident.stored_location();
        resident.derive(self.guard.ownership()).await?;

        if resident.stored_location() == before {
            return Ok(LocationResync {
                resident,
                changed: false,
            });
        }

        let resident = Table::<Resident>::update(&*self.store, resident).await?;
        info!(
            "resident {} location resynced: zone {} -> {}",
            resident_id, before.zone_id, resident.zone_id
        );
        Ok(LocationResync {
            resident,
            changed: true,
        })
    }

    async fn authorize_read(&self, scope: &Scope, kind: EntityKind, id: EntityId) -> Result<(), RegistryError> {
        self.guard
            .authorize_existing(scope, Action::Read, kind, id)
            .await
            .map(|_| ())
    }
}
