use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::database::models::{
    Barangay, Entity, Household, Municipality, Resident, ResidentLocation, Zone,
};
use crate::database::store::{EntityStore, Table};
use crate::error::RegistryError;
use crate::types::{EntityId, EntityKind};

/// Municipality and barangay an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerChain {
    pub municipality_id: Option<EntityId>,
    pub barangay_id: Option<EntityId>,
}

impl OwnerChain {
    pub fn new(municipality_id: Option<EntityId>, barangay_id: Option<EntityId>) -> Self {
        Self {
            municipality_id,
            barangay_id,
        }
    }

    /// Chain of something above every municipality (the system as a whole)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn municipality(municipality_id: EntityId) -> Self {
        Self::new(Some(municipality_id), None)
    }

    pub fn barangay(municipality_id: EntityId, barangay_id: EntityId) -> Self {
        Self::new(Some(municipality_id), Some(barangay_id))
    }
}

/// Load one row or fail with `NotFound` for its kind
pub(crate) async fn fetch<T, S>(store: &S, id: EntityId) -> Result<T, RegistryError>
where
    T: Entity,
    S: Table<T> + ?Sized,
{
    Table::<T>::get_by_id(store, id)
        .await?
        .ok_or_else(|| RegistryError::not_found(T::KIND, id))
}

/// Walks the store upward to find who owns an entity.
///
/// Residents are always resolved through their household; the cached location
/// fields on the resident row are ignored.
#[derive(Clone)]
pub struct OwnershipResolver {
    store: Arc<dyn EntityStore>,
}

impl OwnershipResolver {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn owner_chain(&self, kind: EntityKind, id: EntityId) -> Result<OwnerChain, RegistryError> {
        match kind {
            EntityKind::Municipality => {
                let municipality: Municipality = fetch(&*self.store, id).await?;
                Ok(OwnerChain::municipality(municipality.id))
            }
            EntityKind::Barangay => self.barangay_chain(id).await,
            EntityKind::Zone => {
                let zone: Zone = fetch(&*self.store, id).await?;
                self.linked(EntityKind::Zone, id, self.barangay_chain(zone.barangay_id))
                    .await
            }
            EntityKind::Household => {
                let location = self.household_location(id).await?;
                Ok(OwnerChain::barangay(location.municipality_id, location.barangay_id))
            }
            EntityKind::Resident => {
                let resident: Resident = fetch(&*self.store, id).await?;
                let location = self
                    .linked(EntityKind::Resident, id, self.household_location(resident.household_id))
                    .await?;
                Ok(OwnerChain::barangay(location.municipality_id, location.barangay_id))
            }
        }
    }

    /// Derived zone, barangay and municipality of a household
    pub async fn household_location(&self, household_id: EntityId) -> Result<ResidentLocation, RegistryError> {
        let household: Household = fetch(&*self.store, household_id).await?;
        let zone: Zone = self
            .linked(EntityKind::Household, household_id, fetch(&*self.store, household.zone_id))
            .await?;
        let chain = self
            .linked(EntityKind::Household, household_id, self.barangay_chain(zone.barangay_id))
            .await?;

        Ok(ResidentLocation {
            zone_id: zone.id,
            barangay_id: zone.barangay_id,
            municipality_id: chain.municipality_id.unwrap_or_default(),
        })
    }

    async fn barangay_chain(&self, barangay_id: EntityId) -> Result<OwnerChain, RegistryError> {
        let barangay: Barangay = fetch(&*self.store, barangay_id).await?;
        let municipality: Municipality = self
            .linked(
                EntityKind::Barangay,
                barangay_id,
                fetch(&*self.store, barangay.municipality_id),
            )
            .await?;
        Ok(OwnerChain::barangay(municipality.id, barangay.id))
    }

    /// A missing parent means the row is orphaned; it is reported as the
    /// requested entity being not found
    async fn linked<T>(
        &self,
        kind: EntityKind,
        id: EntityId,
        parent: impl std::future::Future<Output = Result<T, RegistryError>>,
    ) -> Result<T, RegistryError> {
        match parent.await {
            Err(RegistryError::NotFound { kind: missing_kind, id: missing_id }) => {
                warn!(
                    "orphaned {} {}: parent {} {} does not exist",
                    kind, id, missing_kind, missing_id
                );
                Err(RegistryError::not_found(kind, id))
            }
            other => other,
        }
    }
}
