//! Point-in-time copies of a subtree of the hierarchy.
//!
//! The rollups in `rollup` are pure functions over these; a statistic is computed
//! from one pass over the store and is not cached.

use futures::future::try_join_all;

use crate::database::models::{Barangay, Household, Municipality, Resident, Zone};
use crate::database::store::{ChildTable, EntityStore, StoreError, Table};

#[derive(Debug, Clone)]
pub struct HouseholdSnapshot {
    pub household: Household,
    pub residents: Vec<Resident>,
}

#[derive(Debug, Clone)]
pub struct ZoneSnapshot {
    pub zone: Zone,
    pub households: Vec<HouseholdSnapshot>,
}

#[derive(Debug, Clone)]
pub struct BarangaySnapshot {
    pub barangay: Barangay,
    pub zones: Vec<ZoneSnapshot>,
}

#[derive(Debug, Clone)]
pub struct MunicipalitySnapshot {
    pub municipality: Municipality,
    pub barangays: Vec<BarangaySnapshot>,
}

impl MunicipalitySnapshot {
    pub fn households(&self) -> impl Iterator<Item = &HouseholdSnapshot> {
        self.barangays
            .iter()
            .flat_map(|b| b.zones.iter())
            .flat_map(|z| z.households.iter())
    }

    pub fn residents(&self) -> impl Iterator<Item = &Resident> {
        self.households().flat_map(|h| h.residents.iter())
    }
}

/// Collects snapshots, one store call per child list
pub struct SnapshotCollector<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> SnapshotCollector<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    pub async fn household(&self, household: Household) -> Result<HouseholdSnapshot, StoreError> {
        let residents = ChildTable::<Resident>::get_by_parent_id(self.store, household.id).await?;
        Ok(HouseholdSnapshot { household, residents })
    }

    pub async fn zone(&self, zone: Zone) -> Result<ZoneSnapshot, StoreError> {
        let households = ChildTable::<Household>::get_by_parent_id(self.store, zone.id).await?;
        let households = try_join_all(households.into_iter().map(|h| self.household(h))).await?;
        Ok(ZoneSnapshot { zone, households })
    }

    pub async fn barangay(&self, barangay: Barangay) -> Result<BarangaySnapshot, StoreError> {
        let zones = ChildTable::<Zone>::get_by_parent_id(self.store, barangay.id).await?;
        let zones = try_join_all(zones.into_iter().map(|z| self.zone(z))).await?;
        Ok(BarangaySnapshot { barangay, zones })
    }

    pub async fn municipality(&self, municipality: Municipality) -> Result<MunicipalitySnapshot, StoreError> {
        let barangays = ChildTable::<Barangay>::get_by_parent_id(self.store, municipality.id).await?;
        let barangays = try_join_all(barangays.into_iter().map(|b| self.barangay(b))).await?;
        Ok(MunicipalitySnapshot {
            municipality,
            barangays,
        })
    }

    pub async fn all_municipalities(&self) -> Result<Vec<MunicipalitySnapshot>, StoreError> {
        let municipalities = Table::<Municipality>::get_all(self.store).await?;
        try_join_all(municipalities.into_iter().map(|m| self.municipality(m))).await
    }
}
