use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::model::*;
use super::rollup;
use super::snapshot::{MunicipalitySnapshot, SnapshotCollector};
use crate::access::ownership::fetch;
use crate::database::models::{AdminAccount, Barangay, Municipality, Zone};
use crate::database::store::{EntityStore, Table};
use crate::error::RegistryError;
use crate::types::EntityId;

/// Bottom-up statistics over the current store state.
///
/// Authorization is the caller's job; the engine answers for any id it is given.
#[derive(Clone)]
pub struct AggregationEngine {
    store: Arc<dyn EntityStore>,
    reference_date: Option<NaiveDate>,
}

impl AggregationEngine {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            reference_date: None,
        }
    }

    /// Pin the date ages are computed against (defaults to today, UTC)
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn as_of(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn collector(&self) -> SnapshotCollector<'_> {
        SnapshotCollector::new(&*self.store)
    }

    pub async fn aggregate(&self, level: StatsLevel) -> Result<Statistics, RegistryError> {
        Ok(match level {
            StatsLevel::Zone(id) => Statistics::Zone(self.zone_stats(id).await?),
            StatsLevel::Barangay(id) => Statistics::Barangay(self.barangay_stats(id).await?),
            StatsLevel::Municipality(id) => {
                Statistics::Municipality(Box::new(self.municipality_stats(id).await?))
            }
            StatsLevel::System => Statistics::System(Box::new(self.system_stats().await?)),
        })
    }

    pub async fn zone_stats(&self, zone_id: EntityId) -> Result<ZoneStatistics, RegistryError> {
        let zone: Zone = fetch(&*self.store, zone_id).await?;
        let snapshot = self.collector().zone(zone).await?;
        let stats = rollup::zone_statistics(&snapshot);
        debug!(
            "zone {} stats: {} households, {} residents",
            zone_id, stats.household_count, stats.resident_count
        );
        Ok(stats)
    }

    pub async fn barangay_stats(&self, barangay_id: EntityId) -> Result<BarangayStatistics, RegistryError> {
        let barangay: Barangay = fetch(&*self.store, barangay_id).await?;
        let snapshot = self.collector().barangay(barangay).await?;
        let stats = rollup::barangay_statistics(&snapshot);
        debug!(
            "barangay {} stats: {} zones, {} residents",
            barangay_id, stats.zone_count, stats.resident_count
        );
        Ok(stats)
    }

    pub async fn municipality_stats(
        &self,
        municipality_id: EntityId,
    ) -> Result<MunicipalityStatistics, RegistryError> {
        let snapshot = self.municipality_snapshot(municipality_id).await?;
        let stats = rollup::municipality_statistics(&snapshot, self.as_of());
        debug!(
            "municipality {} stats: {} barangays, {} residents",
            municipality_id, stats.barangay_count, stats.resident_count
        );
        Ok(stats)
    }

    pub async fn system_stats(&self) -> Result<SystemStatistics, RegistryError> {
        let snapshots = self.collector().all_municipalities().await?;
        let admins = Table::<AdminAccount>::get_all(&*self.store).await?;
        let stats = rollup::system_statistics(&snapshots, &admins, self.as_of());
        debug!(
            "system stats: {} municipalities, {} residents, {} administrators",
            stats.municipality_count, stats.resident_count, stats.administrators.total
        );
        Ok(stats)
    }

    /// Full subtree of one municipality, for callers that derive several views from one read
    pub async fn municipality_snapshot(
        &self,
        municipality_id: EntityId,
    ) -> Result<MunicipalitySnapshot, RegistryError> {
        let municipality: Municipality = fetch(&*self.store, municipality_id).await?;
        Ok(self.collector().municipality(municipality).await?)
    }
}
