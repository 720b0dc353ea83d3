//! Composite municipality report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::RegistryError;
use crate::stats::{
    rollup, AggregationEngine, HouseholdStatistics, MunicipalityStatistics, ResidentStatistics,
};
use crate::types::EntityId;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub municipality_statistics: MunicipalityStatistics,
    pub household_statistics: HouseholdStatistics,
    pub resident_statistics: ResidentStatistics,
    pub summary: String,
}

#[derive(Clone)]
pub struct ReportBuilder {
    engine: AggregationEngine,
}

impl ReportBuilder {
    pub fn new(engine: AggregationEngine) -> Self {
        Self { engine }
    }

    /// Recomputes every section from one snapshot; nothing is stored
    pub async fn build_report(&self, municipality_id: EntityId) -> Result<Report, RegistryError> {
        let generated_at = Utc::now();
        let snapshot = self.engine.municipality_snapshot(municipality_id).await?;
        let as_of = self.engine.as_of();

        let municipality_statistics = rollup::municipality_statistics(&snapshot, as_of);
        let household_statistics = rollup::household_statistics(&snapshot);
        let resident_statistics = rollup::resident_statistics(&snapshot, as_of);
        let summary = summary_line(&municipality_statistics, generated_at);

        info!("built report for municipality {}", municipality_id);

        Ok(Report {
            generated_at,
            municipality_statistics,
            household_statistics,
            resident_statistics,
            summary,
        })
    }
}

fn summary_line(stats: &MunicipalityStatistics, generated_at: DateTime<Utc>) -> String {
    format!(
        "Municipality {} ({}) report generated {}: {} barangays, {} zones, {} households, {} residents",
        stats.municipality_id,
        stats.municipality_name,
        generated_at.format("%Y-%m-%d"),
        stats.barangay_count,
        stats.zone_count,
        stats.household_count,
        stats.resident_count,
    )
}
