use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::EntityId;

/// Category label -> count. Labels come from raw field values; blanks land in `"Unknown"`.
pub type Distribution = BTreeMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStatistics {
    pub zone_id: EntityId,
    pub zone_name: String,
    pub household_count: u64,
    pub resident_count: u64,
    pub active_residents: u64,
    pub household_heads: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_household_size: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarangayStatistics {
    pub barangay_id: EntityId,
    pub barangay_name: String,
    pub zone_count: u64,
    pub household_count: u64,
    pub resident_count: u64,
    pub active_residents: u64,
    pub household_heads: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_household_size: Decimal,
    pub zones: Vec<ZoneStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityStatistics {
    pub municipality_id: EntityId,
    pub municipality_name: String,
    pub barangay_count: u64,
    pub zone_count: u64,
    pub household_count: u64,
    pub resident_count: u64,
    pub active_residents: u64,
    pub household_heads: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_household_size: Decimal,
    pub gender_distribution: Distribution,
    pub age_distribution: Distribution,
    pub civil_status_distribution: Distribution,
    pub barangays: Vec<BarangayStatistics>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorStatistics {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub by_role: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatistics {
    pub municipality_count: u64,
    pub barangay_count: u64,
    pub zone_count: u64,
    pub household_count: u64,
    pub resident_count: u64,
    pub active_residents: u64,
    pub household_heads: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_household_size: Decimal,
    pub gender_distribution: Distribution,
    pub age_distribution: Distribution,
    pub civil_status_distribution: Distribution,
    pub municipalities: Vec<MunicipalityStatistics>,
    pub administrators: AdministratorStatistics,
}

/// Household-level view of a municipality, used by reports
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdStatistics {
    pub total_households: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_household_size: Decimal,
    /// Keyed by member count
    pub size_distribution: Distribution,
    pub households_without_head: u64,
    pub households_with_multiple_heads: u64,
}

/// Resident-level view of a municipality, used by reports
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentStatistics {
    pub total_residents: u64,
    pub active_residents: u64,
    pub inactive_residents: u64,
    pub household_heads: u64,
    pub gender_distribution: Distribution,
    pub age_distribution: Distribution,
    pub civil_status_distribution: Distribution,
}

/// Hierarchy level to aggregate at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsLevel {
    Zone(EntityId),
    Barangay(EntityId),
    Municipality(EntityId),
    System,
}

/// Result of `AggregationEngine::aggregate`, one variant per level
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statistics {
    Zone(ZoneStatistics),
    Barangay(BarangayStatistics),
    Municipality(Box<MunicipalityStatistics>),
    System(Box<SystemStatistics>),
}
