//! Pure reductions from snapshots to statistics.
//!
//! Counts are summed bottom-up: a barangay adds its zones' counts, a
//! municipality adds its barangays'. Averages are recomputed from the summed
//! totals at every level, never averaged from child averages.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::model::*;
use super::snapshot::{BarangaySnapshot, HouseholdSnapshot, MunicipalitySnapshot, ZoneSnapshot};
use crate::database::models::{AdminAccount, Resident};

pub const UNKNOWN: &str = "Unknown";

/// `total / count` rounded to 2 places, half away from zero; 0 when `count` is 0
pub fn average(total: u64, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    let mut avg = (Decimal::from(total) / Decimal::from(count))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    avg.rescale(2);
    avg
}

/// Distribution label for a raw field value
pub fn label(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

pub fn age_bracket(age: Option<u32>) -> &'static str {
    match age {
        Some(0..=17) => "0-17",
        Some(18..=35) => "18-35",
        Some(36..=59) => "36-59",
        Some(_) => "60+",
        None => UNKNOWN,
    }
}

fn bump(distribution: &mut Distribution, key: impl Into<String>) {
    *distribution.entry(key.into()).or_insert(0) += 1;
}

fn merge(into: &mut Distribution, from: &Distribution) {
    for (key, count) in from {
        *into.entry(key.clone()).or_insert(0) += count;
    }
}

fn count(n: usize) -> u64 {
    n as u64
}

/// Resident-level distributions shared by municipality, system and report output
#[derive(Debug, Default)]
struct Demographics {
    gender: Distribution,
    age: Distribution,
    civil_status: Distribution,
}

impl Demographics {
    fn add(&mut self, resident: &Resident, as_of: NaiveDate) {
        bump(&mut self.gender, label(resident.gender.as_deref()));
        bump(&mut self.age, age_bracket(resident.age_on(as_of)));
        bump(&mut self.civil_status, label(resident.civil_status.as_deref()));
    }

    fn of_municipality(snapshot: &MunicipalitySnapshot, as_of: NaiveDate) -> Self {
        let mut demographics = Self::default();
        for resident in snapshot.residents() {
            demographics.add(resident, as_of);
        }
        demographics
    }
}

pub fn zone_statistics(snapshot: &ZoneSnapshot) -> ZoneStatistics {
    let household_count = count(snapshot.households.len());
    let mut resident_count = 0;
    let mut active_residents = 0;
    let mut household_heads = 0;

    for household in &snapshot.households {
        resident_count += count(household.residents.len());
        active_residents += count(household.residents.iter().filter(|r| r.is_active).count());
        household_heads += count(household.residents.iter().filter(|r| r.is_head).count());
    }

    ZoneStatistics {
        zone_id: snapshot.zone.id,
        zone_name: snapshot.zone.name.clone(),
        household_count,
        resident_count,
        active_residents,
        household_heads,
        avg_household_size: average(resident_count, household_count),
    }
}

pub fn barangay_statistics(snapshot: &BarangaySnapshot) -> BarangayStatistics {
    let zones: Vec<ZoneStatistics> = snapshot.zones.iter().map(zone_statistics).collect();
    let household_count = zones.iter().map(|z| z.household_count).sum();
    let resident_count = zones.iter().map(|z| z.resident_count).sum();

    BarangayStatistics {
        barangay_id: snapshot.barangay.id,
        barangay_name: snapshot.barangay.name.clone(),
        zone_count: count(zones.len()),
        household_count,
        resident_count,
        active_residents: zones.iter().map(|z| z.active_residents).sum(),
        household_heads: zones.iter().map(|z| z.household_heads).sum(),
        avg_household_size: average(resident_count, household_count),
        zones,
    }
}

pub fn municipality_statistics(snapshot: &MunicipalitySnapshot, as_of: NaiveDate) -> MunicipalityStatistics {
    let barangays: Vec<BarangayStatistics> = snapshot.barangays.iter().map(barangay_statistics).collect();
    let household_count = barangays.iter().map(|b| b.household_count).sum();
    let resident_count = barangays.iter().map(|b| b.resident_count).sum();
    let demographics = Demographics::of_municipality(snapshot, as_of);

    MunicipalityStatistics {
        municipality_id: snapshot.municipality.id,
        municipality_name: snapshot.municipality.name.clone(),
        barangay_count: count(barangays.len()),
        zone_count: barangays.iter().map(|b| b.zone_count).sum(),
        household_count,
        resident_count,
        active_residents: barangays.iter().map(|b| b.active_residents).sum(),
        household_heads: barangays.iter().map(|b| b.household_heads).sum(),
        avg_household_size: average(resident_count, household_count),
        gender_distribution: demographics.gender,
        age_distribution: demographics.age,
        civil_status_distribution: demographics.civil_status,
        barangays,
    }
}

pub fn administrator_statistics(admins: &[AdminAccount]) -> AdministratorStatistics {
    let mut stats = AdministratorStatistics::default();
    for admin in admins {
        stats.total += 1;
        if admin.is_active {
            stats.active += 1;
        } else {
            stats.inactive += 1;
        }
        let role = admin
            .parsed_role()
            .map(|r| r.as_str().to_string())
            .unwrap_or_else(|| label(Some(admin.role.as_str())));
        bump(&mut stats.by_role, role);
    }
    stats
}

pub fn system_statistics(
    municipalities: &[MunicipalitySnapshot],
    admins: &[AdminAccount],
    as_of: NaiveDate,
) -> SystemStatistics {
    let mut demographics = Demographics::default();
    let mut rolled = Vec::with_capacity(municipalities.len());
    for snapshot in municipalities {
        let stats = municipality_statistics(snapshot, as_of);
        merge(&mut demographics.gender, &stats.gender_distribution);
        merge(&mut demographics.age, &stats.age_distribution);
        merge(&mut demographics.civil_status, &stats.civil_status_distribution);
        rolled.push(stats);
    }

    let household_count = rolled.iter().map(|m| m.household_count).sum();
    let resident_count = rolled.iter().map(|m| m.resident_count).sum();

    SystemStatistics {
        municipality_count: count(rolled.len()),
        barangay_count: rolled.iter().map(|m| m.barangay_count).sum(),
        zone_count: rolled.iter().map(|m| m.zone_count).sum(),
        household_count,
        resident_count,
        active_residents: rolled.iter().map(|m| m.active_residents).sum(),
        household_heads: rolled.iter().map(|m| m.household_heads).sum(),
        avg_household_size: average(resident_count, household_count),
        gender_distribution: demographics.gender,
        age_distribution: demographics.age,
        civil_status_distribution: demographics.civil_status,
        municipalities: rolled,
        administrators: administrator_statistics(admins),
    }
}

pub fn household_statistics(snapshot: &MunicipalitySnapshot) -> HouseholdStatistics {
    let households: Vec<&HouseholdSnapshot> = snapshot.households().collect();
    let mut size_distribution = Distribution::new();
    let mut without_head = 0;
    let mut multiple_heads = 0;
    let mut residents = 0;

    for household in &households {
        let size = household.residents.len();
        residents += count(size);
        bump(&mut size_distribution, size.to_string());
        match household.residents.iter().filter(|r| r.is_head).count() {
            0 => without_head += 1,
            1 => {}
            _ => multiple_heads += 1,
        }
    }

    HouseholdStatistics {
        total_households: count(households.len()),
        avg_household_size: average(residents, count(households.len())),
        size_distribution,
        households_without_head: without_head,
        households_with_multiple_heads: multiple_heads,
    }
}

pub fn resident_statistics(snapshot: &MunicipalitySnapshot, as_of: NaiveDate) -> ResidentStatistics {
    let demographics = Demographics::of_municipality(snapshot, as_of);
    let mut total = 0;
    let mut active = 0;
    let mut heads = 0;
    for resident in snapshot.residents() {
        total += 1;
        if resident.is_active {
            active += 1;
        }
        if resident.is_head {
            heads += 1;
        }
    }

    ResidentStatistics {
        total_residents: total,
        active_residents: active,
        inactive_residents: total - active,
        household_heads: heads,
        gender_distribution: demographics.gender,
        age_distribution: demographics.age,
        civil_status_distribution: demographics.civil_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Barangay, Household, Municipality, Zone};

    fn resident(id: i64, head: bool, active: bool, gender: Option<&str>) -> Resident {
        Resident {
            id,
            first_name: format!("R{}", id),
            middle_name: None,
            last_name: "Dela Cruz".into(),
            suffix: None,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
            gender: gender.map(str::to_string),
            civil_status: None,
            occupation: None,
            contact_number: None,
            is_head: head,
            is_active: active,
            household_id: 0,
            zone_id: 0,
            barangay_id: 0,
            municipality_id: 0,
        }
    }

    fn household(id: i64, residents: Vec<Resident>) -> HouseholdSnapshot {
        HouseholdSnapshot {
            household: Household {
                id,
                name: format!("H{}", id),
                zone_id: 0,
            },
            residents,
        }
    }

    fn zone(id: i64, households: Vec<HouseholdSnapshot>) -> ZoneSnapshot {
        ZoneSnapshot {
            zone: Zone {
                id,
                name: format!("Z{}", id),
                description: None,
                barangay_id: 0,
            },
            households,
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn average_rounds_half_away_from_zero() {
        assert_eq!(average(0, 0), Decimal::ZERO);
        assert_eq!(average(7, 3), Decimal::new(233, 2));
        assert_eq!(average(2, 1), Decimal::new(200, 2));
        assert_eq!(average(2, 1).to_string(), "2.00");
        // 1/8 = 0.125 -> 0.13 (banker's rounding would give 0.12)
        assert_eq!(average(1, 8), Decimal::new(13, 2));
        assert_eq!(average(5, 8), Decimal::new(63, 2));
    }

    #[test]
    fn blank_values_fall_into_unknown() {
        assert_eq!(label(None), "Unknown");
        assert_eq!(label(Some("   ")), "Unknown");
        assert_eq!(label(Some(" Female ")), "Female");
        assert_eq!(age_bracket(None), "Unknown");
        assert_eq!(age_bracket(Some(17)), "0-17");
        assert_eq!(age_bracket(Some(60)), "60+");
    }

    #[test]
    fn zone_counts_heads_and_active_residents() {
        let snapshot = zone(
            100,
            vec![household(
                1000,
                vec![resident(1, true, true, Some("Male")), resident(2, false, true, None)],
            )],
        );
        let stats = zone_statistics(&snapshot);
        assert_eq!(stats.household_count, 1);
        assert_eq!(stats.resident_count, 2);
        assert_eq!(stats.active_residents, 2);
        assert_eq!(stats.household_heads, 1);
        assert_eq!(stats.avg_household_size, Decimal::new(200, 2));
    }

    #[test]
    fn empty_zone_has_zero_average() {
        let stats = zone_statistics(&zone(1, vec![]));
        assert_eq!(stats.household_count, 0);
        assert_eq!(stats.avg_household_size, Decimal::ZERO);
    }

    #[test]
    fn barangay_average_comes_from_totals_not_zone_averages() {
        // zone A: 1 household of 1 (avg 1.00); zone B: 3 households, 9 residents (avg 3.00)
        // average of averages would be 2.00, the real average is 10 / 4 = 2.50
        let a = zone(1, vec![household(1, vec![resident(1, true, true, None)])]);
        let b = zone(
            2,
            (0..3)
                .map(|h| {
                    household(
                        10 + h,
                        (0..3).map(|r| resident(100 + h * 10 + r, r == 0, true, None)).collect(),
                    )
                })
                .collect(),
        );
        let snapshot = BarangaySnapshot {
            barangay: Barangay {
                id: 10,
                name: "Centro".into(),
                code: "CEN".into(),
                municipality_id: 1,
            },
            zones: vec![a, b],
        };

        let stats = barangay_statistics(&snapshot);
        assert_eq!(stats.zone_count, 2);
        assert_eq!(stats.household_count, 4);
        assert_eq!(stats.resident_count, 10);
        assert_eq!(stats.avg_household_size, Decimal::new(250, 2));
        assert_eq!(stats.zones.len(), 2);
    }

    fn municipality(households: Vec<HouseholdSnapshot>) -> MunicipalitySnapshot {
        MunicipalitySnapshot {
            municipality: Municipality {
                id: 1,
                name: "Alpha".into(),
                code: "ALP".into(),
                region: "R".into(),
                province: "P".into(),
            },
            barangays: vec![BarangaySnapshot {
                barangay: Barangay {
                    id: 10,
                    name: "Centro".into(),
                    code: "CEN".into(),
                    municipality_id: 1,
                },
                zones: vec![zone(100, households)],
            }],
        }
    }

    #[test]
    fn municipality_gender_distribution_keeps_unknowns() {
        let snapshot = municipality(vec![household(
            1,
            vec![
                resident(1, true, true, Some("Female")),
                resident(2, false, true, Some("Male")),
                resident(3, false, false, None),
                resident(4, false, true, Some("")),
            ],
        )]);
        let stats = municipality_statistics(&snapshot, as_of());
        assert_eq!(stats.gender_distribution.get("Female"), Some(&1));
        assert_eq!(stats.gender_distribution.get("Male"), Some(&1));
        assert_eq!(stats.gender_distribution.get("Unknown"), Some(&2));
        assert_eq!(stats.gender_distribution.values().sum::<u64>(), stats.resident_count);
        assert_eq!(stats.age_distribution.get("18-35"), Some(&4));
        assert_eq!(stats.civil_status_distribution.get("Unknown"), Some(&4));
    }

    #[test]
    fn household_statistics_flag_head_anomalies() {
        let snapshot = municipality(vec![
            household(1, vec![resident(1, true, true, None), resident(2, false, true, None)]),
            household(2, vec![resident(3, false, true, None)]),
            household(3, vec![resident(4, true, true, None), resident(5, true, true, None)]),
            household(4, vec![]),
        ]);
        let stats = household_statistics(&snapshot);
        assert_eq!(stats.total_households, 4);
        assert_eq!(stats.households_without_head, 2);
        assert_eq!(stats.households_with_multiple_heads, 1);
        assert_eq!(stats.size_distribution.get("2"), Some(&2));
        assert_eq!(stats.size_distribution.get("0"), Some(&1));
        assert_eq!(stats.avg_household_size, Decimal::new(125, 2));
    }

    #[test]
    fn resident_statistics_split_active_and_inactive() {
        let snapshot = municipality(vec![household(
            1,
            vec![resident(1, true, true, None), resident(2, false, false, None)],
        )]);
        let stats = resident_statistics(&snapshot, as_of());
        assert_eq!(stats.total_residents, 2);
        assert_eq!(stats.active_residents, 1);
        assert_eq!(stats.inactive_residents, 1);
        assert_eq!(stats.household_heads, 1);
    }

    #[test]
    fn system_merges_every_distribution_across_municipalities() {
        let married = |id: i64| Resident {
            civil_status: Some("Married".into()),
            ..resident(id, true, true, Some("Female"))
        };
        let first = municipality(vec![household(1, vec![married(1), resident(2, false, true, None)])]);
        let mut second = municipality(vec![household(2, vec![married(3)])]);
        second.municipality.id = 2;

        let stats = system_statistics(&[first, second], &[], as_of());
        assert_eq!(stats.resident_count, 3);
        assert_eq!(stats.civil_status_distribution.get("Married"), Some(&2));
        assert_eq!(stats.civil_status_distribution.get("Unknown"), Some(&1));
        assert_eq!(stats.gender_distribution.get("Female"), Some(&2));
        assert_eq!(
            stats.civil_status_distribution.values().sum::<u64>(),
            stats.resident_count
        );
    }

    #[test]
    fn administrators_counted_by_activity_and_role() {
        let admin = |id: i64, role: &str, active: bool| AdminAccount {
            id,
            username: format!("admin{}", id),
            role: role.into(),
            municipality_id: None,
            barangay_id: None,
            is_active: active,
        };
        let stats = administrator_statistics(&[
            admin(1, "SuperAdmin", true),
            admin(2, "barangay_admin", false),
            admin(3, "BarangayAdmin", true),
            admin(4, "", true),
        ]);
        assert_eq!((stats.total, stats.active, stats.inactive), (4, 3, 1));
        assert_eq!(stats.by_role.get("BarangayAdmin"), Some(&2));
        assert_eq!(stats.by_role.get("Unknown"), Some(&1));
    }
}
