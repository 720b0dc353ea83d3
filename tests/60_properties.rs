use std::sync::Arc;

use proptest::prelude::*;

use barangay_registry::access::{AccessGuard, Scope};
use barangay_registry::database::memory::InMemoryStore;
use barangay_registry::database::models::{Barangay, Household, Municipality, Resident, Zone};
use barangay_registry::error::RegistryError;
use barangay_registry::stats::AggregationEngine;
use barangay_registry::types::{Action, EntityKind};

const MAX_MUNICIPALITIES: usize = 3;
const MAX_FAN_OUT: usize = 3;
const MAX_RESIDENTS: usize = 4;

/// municipality -> barangay -> zone -> household -> resident count
type Shape = Vec<Vec<Vec<Vec<usize>>>>;

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let household = 0usize..=MAX_RESIDENTS;
    let zone = prop::collection::vec(household, 0..=MAX_FAN_OUT);
    let barangay = prop::collection::vec(zone, 0..=MAX_FAN_OUT);
    let municipality = prop::collection::vec(barangay, 0..=MAX_FAN_OUT);
    prop::collection::vec(municipality, 1..=MAX_MUNICIPALITIES)
}

/// (role, municipality index, barangay index) picked relative to the shape
fn scope_strategy() -> impl Strategy<Value = (u8, i64, i64)> {
    (0u8..3, 1i64..=(MAX_MUNICIPALITIES as i64 + 1), 1i64..=12)
}

struct Seeded {
    store: Arc<InMemoryStore>,
    /// (zone id, municipality id, barangay id)
    zones: Vec<(i64, i64, i64)>,
    /// (barangay id, municipality id)
    barangays: Vec<(i64, i64)>,
}

async fn seed(shape: &Shape) -> Seeded {
    let store = Arc::new(InMemoryStore::new());
    let mut zones = Vec::new();
    let mut barangays = Vec::new();
    let (mut barangay_id, mut zone_id, mut household_id, mut resident_id) = (0, 0, 0, 0);

    for (m, barangay_shapes) in shape.iter().enumerate() {
        let municipality_id = m as i64 + 1;
        store
            .seed(Municipality {
                id: municipality_id,
                name: format!("M{}", municipality_id),
                code: format!("M{}", municipality_id),
                region: "R".into(),
                province: "P".into(),
            })
            .await;

        for zone_shapes in barangay_shapes {
            barangay_id += 1;
            barangays.push((barangay_id, municipality_id));
            store
                .seed(Barangay {
                    id: barangay_id,
                    name: format!("B{}", barangay_id),
                    code: format!("B{}", barangay_id),
                    municipality_id,
                })
                .await;

            for household_sizes in zone_shapes {
                zone_id += 1;
                zones.push((zone_id, municipality_id, barangay_id));
                store
                    .seed(Zone {
                        id: zone_id,
                        name: format!("Z{}", zone_id),
                        description: None,
                        barangay_id,
                    })
                    .await;

                for size in household_sizes {
                    household_id += 1;
                    store
                        .seed(Household {
                            id: household_id,
                            name: format!("H{}", household_id),
                            zone_id,
                        })
                        .await;
                    for n in 0..*size {
                        resident_id += 1;
                        store
                            .seed(Resident {
                                id: resident_id,
                                first_name: format!("R{}", resident_id),
                                middle_name: None,
                                last_name: "Test".into(),
                                suffix: None,
                                birth_date: None,
                                gender: None,
                                civil_status: None,
                                occupation: None,
                                contact_number: None,
                                is_head: n == 0,
                                is_active: n % 2 == 0,
                                household_id,
                                zone_id,
                                barangay_id,
                                municipality_id,
                            })
                            .await;
                    }
                }
            }
        }
    }

    Seeded {
        store,
        zones,
        barangays,
    }
}

fn build_scope((role, municipality_id, barangay_id): (u8, i64, i64)) -> Scope {
    match role {
        0 => Scope::super_admin(),
        1 => Scope::municipality_admin(municipality_id),
        _ => Scope::barangay_admin(municipality_id, barangay_id),
    }
}

/// The access table written out independently of `Scope::covers`
fn reference_allows(role: u8, scope_m: i64, scope_b: i64, owner_m: i64, owner_b: i64) -> bool {
    match role {
        0 => true,
        1 => owner_m == scope_m,
        _ => owner_b == scope_b,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn zone_access_matches_the_role_table(shape in shape_strategy(), raw_scope in scope_strategy()) {
        let rt = runtime();
        let seeded = rt.block_on(seed(&shape));
        let guard = AccessGuard::new(seeded.store.clone());
        let scope = build_scope(raw_scope);
        let (role, scope_m, scope_b) = raw_scope;

        for (zone_id, owner_m, owner_b) in &seeded.zones {
            let outcome = rt.block_on(guard.authorize_existing(&scope, Action::Read, EntityKind::Zone, *zone_id));
            let expected = reference_allows(role, scope_m, scope_b, *owner_m, *owner_b);
            prop_assert_eq!(outcome.is_ok(), expected, "zone {} scope {:?}", zone_id, scope);
            if !expected {
                let is_forbidden = matches!(outcome, Err(RegistryError::Forbidden { .. }));
                prop_assert!(is_forbidden);
            }
        }
    }

    #[test]
    fn municipality_totals_are_sums_of_barangays(shape in shape_strategy()) {
        let rt = runtime();
        let seeded = rt.block_on(seed(&shape));
        let engine = AggregationEngine::new(seeded.store.clone());

        for (m, _) in shape.iter().enumerate() {
            let municipality_id = m as i64 + 1;
            let stats = rt.block_on(engine.municipality_stats(municipality_id)).unwrap();

            let mut residents = 0;
            let mut households = 0;
            let mut active = 0;
            for (barangay_id, owner) in &seeded.barangays {
                if *owner != municipality_id {
                    continue;
                }
                let barangay = rt.block_on(engine.barangay_stats(*barangay_id)).unwrap();
                residents += barangay.resident_count;
                households += barangay.household_count;
                active += barangay.active_residents;
            }

            prop_assert_eq!(stats.resident_count, residents);
            prop_assert_eq!(stats.household_count, households);
            prop_assert_eq!(stats.active_residents, active);
            prop_assert_eq!(stats.gender_distribution.values().sum::<u64>(), residents);
            if households == 0 {
                prop_assert!(stats.avg_household_size.is_zero());
            }
        }
    }
}
