use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, Record};
use crate::types::{EntityId, EntityKind};

/// A person living in a household.
///
/// `zone_id`, `barangay_id` and `municipality_id` are a cached copy of the
/// household chain. They are recomputed on every resident write and are never
/// consulted for authorization; ownership is always derived from `household_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    #[serde(default)]
    pub id: EntityId,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub civil_status: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub is_head: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub household_id: EntityId,
    #[serde(default)]
    pub zone_id: EntityId,
    #[serde(default)]
    pub barangay_id: EntityId,
    #[serde(default)]
    pub municipality_id: EntityId,
}

fn default_active() -> bool {
    true
}

/// Location of a household within the hierarchy, as derived by walking its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentLocation {
    pub zone_id: EntityId,
    pub barangay_id: EntityId,
    pub municipality_id: EntityId,
}

impl Resident {
    /// Whole years between birth date and `as_of`; `None` if unknown or in the future
    pub fn age_on(&self, as_of: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        if birth > as_of {
            return None;
        }
        let mut years = as_of.year() - birth.year();
        if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// The cached location fields as stored on the row
    pub fn stored_location(&self) -> ResidentLocation {
        ResidentLocation {
            zone_id: self.zone_id,
            barangay_id: self.barangay_id,
            municipality_id: self.municipality_id,
        }
    }

    pub fn apply_location(&mut self, location: ResidentLocation) {
        self.zone_id = location.zone_id;
        self.barangay_id = location.barangay_id;
        self.municipality_id = location.municipality_id;
    }
}

impl Record for Resident {
    const TABLE: &'static str = "residents";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

impl Entity for Resident {
    const KIND: EntityKind = EntityKind::Resident;

    fn parent_id(&self) -> Option<EntityId> {
        Some(self.household_id)
    }
}
