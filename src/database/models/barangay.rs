use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, Record};
use crate::types::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Barangay {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub code: String,
    pub municipality_id: EntityId,
}

impl Record for Barangay {
    const TABLE: &'static str = "barangays";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

impl Entity for Barangay {
    const KIND: EntityKind = EntityKind::Barangay;

    fn parent_id(&self) -> Option<EntityId> {
        Some(self.municipality_id)
    }
}
