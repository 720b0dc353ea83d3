use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, Record};
use crate::types::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub barangay_id: EntityId,
}

impl Record for Zone {
    const TABLE: &'static str = "zones";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

impl Entity for Zone {
    const KIND: EntityKind = EntityKind::Zone;

    fn parent_id(&self) -> Option<EntityId> {
        Some(self.barangay_id)
    }
}
