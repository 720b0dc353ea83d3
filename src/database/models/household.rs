use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, Record};
use crate::types::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub zone_id: EntityId,
}

impl Record for Household {
    const TABLE: &'static str = "households";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

impl Entity for Household {
    const KIND: EntityKind = EntityKind::Household;

    fn parent_id(&self) -> Option<EntityId> {
        Some(self.zone_id)
    }
}
