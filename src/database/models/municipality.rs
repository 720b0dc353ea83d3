use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, Record};
use crate::types::{EntityId, EntityKind};

/// Root of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Municipality {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub code: String,
    pub region: String,
    pub province: String,
}

impl Record for Municipality {
    const TABLE: &'static str = "municipalities";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

impl Entity for Municipality {
    const KIND: EntityKind = EntityKind::Municipality;

    fn parent_id(&self) -> Option<EntityId> {
        None
    }
}
