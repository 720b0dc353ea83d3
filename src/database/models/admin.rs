use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Record;
use crate::types::{EntityId, Role};

/// Administrator account as tracked for system statistics.
/// Credentials live with the credential issuer, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    #[serde(default)]
    pub id: EntityId,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub municipality_id: Option<EntityId>,
    #[serde(default)]
    pub barangay_id: Option<EntityId>,
    pub is_active: bool,
}

impl AdminAccount {
    /// Parsed role, `None` when the stored value is not a known role
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

impl Record for AdminAccount {
    const TABLE: &'static str = "admin_accounts";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
