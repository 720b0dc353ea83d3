pub mod admin;
pub mod barangay;
pub mod household;
pub mod municipality;
pub mod resident;
pub mod zone;

pub use admin::AdminAccount;
pub use barangay::Barangay;
pub use household::Household;
pub use municipality::Municipality;
pub use resident::{Resident, ResidentLocation};
pub use zone::Zone;

use crate::types::{EntityId, EntityKind};

/// Anything persisted in the entity store under an integer primary key
pub trait Record: Clone + Send + Sync + 'static {
    /// Table name, shared by the in-memory and postgres stores
    const TABLE: &'static str;

    fn id(&self) -> EntityId;
    fn set_id(&mut self, id: EntityId);
}

/// A record that sits at a fixed level of the civic hierarchy
pub trait Entity: Record {
    const KIND: EntityKind;

    /// Declared parent id, `None` only for municipalities
    fn parent_id(&self) -> Option<EntityId>;
}
