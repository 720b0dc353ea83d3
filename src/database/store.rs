use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    AdminAccount, Barangay, Entity, Household, Municipality, Record, Resident, Zone,
};
use crate::types::EntityId;

/// Errors raised by an entity store. These are never retried by the core.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("{table} row {id} does not exist")]
    MissingRow { table: &'static str, id: EntityId },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Primary-key access to one table
#[async_trait]
pub trait Table<T: Record>: Send + Sync {
    async fn get_by_id(&self, id: EntityId) -> Result<Option<T>, StoreError>;

    async fn get_all(&self) -> Result<Vec<T>, StoreError>;

    /// Insert a new row. The store assigns the id; the returned value carries it.
    async fn add(&self, entity: T) -> Result<T, StoreError>;

    /// Replace an existing row, `MissingRow` if it is gone
    async fn update(&self, entity: T) -> Result<T, StoreError>;

    /// Remove a row; returns whether anything was deleted
    async fn delete(&self, id: EntityId) -> Result<bool, StoreError>;
}

/// Parent-id access to a table whose rows sit below another level
#[async_trait]
pub trait ChildTable<T: Entity>: Table<T> {
    async fn get_by_parent_id(&self, parent_id: EntityId) -> Result<Vec<T>, StoreError>;

    /// Whether at least one row references `parent_id`
    async fn has_children(&self, parent_id: EntityId) -> Result<bool, StoreError> {
        Ok(!self.get_by_parent_id(parent_id).await?.is_empty())
    }
}

/// Everything the core consumes from the entity store
pub trait EntityStore:
    Table<Municipality>
    + ChildTable<Barangay>
    + ChildTable<Zone>
    + ChildTable<Household>
    + ChildTable<Resident>
    + Table<AdminAccount>
{
    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;
}
