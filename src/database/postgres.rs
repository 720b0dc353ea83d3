use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use tracing::debug;

use crate::database::models::{
    AdminAccount, Barangay, Entity, Household, Municipality, Record, Resident, Zone,
};
use crate::database::store::{ChildTable, EntityStore, StoreError, Table};
use crate::types::EntityId;

const SCHEMA: &str = include_str!("../../sql/schema.sql");

type RowQuery<'q, T> = QueryAs<'q, Postgres, T, PgArguments>;

/// Column layout for a table managed by `PgStore`
pub trait PgRecord: Record + for<'r> FromRow<'r, PgRow> + Unpin {
    /// Non-id columns, in the order `bind_columns` binds them
    const COLUMNS: &'static [&'static str];

    fn bind_columns<'q>(&self, query: RowQuery<'q, Self>) -> RowQuery<'q, Self>;
}

/// Column holding the parent id of an entity table
pub trait PgEntity: PgRecord + Entity {
    const PARENT_COLUMN: &'static str;
}

/// Entity store backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        (&self.pool).execute(SCHEMA).await.map_err(map_sqlx)?;
        Ok(())
    }

    fn select_sql<T: PgRecord>() -> String {
        format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
    }
}

fn log_sql(sql: &str) {
    if crate::config::config().database.enable_query_logging {
        debug!(target: "sql", "{}", sql);
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Sqlx(other),
    }
}

#[async_trait]
impl<T: PgRecord> Table<T> for PgStore {
    async fn get_by_id(&self, id: EntityId) -> Result<Option<T>, StoreError> {
        let sql = format!("{} WHERE id = $1", Self::select_sql::<T>());
        log_sql(&sql);
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        let sql = format!("{} ORDER BY id", Self::select_sql::<T>());
        log_sql(&sql);
        sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn add(&self, entity: T) -> Result<T, StoreError> {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING id, {}",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders.join(", "),
            T::COLUMNS.join(", ")
        );
        log_sql(&sql);
        entity
            .bind_columns(sqlx::query_as::<_, T>(&sql))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn update(&self, entity: T) -> Result<T, StoreError> {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING id, {}",
            T::TABLE,
            assignments.join(", "),
            T::COLUMNS.len() + 1,
            T::COLUMNS.join(", ")
        );
        log_sql(&sql);
        let id = entity.id();
        entity
            .bind_columns(sqlx::query_as::<_, T>(&sql))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or(StoreError::MissingRow { table: T::TABLE, id })
    }

    async fn delete(&self, id: EntityId) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        log_sql(&sql);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<T: PgEntity> ChildTable<T> for PgStore {
    async fn get_by_parent_id(&self, parent_id: EntityId) -> Result<Vec<T>, StoreError> {
        let sql = format!(
            "{} WHERE {} = $1 ORDER BY id",
            Self::select_sql::<T>(),
            T::PARENT_COLUMN
        );
        log_sql(&sql);
        sqlx::query_as::<_, T>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn has_children(&self, parent_id: EntityId) -> Result<bool, StoreError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1)",
            T::TABLE,
            T::PARENT_COLUMN
        );
        log_sql(&sql);
        let (exists,): (bool,) = sqlx::query_as(&sql)
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(exists)
    }
}

impl EntityStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}

impl PgRecord for Municipality {
    const COLUMNS: &'static [&'static str] = &["name", "code", "region", "province"];

    fn bind_columns<'q>(&self, query: RowQuery<'q, Self>) -> RowQuery<'q, Self> {
        query
            .bind(self.name.clone())
            .bind(self.code.clone())
            .bind(self.region.clone())
            .bind(self.province.clone())
    }
}

impl PgRecord for Barangay {
    const COLUMNS: &'static [&'static str] = &["name", "code", "municipality_id"];

    fn bind_columns<'q>(&self, query: RowQuery<'q, Self>) -> RowQuery<'q, Self> {
        query
            .bind(self.name.clone())
            .bind(self.code.clone())
            .bind(self.municipality_id)
    }
}

impl PgEntity for Barangay {
    const PARENT_COLUMN: &'static str = "municipality_id";
}

impl PgRecord for Zone {
    const COLUMNS: &'static [&'static str] = &["name", "description", "barangay_id"];

    fn bind_columns<'q>(&self, query: RowQuery<'q, Self>) -> RowQuery<'q, Self> {
        query
            .bind(self.name.clone())
            .bind(self.description.clone())
            .bind(self.barangay_id)
    }
}

impl PgEntity for Zone {
    const PARENT_COLUMN: &'static str = "barangay_id";
}

impl PgRecord for Household {
    const COLUMNS: &'static [&'static str] = &["name", "zone_id"];

    fn bind_columns<'q>(&self, query: RowQuery<'q, Self>) -> RowQuery<'q, Self> {
        query.bind(self.name.clone()).bind(self.zone_id)
    }
}

impl PgEntity for Household {
    const PARENT_COLUMN: &'static str = "zone_id";
}

impl PgRecord for Resident {
    const COLUMNS: &'static [&'static str] = &[
        "first_name",
        "middle_name",
        "last_name",
        "suffix",
        "birth_date",
        "gender",
        "civil_status",
        "occupation",
        "contact_number",
        "is_head",
        "is_active",
        "household_id",
        "zone_id",
        "barangay_id",
        "municipality_id",
    ];

    fn bind_columns<'q>(&self, query: RowQuery<'q, Self>) -> RowQuery<'q, Self> {
        query
            .bind(self.first_name.clone())
            .bind(self.middle_name.clone())
            .bind(self.last_name.clone())
            .bind(self.suffix.clone())
            .bind(self.birth_date)
            .bind(self.gender.clone())
            .bind(self.civil_status.clone())
            .bind(self.occupation.clone())
            .bind(self.contact_number.clone())
            .bind(self.is_head)
            .bind(self.is_active)
            .bind(self.household_id)
            .bind(self.zone_id)
            .bind(self.barangay_id)
            .bind(self.municipality_id)
    }
}

impl PgEntity for Resident {
    const PARENT_COLUMN: &'static str = "household_id";
}

impl PgRecord for AdminAccount {
    const COLUMNS: &'static [&'static str] =
        &["username", "role", "municipality_id", "barangay_id", "is_active"];

    fn bind_columns<'q>(&self, query: RowQuery<'q, Self>) -> RowQuery<'q, Self> {
        query
            .bind(self.username.clone())
            .bind(self.role.clone())
            .bind(self.municipality_id)
            .bind(self.barangay_id)
            .bind(self.is_active)
    }
}
