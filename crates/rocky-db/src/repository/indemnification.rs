//! SurrealDB implementation of [`IndemnificationRepository`].

use chrono::{DateTime, Utc};
use rocky_core::error::RockyResult;
use rocky_core::models::indemnification::{CreateIndemnification, Indemnification};
use rocky_core::repository::IndemnificationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct IndemnificationRow {
    user_id: Option<String>,
    organization_id: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct IndemnificationRowWithId {
    record_id: String,
    user_id: Option<String>,
    organization_id: Option<String>,
    created_at: DateTime<Utc>,
}

fn parse_optional_uuid(value: Option<String>, what: &str) -> Result<Option<Uuid>, DbError> {
    value
        .map(|v| {
            Uuid::parse_str(&v)
                .map_err(|e| DbError::InvalidValue(format!("invalid {what} UUID: {e}")))
        })
        .transpose()
}

fn row_to_indemnification(
    row: IndemnificationRow,
    id: Uuid,
) -> Result<Indemnification, DbError> {
    Ok(Indemnification {
        id,
        user_id: parse_optional_uuid(row.user_id, "user")?,
        organization_id: parse_optional_uuid(row.organization_id, "organization")?,
        created_at: row.created_at,
    })
}

impl IndemnificationRowWithId {
    fn try_into_indemnification(self) -> Result<Indemnification, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::InvalidValue(format!("invalid UUID: {e}")))?;
        row_to_indemnification(
            IndemnificationRow {
                user_id: self.user_id,
                organization_id: self.organization_id,
                created_at: self.created_at,
            },
            id,
        )
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the indemnification repository.
#[derive(Clone)]
pub struct SurrealIndemnificationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealIndemnificationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> IndemnificationRepository for SurrealIndemnificationRepository<C> {
    async fn create(&self, input: CreateIndemnification) -> RockyResult<Indemnification> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('indemnification', $id) SET \
                 user_id = $user_id, organization_id = $organization_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("organization_id", input.organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<IndemnificationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "indemnification".into(),
            id: id_str,
        })?;

        Ok(row_to_indemnification(row, id)?)
    }

    async fn exists(&self, user_id: Uuid, organization_id: Uuid) -> RockyResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM indemnification \
                 WHERE user_id = $user_id AND organization_id = $organization_id \
                 GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> RockyResult<Vec<Indemnification>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM indemnification \
                 WHERE organization_id = $organization_id \
                 ORDER BY created_at ASC",
            )
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IndemnificationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_indemnification())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn clear_user(&self, user_id: Uuid) -> RockyResult<u64> {
        let mut result = self
            .db
            .query(
                "UPDATE indemnification SET user_id = NONE \
                 WHERE user_id = $user_id",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IndemnificationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.len() as u64)
    }
}
