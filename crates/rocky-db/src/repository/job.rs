//! SurrealDB implementation of [`JobRepository`].

use chrono::{DateTime, Utc};
use rocky_core::error::RockyResult;
use rocky_core::models::job::{CreateJob, Job};
use rocky_core::repository::{JobRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct JobRow {
    organization_id: Option<String>,
    boefje_id: String,
    input_ooi: Option<String>,
    arguments: serde_json::Value,
    created: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct JobRowWithId {
    record_id: String,
    organization_id: Option<String>,
    boefje_id: String,
    input_ooi: Option<String>,
    arguments: serde_json::Value,
    created: DateTime<Utc>,
}

fn row_to_job(row: JobRow, id: Uuid) -> Result<Job, DbError> {
    let organization_id = row
        .organization_id
        .map(|v| {
            Uuid::parse_str(&v)
                .map_err(|e| DbError::InvalidValue(format!("invalid organization UUID: {e}")))
        })
        .transpose()?;
    Ok(Job {
        id,
        organization_id,
        boefje_id: row.boefje_id,
        input_ooi: row.input_ooi,
        arguments: row.arguments,
        created: row.created,
    })
}

impl JobRowWithId {
    fn try_into_job(self) -> Result<Job, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::InvalidValue(format!("invalid UUID: {e}")))?;
        row_to_job(
            JobRow {
                organization_id: self.organization_id,
                boefje_id: self.boefje_id,
                input_ooi: self.input_ooi,
                arguments: self.arguments,
                created: self.created,
            },
            id,
        )
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Job repository.
#[derive(Clone)]
pub struct SurrealJobRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealJobRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> JobRepository for SurrealJobRepository<C> {
    async fn create(&self, input: CreateJob) -> RockyResult<Job> {
        input.validate()?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('job', $id) SET \
                 organization_id = $organization_id, \
                 boefje_id = $boefje_id, \
                 input_ooi = $input_ooi, \
                 arguments = $arguments",
            )
            .bind(("id", id_str.clone()))
            .bind((
                "organization_id",
                input.organization_id.map(|id| id.to_string()),
            ))
            .bind(("boefje_id", input.boefje_id))
            .bind(("input_ooi", input.input_ooi))
            .bind(("arguments", input.arguments))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<JobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job".into(),
            id: id_str,
        })?;

        Ok(row_to_job(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RockyResult<Job> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('job', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<JobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job".into(),
            id: id_str,
        })?;

        Ok(row_to_job(row, id)?)
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> RockyResult<PaginatedResult<Job>> {
        let org_id_str = organization_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM job \
                 WHERE organization_id = $org_id GROUP ALL",
            )
            .bind(("org_id", org_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM job \
                 WHERE organization_id = $org_id \
                 ORDER BY created DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("org_id", org_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<JobRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_job())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
