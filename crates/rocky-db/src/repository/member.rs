//! SurrealDB implementation of [`OrganizationMemberRepository`].

use chrono::{DateTime, Utc};
use rocky_core::error::RockyResult;
use rocky_core::models::member::{
    CreateOrganizationMember, MemberStatus, OrganizationMember, UpdateOrganizationMember,
};
use rocky_core::repository::{OrganizationMemberRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct MemberRow {
    user_id: String,
    organization_id: String,
    status: String,
    onboarded: bool,
    trusted_clearance_level: i64,
    acknowledged_clearance_level: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct MemberRowWithId {
    record_id: String,
    user_id: String,
    organization_id: String,
    status: String,
    onboarded: bool,
    trusted_clearance_level: i64,
    acknowledged_clearance_level: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::InvalidValue(format!("invalid {what} UUID: {e}")))
}

fn parse_status(value: &str) -> Result<MemberStatus, DbError> {
    value
        .parse()
        .map_err(|_| DbError::InvalidValue(format!("unknown member status: {value}")))
}

fn row_to_member(row: MemberRow, id: Uuid) -> Result<OrganizationMember, DbError> {
    Ok(OrganizationMember {
        id,
        user_id: parse_uuid(&row.user_id, "user")?,
        organization_id: parse_uuid(&row.organization_id, "organization")?,
        status: parse_status(&row.status)?,
        onboarded: row.onboarded,
        trusted_clearance_level: row.trusted_clearance_level,
        acknowledged_clearance_level: row.acknowledged_clearance_level,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl MemberRowWithId {
    fn try_into_member(self) -> Result<OrganizationMember, DbError> {
        let id = parse_uuid(&self.record_id, "member")?;
        row_to_member(
            MemberRow {
                user_id: self.user_id,
                organization_id: self.organization_id,
                status: self.status,
                onboarded: self.onboarded,
                trusted_clearance_level: self.trusted_clearance_level,
                acknowledged_clearance_level: self.acknowledged_clearance_level,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            id,
        )
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the organization member repository.
#[derive(Clone)]
pub struct SurrealOrganizationMemberRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationMemberRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationMemberRepository for SurrealOrganizationMemberRepository<C> {
    async fn create(&self, input: CreateOrganizationMember) -> RockyResult<OrganizationMember> {
        input.validate()?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organization_member', $id) SET \
                 user_id = $user_id, \
                 organization_id = $organization_id, \
                 status = $status, \
                 onboarded = $onboarded, \
                 trusted_clearance_level = $trusted, \
                 acknowledged_clearance_level = $acknowledged",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("status", input.status.as_str().to_string()))
            .bind(("onboarded", input.onboarded))
            .bind(("trusted", input.trusted_clearance_level))
            .bind(("acknowledged", input.acknowledged_clearance_level))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("organization_member", e))?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization_member".into(),
            id: id_str,
        })?;

        Ok(row_to_member(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RockyResult<OrganizationMember> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization_member', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization_member".into(),
            id: id_str,
        })?;

        Ok(row_to_member(row, id)?)
    }

    async fn get_by_user(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> RockyResult<OrganizationMember> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization_member \
                 WHERE organization_id = $organization_id AND user_id = $user_id",
            )
            .bind(("organization_id", organization_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization_member".into(),
            id: format!("organization_id={organization_id}, user_id={user_id}"),
        })?;

        Ok(row.try_into_member()?)
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateOrganizationMember,
    ) -> RockyResult<OrganizationMember> {
        input.validate()?;

        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.onboarded.is_some() {
            sets.push("onboarded = $onboarded");
        }
        if input.trusted_clearance_level.is_some() {
            sets.push("trusted_clearance_level = $trusted");
        }
        if input.acknowledged_clearance_level.is_some() {
            sets.push("acknowledged_clearance_level = $acknowledged");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('organization_member', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(onboarded) = input.onboarded {
            builder = builder.bind(("onboarded", onboarded));
        }
        if let Some(level) = input.trusted_clearance_level {
            builder = builder.bind(("trusted", level));
        }
        if let Some(level) = input.acknowledged_clearance_level {
            builder = builder.bind(("acknowledged", level));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization_member".into(),
            id: id_str,
        })?;

        Ok(row_to_member(row, id)?)
    }

    async fn delete(&self, id: Uuid) -> RockyResult<()> {
        self.db
            .query("DELETE type::record('organization_member', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> RockyResult<PaginatedResult<OrganizationMember>> {
        let org_id_str = organization_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM organization_member \
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
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization_member \
                 WHERE organization_id = $org_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("org_id", org_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_member())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
