//! SurrealDB implementation of [`OoiInformationRepository`].
//!
//! Records are keyed by the OOI information id itself
//! (`ooi_information:⟨Port|443⟩`), so saving is an upsert.

use chrono::{DateTime, Utc};
use rocky_core::error::{RockyError, RockyResult};
use rocky_core::models::ooi_information::OoiInformation;
use rocky_core::repository::OoiInformationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OoiInformationRow {
    data: serde_json::Value,
    consult_api: bool,
    last_updated: DateTime<Utc>,
}

impl OoiInformationRow {
    fn into_info(self, id: String) -> Result<OoiInformation, DbError> {
        let serde_json::Value::Object(data) = self.data else {
            return Err(DbError::InvalidValue(format!(
                "ooi_information {id}: data is not an object"
            )));
        };
        Ok(OoiInformation {
            id,
            data: Some(data),
            consult_api: self.consult_api,
            last_updated: Some(self.last_updated),
        })
    }
}

/// SurrealDB implementation of the OOI information repository.
#[derive(Clone)]
pub struct SurrealOoiInformationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOoiInformationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OoiInformationRepository for SurrealOoiInformationRepository<C> {
    async fn get(&self, id: &str) -> RockyResult<OoiInformation> {
        let id_owned = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('ooi_information', $id)")
            .bind(("id", id_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OoiInformationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ooi_information".into(),
            id: id_owned.clone(),
        })?;

        Ok(row.into_info(id_owned)?)
    }

    async fn save(&self, info: OoiInformation) -> RockyResult<OoiInformation> {
        info.validate()?;

        let OoiInformation {
            id,
            data,
            consult_api,
            ..
        } = info;
        let data = data
            .map(serde_json::Value::Object)
            .ok_or_else(|| RockyError::validation("Description is missing in data"))?;

        let result = self
            .db
            .query(
                "UPSERT type::record('ooi_information', $id) SET \
                 data = $data, consult_api = $consult_api",
            )
            .bind(("id", id.clone()))
            .bind(("data", data))
            .bind(("consult_api", consult_api))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OoiInformationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ooi_information".into(),
            id: id.clone(),
        })?;

        Ok(row.into_info(id)?)
    }

    async fn delete(&self, id: &str) -> RockyResult<()> {
        self.db
            .query("DELETE type::record('ooi_information', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
