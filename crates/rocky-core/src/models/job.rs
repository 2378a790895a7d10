//! Job domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RockyError, RockyResult};

/// Maximum length of a job's task (boefje) identifier.
pub const TASK_NAME_LENGTH: usize = 128;

/// A scan job submitted on behalf of an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    /// `None` once the organization has been deleted.
    pub organization_id: Option<Uuid>,
    /// Identifier of the boefje that runs the job.
    pub boefje_id: String,
    /// Reference of the OOI the job was started for.
    pub input_ooi: Option<String>,
    /// Free-form arguments, always a JSON object.
    pub arguments: serde_json::Value,
    /// Set once at insert.
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    pub organization_id: Option<Uuid>,
    pub boefje_id: String,
    pub input_ooi: Option<String>,
    pub arguments: serde_json::Value,
}

impl CreateJob {
    pub fn validate(&self) -> RockyResult<()> {
        if self.boefje_id.is_empty() {
            return Err(RockyError::validation("boefje_id must not be empty"));
        }
        if self.boefje_id.chars().count() > TASK_NAME_LENGTH {
            return Err(RockyError::validation(format!(
                "boefje_id must be at most {TASK_NAME_LENGTH} characters"
            )));
        }
        if !self.arguments.is_object() {
            return Err(RockyError::validation("job arguments must be a JSON object"));
        }
        Ok(())
    }
}
