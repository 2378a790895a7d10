//! Indemnification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Records that a user has indemnified an organization for scanning.
///
/// Both references are nulled rather than cascaded when the user or the
/// organization is deleted, so the record itself is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indemnification {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIndemnification {
    pub user_id: Uuid,
    pub organization_id: Uuid,
}
