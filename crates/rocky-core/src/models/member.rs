//! Organization membership domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RockyError, RockyResult};

/// Highest scan level (L4). Clearance levels range from -1 (none) up to
/// and including this value.
pub const MAX_SCAN_LEVEL: i64 = 4;

/// Lowest clearance level, meaning no clearance has been granted.
pub const NO_CLEARANCE: i64 = -1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// An invite has been sent but not yet accepted.
    #[default]
    New,
    /// The invite was accepted or the account was created directly.
    Active,
    /// An organization admin has blocked the member.
    Blocked,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::New => "new",
            MemberStatus::Active => "active",
            MemberStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = RockyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(MemberStatus::New),
            "active" => Ok(MemberStatus::Active),
            "blocked" => Ok(MemberStatus::Blocked),
            other => Err(RockyError::validation(format!(
                "unknown member status: {other}"
            ))),
        }
    }
}

/// Links a user to an organization. Each (user, organization) pair is
/// unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub status: MemberStatus,
    pub onboarded: bool,
    /// Highest clearance level an admin trusts this member to set.
    pub trusted_clearance_level: i64,
    /// Clearance level the member has acknowledged.
    pub acknowledged_clearance_level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrganizationMember {
    pub fn is_blocked(&self) -> bool {
        self.status == MemberStatus::Blocked
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationMember {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub status: MemberStatus,
    pub onboarded: bool,
    pub trusted_clearance_level: i64,
    pub acknowledged_clearance_level: i64,
}

impl CreateOrganizationMember {
    /// A member record with default flags and no clearance.
    pub fn new(user_id: Uuid, organization_id: Uuid, status: MemberStatus) -> Self {
        Self {
            user_id,
            organization_id,
            status,
            onboarded: false,
            trusted_clearance_level: NO_CLEARANCE,
            acknowledged_clearance_level: NO_CLEARANCE,
        }
    }

    pub fn validate(&self) -> RockyResult<()> {
        validate_clearance_level("trusted_clearance_level", self.trusted_clearance_level)?;
        validate_clearance_level(
            "acknowledged_clearance_level",
            self.acknowledged_clearance_level,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganizationMember {
    pub status: Option<MemberStatus>,
    pub onboarded: Option<bool>,
    pub trusted_clearance_level: Option<i64>,
    pub acknowledged_clearance_level: Option<i64>,
}

impl UpdateOrganizationMember {
    pub fn validate(&self) -> RockyResult<()> {
        if let Some(level) = self.trusted_clearance_level {
            validate_clearance_level("trusted_clearance_level", level)?;
        }
        if let Some(level) = self.acknowledged_clearance_level {
            validate_clearance_level("acknowledged_clearance_level", level)?;
        }
        Ok(())
    }
}

pub fn validate_clearance_level(field: &str, level: i64) -> RockyResult<()> {
    if !(NO_CLEARANCE..=MAX_SCAN_LEVEL).contains(&level) {
        return Err(RockyError::validation(format!(
            "{field} must be between {NO_CLEARANCE} and {MAX_SCAN_LEVEL}, got {level}"
        )));
    }
    Ok(())
}
