//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "drop_member_legacy_fields",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (root of the data model)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string \
    ASSERT string::len($value) > 0 AND string::len($value) <= 126;
DEFINE FIELD code ON TABLE organization TYPE string \
    ASSERT string::len($value) > 0 AND string::len($value) <= 32;
DEFINE FIELD tags ON TABLE organization TYPE array DEFAULT [];
DEFINE FIELD tags.* ON TABLE organization TYPE string;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organization_code ON TABLE organization \
    COLUMNS code UNIQUE;
DEFINE INDEX idx_organization_name ON TABLE organization \
    COLUMNS name UNIQUE;

-- =======================================================================
-- Organization members (cascade with the organization)
-- =======================================================================
DEFINE TABLE organization_member SCHEMAFULL;
DEFINE FIELD user_id ON TABLE organization_member TYPE string;
DEFINE FIELD organization_id ON TABLE organization_member TYPE string;
DEFINE FIELD member_name ON TABLE organization_member \
    TYPE option<string>;
DEFINE FIELD authorized ON TABLE organization_member TYPE bool \
    DEFAULT false;
DEFINE FIELD verified ON TABLE organization_member TYPE bool \
    DEFAULT false;
DEFINE FIELD status ON TABLE organization_member TYPE string \
    ASSERT $value IN ['new', 'active', 'blocked'];
DEFINE FIELD onboarded ON TABLE organization_member TYPE bool \
    DEFAULT false;
DEFINE FIELD trusted_clearance_level ON TABLE organization_member \
    TYPE int DEFAULT -1 ASSERT $value >= -1 AND $value <= 4;
DEFINE FIELD acknowledged_clearance_level ON TABLE organization_member \
    TYPE int DEFAULT -1 ASSERT $value >= -1 AND $value <= 4;
DEFINE FIELD created_at ON TABLE organization_member TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization_member TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_member_user_org ON TABLE organization_member \
    COLUMNS user_id, organization_id UNIQUE;
DEFINE INDEX idx_member_org ON TABLE organization_member \
    COLUMNS organization_id;

-- =======================================================================
-- Indemnifications (references nulled on delete)
-- =======================================================================
DEFINE TABLE indemnification SCHEMAFULL;
DEFINE FIELD user_id ON TABLE indemnification TYPE option<string>;
DEFINE FIELD organization_id ON TABLE indemnification \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE indemnification TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_indemnification_org ON TABLE indemnification \
    COLUMNS organization_id;

-- =======================================================================
-- OOI information (global scope, keyed by `<type>|<value>`)
-- =======================================================================
DEFINE TABLE ooi_information SCHEMAFULL;
DEFINE FIELD data ON TABLE ooi_information TYPE object FLEXIBLE \
    ASSERT $value.description != NONE;
DEFINE FIELD consult_api ON TABLE ooi_information TYPE bool \
    DEFAULT false;
DEFINE FIELD last_updated ON TABLE ooi_information TYPE datetime \
    VALUE time::now();

-- =======================================================================
-- Jobs (organization reference nulled on delete)
-- =======================================================================
DEFINE TABLE job SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE job TYPE option<string>;
DEFINE FIELD boefje_id ON TABLE job TYPE string \
    ASSERT string::len($value) <= 128;
DEFINE FIELD input_ooi ON TABLE job TYPE option<string>;
DEFINE FIELD arguments ON TABLE job TYPE object FLEXIBLE;
DEFINE FIELD created ON TABLE job TYPE datetime \
    DEFAULT time::now() READONLY;
DEFINE INDEX idx_job_org ON TABLE job COLUMNS organization_id;
";

// -----------------------------------------------------------------------
// Schema v2: members lose the fields superseded by `status`
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
REMOVE FIELD IF EXISTS member_name ON TABLE organization_member;
REMOVE FIELD IF EXISTS authorized ON TABLE organization_member;
REMOVE FIELD IF EXISTS verified ON TABLE organization_member;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
