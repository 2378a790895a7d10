//! The organization record store: a migrated SurrealDB handle that hands
//! out the repositories.

use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;
use crate::repository::{
    SurrealIndemnificationRepository, SurrealJobRepository, SurrealOoiInformationRepository,
    SurrealOrganizationMemberRepository, SurrealOrganizationRepository,
};
use crate::schema::run_migrations;

/// Where the record store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// WebSocket address, e.g. `127.0.0.1:8000`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials.
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "rocky".into(),
            database: "rocky".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Defaults overridden by `ROCKY_DB_URL`, `ROCKY_DB_NAMESPACE`,
    /// `ROCKY_DB_DATABASE`, `ROCKY_DB_USERNAME` and `ROCKY_DB_PASSWORD`
    /// as resolved by `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("ROCKY_DB_URL").unwrap_or(defaults.url),
            namespace: lookup("ROCKY_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: lookup("ROCKY_DB_DATABASE").unwrap_or(defaults.database),
            username: lookup("ROCKY_DB_USERNAME").unwrap_or(defaults.username),
            password: lookup("ROCKY_DB_PASSWORD").unwrap_or(defaults.password),
        }
    }
}

/// A SurrealDB handle whose schema is known to be current.
#[derive(Clone)]
pub struct DbManager<C: Connection = Client> {
    db: Surreal<C>,
}

impl DbManager<Client> {
    /// Connect as root, select the namespace and database, and run any
    /// pending migrations.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        Self::from_client(db).await
    }
}

impl<C: Connection> DbManager<C> {
    /// Migrate an already selected database.
    pub async fn from_client(db: Surreal<C>) -> Result<Self, DbError> {
        run_migrations(&db).await?;
        Ok(Self { db })
    }

    pub fn organizations(&self) -> SurrealOrganizationRepository<C> {
        SurrealOrganizationRepository::new(self.db.clone())
    }

    pub fn members(&self) -> SurrealOrganizationMemberRepository<C> {
        SurrealOrganizationMemberRepository::new(self.db.clone())
    }

    pub fn indemnifications(&self) -> SurrealIndemnificationRepository<C> {
        SurrealIndemnificationRepository::new(self.db.clone())
    }

    pub fn jobs(&self) -> SurrealJobRepository<C> {
        SurrealJobRepository::new(self.db.clone())
    }

    pub fn ooi_information(&self) -> SurrealOoiInformationRepository<C> {
        SurrealOoiInformationRepository::new(self.db.clone())
    }

    pub fn client(&self) -> &Surreal<C> {
        &self.db
    }
}
