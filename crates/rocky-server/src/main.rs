//! Rocky server entry point.

mod config;

use anyhow::{Context, Result};
use rocky_core::repository::Pagination;
use rocky_db::DbManager;
use rocky_remote::{KatalogusClient, OctopoesClient};
use rocky_services::{OrganizationProvisioner, OrganizationService};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("rocky=info".parse().context("log directive")?),
        )
        .json()
        .init();

    tracing::info!("Starting Rocky server...");

    let config = ServerConfig::from_env().context("Failed to load configuration")?;

    let db = DbManager::connect(&config.db)
        .await
        .context("Failed to prepare database")?;

    let catalog = KatalogusClient::new(&config.katalogus).context("Failed to build Katalogus client")?;
    let graph_store =
        OctopoesClient::new(&config.octopoes).context("Failed to build Octopoes client")?;

    let organizations = OrganizationService::new(
        db.organizations(),
        OrganizationProvisioner::new(catalog, graph_store),
    );

    // Unhealthy services only block provisioning, not startup.
    match organizations.provisioner().preflight().await {
        Ok(()) => tracing::info!("Katalogus and Octopoes are healthy"),
        Err(e) => tracing::warn!(error = %e, "remote services not ready"),
    }

    let existing = organizations
        .list(Pagination::default())
        .await
        .context("Failed to list organizations")?;
    tracing::info!(organizations = existing.total, "Rocky server ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Rocky server stopped.");
    Ok(())
}
