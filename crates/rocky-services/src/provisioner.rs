//! Keeps an organization's footprint in the Katalogus and Octopoes in
//! step with its record.
//!
//! Creation goes catalog first, graph store second. Deletion runs in the
//! reverse order, so the compensation for a failed second step is always
//! the same kind of call as the first step (delete undoes create on
//! creation, create undoes delete on deletion).

use rocky_core::error::{ProvisioningError, RemoteService};
use rocky_core::models::organization::OrganizationCode;
use tracing::{error, info, instrument, warn};

use crate::client::{CatalogClient, ClientError, GraphStoreClient, ServiceHealth};

/// What a successful [`OrganizationProvisioner::provision`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provisioned {
    /// False when the Katalogus entry was already there.
    pub catalog_created: bool,
}

/// Runs the create and delete sequences against both remote services.
///
/// Callers must not run two sequences for the same code concurrently.
pub struct OrganizationProvisioner<C, G> {
    catalog: C,
    graph_store: G,
}

impl<C: CatalogClient, G: GraphStoreClient> OrganizationProvisioner<C, G> {
    pub fn new(catalog: C, graph_store: G) -> Self {
        Self {
            catalog,
            graph_store,
        }
    }

    /// Check that both services are reachable and report healthy.
    pub async fn preflight(&self) -> Result<(), ProvisioningError> {
        check_health(RemoteService::Catalog, self.catalog.health().await)?;
        check_health(RemoteService::GraphStore, self.graph_store.root_health().await)?;
        Ok(())
    }

    /// Create the organization in the Katalogus (unless it is already
    /// there) and its node in Octopoes.
    ///
    /// If Octopoes fails, a Katalogus entry made by this call is deleted
    /// again. A pre-existing entry is left alone.
    #[instrument(skip(self, code, name), fields(code = %code))]
    pub async fn provision(
        &self,
        code: &OrganizationCode,
        name: &str,
    ) -> Result<Provisioned, ProvisioningError> {
        self.preflight().await?;

        let created_in_catalog = self
            .ensure_catalog_entry(code, name)
            .await
            .map_err(|e| ProvisioningError::OrganizationCreateFailed {
                service: RemoteService::Catalog,
                cause: e.to_string(),
                compensation_cause: None,
            })?;

        let Err(cause) = self.graph_store.create_node(code).await else {
            info!("organization provisioned");
            return Ok(Provisioned {
                catalog_created: created_in_catalog,
            });
        };

        let compensation_cause = if created_in_catalog {
            warn!(%cause, "node creation failed, removing catalog entry");
            match self.catalog.delete_organization(code).await {
                Ok(()) => None,
                Err(e) => {
                    error!(
                        %cause,
                        compensation_cause = %e,
                        "could not remove catalog entry, manual reconciliation required"
                    );
                    Some(e.to_string())
                }
            }
        } else {
            warn!(%cause, "node creation failed, catalog entry predates this request");
            None
        };

        Err(ProvisioningError::OrganizationCreateFailed {
            service: RemoteService::GraphStore,
            cause: cause.to_string(),
            compensation_cause,
        })
    }

    /// Delete the organization's Octopoes node, then its Katalogus entry.
    ///
    /// If the Katalogus refuses, the node is created again.
    #[instrument(skip(self, code), fields(code = %code))]
    pub async fn deprovision(&self, code: &OrganizationCode) -> Result<(), ProvisioningError> {
        self.preflight().await?;

        self.graph_store
            .delete_node(code)
            .await
            .map_err(|e| ProvisioningError::OrganizationDeleteFailed {
                service: RemoteService::GraphStore,
                cause: e.to_string(),
                compensation_cause: None,
            })?;

        let Err(cause) = self.catalog.delete_organization(code).await else {
            info!("organization deprovisioned");
            return Ok(());
        };

        warn!(%cause, "catalog deletion failed, recreating node");
        let compensation_cause = match self.graph_store.create_node(code).await {
            Ok(()) => None,
            Err(e) => {
                error!(
                    %cause,
                    compensation_cause = %e,
                    "could not recreate node, manual reconciliation required"
                );
                Some(e.to_string())
            }
        };

        Err(ProvisioningError::OrganizationDeleteFailed {
            service: RemoteService::Catalog,
            cause: cause.to_string(),
            compensation_cause,
        })
    }

    /// Undo a successful [`provision`](Self::provision) whose record could
    /// not be stored: the node goes, and the Katalogus entry only if that
    /// call created it.
    #[instrument(skip(self, code), fields(code = %code))]
    pub async fn rollback(
        &self,
        code: &OrganizationCode,
        provisioned: Provisioned,
    ) -> Result<(), ProvisioningError> {
        self.graph_store
            .delete_node(code)
            .await
            .map_err(|e| ProvisioningError::OrganizationDeleteFailed {
                service: RemoteService::GraphStore,
                cause: e.to_string(),
                compensation_cause: None,
            })?;

        if provisioned.catalog_created {
            self.catalog
                .delete_organization(code)
                .await
                .map_err(|e| ProvisioningError::OrganizationDeleteFailed {
                    service: RemoteService::Catalog,
                    cause: e.to_string(),
                    compensation_cause: None,
                })?;
        }

        info!("provisioning rolled back");
        Ok(())
    }

    /// Returns whether this call created the entry.
    async fn ensure_catalog_entry(
        &self,
        code: &OrganizationCode,
        name: &str,
    ) -> Result<bool, ClientError> {
        if self.catalog.organization_exists(code).await? {
            info!("organization already present in catalog");
            return Ok(false);
        }
        self.catalog.create_organization(code, name).await?;
        Ok(true)
    }
}

fn check_health(
    service: RemoteService,
    health: Result<ServiceHealth, ClientError>,
) -> Result<(), ProvisioningError> {
    match health {
        Ok(health) if health.healthy => Ok(()),
        Ok(_) => Err(ProvisioningError::ServiceUnhealthy { service }),
        Err(e) => Err(ProvisioningError::ServiceUnavailable {
            service,
            cause: e.to_string(),
        }),
    }
}
