//! Organization lifecycle: record mutations gated on remote provisioning.

use rocky_core::error::{RockyError, RockyResult};
use rocky_core::models::organization::{
    CreateOrganization, Organization, OrganizationCode, UpdateOrganization,
};
use rocky_core::repository::{OrganizationRepository, PaginatedResult, Pagination};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::client::{CatalogClient, GraphStoreClient};
use crate::provisioner::OrganizationProvisioner;

/// Organization service.
///
/// Generic over the repository and both remote clients so that this layer
/// has no dependency on the database or HTTP crates.
pub struct OrganizationService<R, C, G> {
    repo: R,
    provisioner: OrganizationProvisioner<C, G>,
}

impl<R, C, G> OrganizationService<R, C, G>
where
    R: OrganizationRepository,
    C: CatalogClient,
    G: GraphStoreClient,
{
    pub fn new(repo: R, provisioner: OrganizationProvisioner<C, G>) -> Self {
        Self { repo, provisioner }
    }

    pub fn provisioner(&self) -> &OrganizationProvisioner<C, G> {
        &self.provisioner
    }

    /// Provision the organization remotely, then persist the record.
    ///
    /// Nothing is persisted unless provisioning succeeds. When the record
    /// cannot be stored afterwards, whatever provisioning created is removed
    /// again, unless another record already owns the code.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create(&self, mut input: CreateOrganization) -> RockyResult<Organization> {
        input.validate()?;
        self.ensure_unique(&input).await?;

        let provisioned = self.provisioner.provision(&input.code, &input.name).await?;

        let code = input.code.clone();
        let err = match self.repo.create(input).await {
            Ok(org) => {
                info!(organization_id = %org.id, "organization created");
                return Ok(org);
            }
            Err(e) => e,
        };

        // A duplicate whose Katalogus entry predates this call, or whose code
        // is stored, means the partitions belong to another record.
        if matches!(err, RockyError::AlreadyExists { .. })
            && (!provisioned.catalog_created || self.code_is_stored(&code).await)
        {
            warn!(error = %err, "code owned by another organization, keeping its partitions");
            return Err(err);
        }

        warn!(error = %err, "storing organization failed, rolling back provisioning");
        if let Err(undo) = self.provisioner.rollback(&code, provisioned).await {
            error!(
                error = %undo,
                "could not roll back provisioning of unstored organization, manual reconciliation required"
            );
        }
        Err(err)
    }

    /// Deprovision the organization remotely, then remove the record.
    ///
    /// The record stays when deprovisioning fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> RockyResult<()> {
        let org = self.repo.get_by_id(id).await?;

        self.provisioner.deprovision(&org.code).await?;
        self.repo.delete(id).await?;

        info!(code = %org.code, "organization deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> RockyResult<Organization> {
        self.repo.get_by_id(id).await
    }

    pub async fn get_by_code(&self, code: &str) -> RockyResult<Organization> {
        self.repo.get_by_code(code).await
    }

    /// Rename or retag. Neither touches the remote services.
    pub async fn update(&self, id: Uuid, mut input: UpdateOrganization) -> RockyResult<Organization> {
        input.validate()?;
        self.repo.update(id, input).await
    }

    pub async fn list(&self, pagination: Pagination) -> RockyResult<PaginatedResult<Organization>> {
        self.repo.list(pagination).await
    }

    /// Errs on the side of keeping the partitions when the lookup fails.
    async fn code_is_stored(&self, code: &OrganizationCode) -> bool {
        !matches!(
            self.repo.get_by_code(code.as_str()).await,
            Err(RockyError::NotFound { .. })
        )
    }

    async fn ensure_unique(&self, input: &CreateOrganization) -> RockyResult<()> {
        match self.repo.get_by_code(input.code.as_str()).await {
            Ok(_) => {
                return Err(RockyError::AlreadyExists {
                    entity: format!("organization with code {}", input.code),
                });
            }
            Err(RockyError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }
        match self.repo.get_by_name(&input.name).await {
            Ok(_) => Err(RockyError::AlreadyExists {
                entity: format!("organization with name {}", input.name),
            }),
            Err(RockyError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
