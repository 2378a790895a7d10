//! Lazily filled OOI descriptions.

use rocky_core::error::{RockyError, RockyResult};
use rocky_core::models::ooi_information::OoiInformation;
use rocky_core::repository::OoiInformationRepository;
use tracing::debug;

use crate::client::InfoSource;

pub struct OoiInformationService<R, S> {
    repo: R,
    source: S,
}

impl<R: OoiInformationRepository, S: InfoSource> OoiInformationService<R, S> {
    pub fn new(repo: R, source: S) -> Self {
        Self { repo, source }
    }

    /// Load the record, creating an empty one on first access.
    pub async fn get_or_create(&self, id: &str) -> RockyResult<OoiInformation> {
        match self.repo.get(id).await {
            Ok(info) => Ok(info),
            Err(RockyError::NotFound { .. }) => self.save(OoiInformation::new(id)).await,
            Err(e) => Err(e),
        }
    }

    /// Persist the record.
    ///
    /// A missing payload becomes `{"description": ""}`. When `consult_api`
    /// is set, fresh fields are fetched first and the flag is cleared.
    pub async fn save(&self, mut info: OoiInformation) -> RockyResult<OoiInformation> {
        info.ensure_data();
        if info.consult_api {
            info.consult_api = false;
            self.fetch_into(&mut info).await?;
        }
        self.repo.save(info).await
    }

    /// The description, fetched and saved first if it is still empty.
    pub async fn description(&self, id: &str) -> RockyResult<String> {
        let mut info = self.get_or_create(id).await?;
        if info.needs_description() {
            self.fetch_into(&mut info).await?;
            info = self.repo.save(info).await?;
        }
        Ok(info.description().to_string())
    }

    /// Force one fetch-and-save cycle.
    pub async fn refresh(&self, id: &str) -> RockyResult<OoiInformation> {
        let mut info = self.get_or_create(id).await?;
        info.consult_api = true;
        self.save(info).await
    }

    async fn fetch_into(&self, info: &mut OoiInformation) -> RockyResult<()> {
        debug!(id = %info.id, "fetching OOI information");
        let fields = self.source.get_info(info.ooi_type(), info.value()).await?;
        info.merge(fields);
        Ok(())
    }
}
