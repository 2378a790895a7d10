//! Octopoes client. Each organization owns one node, addressed by its
//! code.

use reqwest::Client;
use rocky_core::models::organization::OrganizationCode;
use rocky_services::client::{ClientError, GraphStoreClient, ServiceHealth};
use tracing::instrument;

use crate::config::RemoteConfig;
use crate::http::{build_client, check_status, map_error};

#[derive(Debug, Clone)]
pub struct OctopoesClient {
    http: Client,
    base_url: String,
}

impl OctopoesClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_client(config)?,
            base_url: config.base_url.clone(),
        })
    }

    fn node_url(&self, code: &OrganizationCode) -> String {
        format!("{}/{}/node", self.base_url, code)
    }
}

impl GraphStoreClient for OctopoesClient {
    #[instrument(skip(self))]
    async fn root_health(&self) -> Result<ServiceHealth, ClientError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(map_error)?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(map_error)
    }

    #[instrument(skip(self, code), fields(code = %code))]
    async fn create_node(&self, code: &OrganizationCode) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.node_url(code))
            .send()
            .await
            .map_err(map_error)?;

        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, code), fields(code = %code))]
    async fn delete_node(&self, code: &OrganizationCode) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.node_url(code))
            .send()
            .await
            .map_err(map_error)?;

        check_status(response).await?;
        Ok(())
    }
}
