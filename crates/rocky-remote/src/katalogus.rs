//! KATalogus client: one organisation entry per organization code.

use reqwest::{Client, StatusCode};
use rocky_core::models::organization::OrganizationCode;
use rocky_services::client::{CatalogClient, ClientError, ServiceHealth};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::RemoteConfig;
use crate::http::{build_client, check_status, map_error};

#[derive(Debug, Serialize)]
struct CreateOrganisationRequest<'a> {
    id: &'a str,
    name: &'a str,
}

#[derive(Debug, Clone)]
pub struct KatalogusClient {
    http: Client,
    base_url: String,
}

impl KatalogusClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_client(config)?,
            base_url: config.base_url.clone(),
        })
    }

    fn organisation_url(&self, code: &OrganizationCode) -> String {
        format!("{}/v1/organisations/{}", self.base_url, code)
    }
}

impl CatalogClient for KatalogusClient {
    #[instrument(skip(self))]
    async fn health(&self) -> Result<ServiceHealth, ClientError> {
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
    async fn organization_exists(&self, code: &OrganizationCode) -> Result<bool, ClientError> {
        let response = self
            .http
            .get(self.organisation_url(code))
            .send()
            .await
            .map_err(map_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("organisation not in katalogus");
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    #[instrument(skip(self, code, name), fields(code = %code))]
    async fn create_organization(
        &self,
        code: &OrganizationCode,
        name: &str,
    ) -> Result<(), ClientError> {
        let request = CreateOrganisationRequest {
            id: code.as_str(),
            name,
        };

        let response = self
            .http
            .post(format!("{}/v1/organisations/", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(map_error)?;

        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, code), fields(code = %code))]
    async fn delete_organization(&self, code: &OrganizationCode) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.organisation_url(code))
            .send()
            .await
            .map_err(map_error)?;

        check_status(response).await?;
        Ok(())
    }
}
