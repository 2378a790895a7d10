//! Contracts for the remote services an organization lives in.
//!
//! The HTTP implementations live in `rocky-remote`; the services in this
//! crate only see these traits, so tests can substitute in-process fakes.

use rocky_core::models::organization::OrganizationCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use crate::error::ClientError;

/// Health report of a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub healthy: bool,
    #[serde(default)]
    pub version: Option<String>,
}

impl ServiceHealth {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            version: None,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            version: None,
        }
    }
}

/// The plugin catalog (KATalogus).
pub trait CatalogClient: Send + Sync {
    fn health(&self) -> impl Future<Output = Result<ServiceHealth, ClientError>> + Send;
    fn organization_exists(
        &self,
        code: &OrganizationCode,
    ) -> impl Future<Output = Result<bool, ClientError>> + Send;
    fn create_organization(
        &self,
        code: &OrganizationCode,
        name: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
    fn delete_organization(
        &self,
        code: &OrganizationCode,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// The object graph store (Octopoes).
pub trait GraphStoreClient: Send + Sync {
    fn root_health(&self) -> impl Future<Output = Result<ServiceHealth, ClientError>> + Send;
    fn create_node(
        &self,
        code: &OrganizationCode,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
    fn delete_node(
        &self,
        code: &OrganizationCode,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Source of descriptive fields for OOI types and values.
pub trait InfoSource: Send + Sync {
    fn get_info(
        &self,
        ooi_type: &str,
        natural_key: &str,
    ) -> impl Future<Output = Result<Map<String, Value>, ClientError>> + Send;
}
