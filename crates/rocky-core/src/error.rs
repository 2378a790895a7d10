//! Error types for Rocky.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RockyError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RockyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type RockyResult<T> = Result<T, RockyError>;

/// The remote services that hold an organization's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteService {
    /// KATalogus: plugin settings per organization.
    Catalog,
    /// Octopoes: the organization's object graph node.
    GraphStore,
}

impl fmt::Display for RemoteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteService::Catalog => f.write_str("Katalogus"),
            RemoteService::GraphStore => f.write_str("Octopoes"),
        }
    }
}

/// Failures of the organization create/delete sequence.
///
/// When `compensation_cause` is set the reversing action failed too, and the
/// record store and the remote services no longer agree on whether the
/// organization exists. That state needs manual reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisioningError {
    #[error("The {service} service is not up: {cause}")]
    ServiceUnavailable { service: RemoteService, cause: String },

    #[error("The {service} service is not healthy")]
    ServiceUnhealthy { service: RemoteService },

    #[error(
        "{service} returned error creating organization: {cause}{}",
        compensation_suffix(.compensation_cause)
    )]
    OrganizationCreateFailed {
        service: RemoteService,
        cause: String,
        compensation_cause: Option<String>,
    },

    #[error(
        "{service} returned error deleting organization: {cause}{}",
        compensation_suffix(.compensation_cause)
    )]
    OrganizationDeleteFailed {
        service: RemoteService,
        cause: String,
        compensation_cause: Option<String>,
    },
}

fn compensation_suffix(compensation_cause: &Option<String>) -> String {
    match compensation_cause {
        Some(cause) => format!(
            " (rollback failed, manual reconciliation required: {cause})"
        ),
        None => String::new(),
    }
}

impl ProvisioningError {
    /// The service whose call failed.
    pub fn service(&self) -> RemoteService {
        match self {
            ProvisioningError::ServiceUnavailable { service, .. }
            | ProvisioningError::ServiceUnhealthy { service }
            | ProvisioningError::OrganizationCreateFailed { service, .. }
            | ProvisioningError::OrganizationDeleteFailed { service, .. } => *service,
        }
    }

    /// True when the compensating action failed as well.
    pub fn compensation_failed(&self) -> bool {
        matches!(
            self,
            ProvisioningError::OrganizationCreateFailed {
                compensation_cause: Some(_),
                ..
            } | ProvisioningError::OrganizationDeleteFailed {
                compensation_cause: Some(_),
                ..
            }
        )
    }

    pub fn compensation_cause(&self) -> Option<&str> {
        match self {
            ProvisioningError::OrganizationCreateFailed {
                compensation_cause, ..
            }
            | ProvisioningError::OrganizationDeleteFailed {
                compensation_cause, ..
            } => compensation_cause.as_deref(),
            _ => None,
        }
    }
}
