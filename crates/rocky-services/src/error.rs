//! Remote call error types.

use rocky_core::error::RockyError;
use thiserror::Error;

/// Failure of a single remote call.
///
/// Provisioning keeps only the display text of these as the `cause` of a
/// [`rocky_core::error::ProvisioningError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("timeout")]
    Timeout,

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ClientError> for RockyError {
    fn from(err: ClientError) -> Self {
        RockyError::Internal(format!("remote call failed: {err}"))
    }
}
