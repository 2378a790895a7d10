//! Plumbing shared by both clients.

use reqwest::{Client, Response};
use rocky_services::client::ClientError;

use crate::config::RemoteConfig;

pub(crate) fn build_client(config: &RemoteConfig) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| ClientError::Connection(e.to_string()))
}

pub(crate) fn map_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else if err.is_decode() {
        ClientError::InvalidResponse(err.to_string())
    } else {
        ClientError::Connection(err.to_string())
    }
}

/// Turn a non-2xx response into [`ClientError::Status`].
pub(crate) async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
