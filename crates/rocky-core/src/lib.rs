//! Rocky Core: domain models, error types and repository traits for
//! organizations and the records that hang off them.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{ProvisioningError, RemoteService, RockyError, RockyResult};
