//! HTTP clients for the KATalogus and Octopoes services.

pub mod config;
mod http;
pub mod katalogus;
pub mod octopoes;

pub use config::RemoteConfig;
pub use katalogus::KatalogusClient;
pub use octopoes::OctopoesClient;
