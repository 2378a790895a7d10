//! Rocky services: remote client contracts, organization provisioning,
//! membership and OOI information.

pub mod client;
pub mod error;
pub mod membership;
pub mod ooi_information;
pub mod provisioner;
pub mod service;

pub use client::{CatalogClient, GraphStoreClient, InfoSource, ServiceHealth};
pub use error::ClientError;
pub use membership::MembershipService;
pub use ooi_information::OoiInformationService;
pub use provisioner::{OrganizationProvisioner, Provisioned};
pub use service::OrganizationService;
