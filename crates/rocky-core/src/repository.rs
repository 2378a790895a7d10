//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. None of them touch the remote
//! services: keeping those in step with the organization records is the
//! job of the service layer.

use uuid::Uuid;

use crate::error::RockyResult;
use crate::models::{
    indemnification::{CreateIndemnification, Indemnification},
    job::{CreateJob, Job},
    member::{CreateOrganizationMember, OrganizationMember, UpdateOrganizationMember},
    ooi_information::OoiInformation,
    organization::{CreateOrganization, Organization, UpdateOrganization},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = RockyResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RockyResult<Organization>> + Send;
    fn get_by_code(&self, code: &str) -> impl Future<Output = RockyResult<Organization>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = RockyResult<Organization>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = RockyResult<Organization>> + Send;
    /// Remove the record. Members are deleted with it; indemnifications
    /// and jobs lose their organization reference.
    fn delete(&self, id: Uuid) -> impl Future<Output = RockyResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RockyResult<PaginatedResult<Organization>>> + Send;
}

// ---------------------------------------------------------------------------
// Organization-scoped records
// ---------------------------------------------------------------------------

pub trait OrganizationMemberRepository: Send + Sync {
    /// Fails with `AlreadyExists` if the user is already a member.
    fn create(
        &self,
        input: CreateOrganizationMember,
    ) -> impl Future<Output = RockyResult<OrganizationMember>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RockyResult<OrganizationMember>> + Send;
    fn get_by_user(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = RockyResult<OrganizationMember>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganizationMember,
    ) -> impl Future<Output = RockyResult<OrganizationMember>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = RockyResult<()>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RockyResult<PaginatedResult<OrganizationMember>>> + Send;
}

pub trait IndemnificationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateIndemnification,
    ) -> impl Future<Output = RockyResult<Indemnification>> + Send;
    /// Whether `user_id` has indemnified `organization_id`.
    fn exists(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> impl Future<Output = RockyResult<bool>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = RockyResult<Vec<Indemnification>>> + Send;
    /// Null the user reference on every indemnification of a deleted user.
    /// Returns the number of records touched.
    fn clear_user(&self, user_id: Uuid) -> impl Future<Output = RockyResult<u64>> + Send;
}

pub trait JobRepository: Send + Sync {
    fn create(&self, input: CreateJob) -> impl Future<Output = RockyResult<Job>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RockyResult<Job>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RockyResult<PaginatedResult<Job>>> + Send;
}

// ---------------------------------------------------------------------------
// OOI information (global scope)
// ---------------------------------------------------------------------------

pub trait OoiInformationRepository: Send + Sync {
    fn get(&self, id: &str) -> impl Future<Output = RockyResult<OoiInformation>> + Send;
    /// Insert or replace the record and stamp `last_updated`.
    fn save(
        &self,
        info: OoiInformation,
    ) -> impl Future<Output = RockyResult<OoiInformation>> + Send;
    fn delete(&self, id: &str) -> impl Future<Output = RockyResult<()>> + Send;
}
