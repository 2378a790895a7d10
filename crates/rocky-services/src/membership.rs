//! Organization membership: invitations, blocking and clearance levels.

use rocky_core::error::{RockyError, RockyResult};
use rocky_core::models::member::{
    CreateOrganizationMember, MemberStatus, OrganizationMember, UpdateOrganizationMember,
};
use rocky_core::repository::{
    OrganizationMemberRepository, OrganizationRepository, PaginatedResult, Pagination,
};
use tracing::info;
use uuid::Uuid;

pub struct MembershipService<M, O> {
    members: M,
    organizations: O,
}

impl<M, O> MembershipService<M, O>
where
    M: OrganizationMemberRepository,
    O: OrganizationRepository,
{
    pub fn new(members: M, organizations: O) -> Self {
        Self {
            members,
            organizations,
        }
    }

    /// Add a user who still has to accept the invite.
    pub async fn invite(&self, organization_id: Uuid, user_id: Uuid) -> RockyResult<OrganizationMember> {
        self.join(organization_id, user_id, MemberStatus::New).await
    }

    /// Add a user directly, skipping the invitation step.
    pub async fn add_member(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> RockyResult<OrganizationMember> {
        self.join(organization_id, user_id, MemberStatus::Active).await
    }

    /// Only pending invitations can be accepted.
    pub async fn accept_invitation(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> RockyResult<OrganizationMember> {
        let member = self.members.get_by_user(organization_id, user_id).await?;
        if member.status != MemberStatus::New {
            return Err(RockyError::validation(format!(
                "no pending invitation: membership is {}",
                member.status
            )));
        }
        self.set_status(member.id, MemberStatus::Active).await
    }

    pub async fn block(&self, member_id: Uuid) -> RockyResult<OrganizationMember> {
        let member = self.set_status(member_id, MemberStatus::Blocked).await?;
        info!(member_id = %member.id, organization_id = %member.organization_id, "member blocked");
        Ok(member)
    }

    pub async fn mark_onboarded(&self, member_id: Uuid) -> RockyResult<OrganizationMember> {
        self.members
            .update(
                member_id,
                UpdateOrganizationMember {
                    onboarded: Some(true),
                    ..Default::default()
                },
            )
            .await
    }

    /// Both levels must lie in `[-1, MAX_SCAN_LEVEL]`.
    pub async fn set_clearance_levels(
        &self,
        member_id: Uuid,
        trusted: i64,
        acknowledged: i64,
    ) -> RockyResult<OrganizationMember> {
        self.members
            .update(
                member_id,
                UpdateOrganizationMember {
                    trusted_clearance_level: Some(trusted),
                    acknowledged_clearance_level: Some(acknowledged),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn remove(&self, member_id: Uuid) -> RockyResult<()> {
        self.members.delete(member_id).await
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> RockyResult<PaginatedResult<OrganizationMember>> {
        self.members
            .list_by_organization(organization_id, pagination)
            .await
    }

    async fn join(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        status: MemberStatus,
    ) -> RockyResult<OrganizationMember> {
        // The organization must exist.
        self.organizations.get_by_id(organization_id).await?;

        let member = self
            .members
            .create(CreateOrganizationMember::new(user_id, organization_id, status))
            .await?;
        info!(member_id = %member.id, %organization_id, %status, "member added");
        Ok(member)
    }

    async fn set_status(
        &self,
        member_id: Uuid,
        status: MemberStatus,
    ) -> RockyResult<OrganizationMember> {
        self.members
            .update(
                member_id,
                UpdateOrganizationMember {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
    }
}
