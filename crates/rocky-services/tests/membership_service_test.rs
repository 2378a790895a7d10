//! Integration tests for the membership service.

use rocky_core::error::RockyError;
use rocky_core::models::member::MemberStatus;
use rocky_core::models::organization::{CreateOrganization, Organization, OrganizationCode};
use rocky_core::repository::{OrganizationRepository, Pagination};
use rocky_db::repository::{SurrealOrganizationMemberRepository, SurrealOrganizationRepository};
use rocky_services::membership::MembershipService;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service =
    MembershipService<SurrealOrganizationMemberRepository<Db>, SurrealOrganizationRepository<Db>>;

async fn setup() -> (Service, Organization) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rocky_db::run_migrations(&db).await.unwrap();

    let organizations = SurrealOrganizationRepository::new(db.clone());
    let org = organizations
        .create(CreateOrganization {
            name: "Members Inc".into(),
            code: OrganizationCode::parse("members").unwrap(),
            tags: vec![],
        })
        .await
        .unwrap();

    let service = MembershipService::new(SurrealOrganizationMemberRepository::new(db), organizations);
    (service, org)
}

#[tokio::test]
async fn invite_then_accept() {
    let (service, org) = setup().await;
    let user_id = Uuid::new_v4();

    let invited = service.invite(org.id, user_id).await.unwrap();
    assert_eq!(invited.status, MemberStatus::New);

    let accepted = service.accept_invitation(org.id, user_id).await.unwrap();
    assert_eq!(accepted.id, invited.id);
    assert_eq!(accepted.status, MemberStatus::Active);
}

#[tokio::test]
async fn accept_requires_pending_invitation() {
    let (service, org) = setup().await;
    let user_id = Uuid::new_v4();

    service.add_member(org.id, user_id).await.unwrap();

    let err = service.accept_invitation(org.id, user_id).await.unwrap_err();
    assert!(matches!(err, RockyError::Validation { .. }));

    let stranger = service
        .accept_invitation(org.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(stranger, RockyError::NotFound { .. }));
}

#[tokio::test]
async fn blocked_member_cannot_accept() {
    let (service, org) = setup().await;
    let user_id = Uuid::new_v4();

    let member = service.invite(org.id, user_id).await.unwrap();
    let blocked = service.block(member.id).await.unwrap();
    assert!(blocked.is_blocked());

    assert!(service.accept_invitation(org.id, user_id).await.is_err());
}

#[tokio::test]
async fn duplicate_membership_rejected() {
    let (service, org) = setup().await;
    let user_id = Uuid::new_v4();

    service.invite(org.id, user_id).await.unwrap();
    let err = service.add_member(org.id, user_id).await.unwrap_err();

    assert!(matches!(err, RockyError::AlreadyExists { .. }));
}

#[tokio::test]
async fn joining_unknown_organization_fails() {
    let (service, _) = setup().await;

    let err = service
        .add_member(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, RockyError::NotFound { .. }));
}

#[tokio::test]
async fn onboarding_and_clearance_levels() {
    let (service, org) = setup().await;
    let member = service.add_member(org.id, Uuid::new_v4()).await.unwrap();

    let onboarded = service.mark_onboarded(member.id).await.unwrap();
    assert!(onboarded.onboarded);

    let cleared = service.set_clearance_levels(member.id, 4, 2).await.unwrap();
    assert_eq!(cleared.trusted_clearance_level, 4);
    assert_eq!(cleared.acknowledged_clearance_level, 2);
    assert!(cleared.onboarded);

    let err = service
        .set_clearance_levels(member.id, 5, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, RockyError::Validation { .. }));
}

#[tokio::test]
async fn remove_and_list_members() {
    let (service, org) = setup().await;

    let first = service.add_member(org.id, Uuid::new_v4()).await.unwrap();
    service.invite(org.id, Uuid::new_v4()).await.unwrap();

    assert_eq!(
        service
            .list(org.id, Pagination::default())
            .await
            .unwrap()
            .total,
        2
    );

    service.remove(first.id).await.unwrap();

    let page = service.list(org.id, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].status, MemberStatus::New);
}
