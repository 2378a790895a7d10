//! Integration tests for lazily fetched OOI information.

mod common;

use common::FakeInfoSource;
use rocky_core::models::ooi_information::OoiInformation;
use rocky_core::repository::OoiInformationRepository;
use rocky_db::repository::SurrealOoiInformationRepository;
use rocky_services::client::ClientError;
use rocky_services::ooi_information::OoiInformationService;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn repo() -> SurrealOoiInformationRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rocky_db::run_migrations(&db).await.unwrap();
    SurrealOoiInformationRepository::new(db)
}

#[tokio::test]
async fn get_or_create_starts_with_empty_description() {
    let source = FakeInfoSource::returning(json!({ "description": "unused" }));
    let service = OoiInformationService::new(repo().await, source.clone());

    let info = service.get_or_create("Port|443").await.unwrap();

    assert_eq!(info.id, "Port|443");
    assert_eq!(info.description(), "");
    assert!(source.lookups().is_empty());
}

#[tokio::test]
async fn empty_description_is_fetched_and_saved() {
    let repo = repo().await;
    let source = FakeInfoSource::returning(json!({
        "description": "HTTPS",
        "source": "https://www.iana.org",
    }));
    let service = OoiInformationService::new(repo.clone(), source.clone());

    let description = service.description("Port|443").await.unwrap();

    assert_eq!(description, "HTTPS");
    assert_eq!(
        source.lookups(),
        vec![("Port".to_string(), "443".to_string())]
    );

    let stored = repo.get("Port|443").await.unwrap();
    assert_eq!(stored.description(), "HTTPS");
    assert_eq!(stored.data.unwrap()["source"], json!("https://www.iana.org"));

    // A filled description is not fetched again.
    service.description("Port|443").await.unwrap();
    assert_eq!(source.lookups().len(), 1);
}

#[tokio::test]
async fn lookup_passes_full_natural_key() {
    let source = FakeInfoSource::returning(json!({ "description": "DNS" }));
    let service = OoiInformationService::new(repo().await, source.clone());

    service.description("IPPort|internet|1.1.1.1|udp|53").await.unwrap();

    assert_eq!(
        source.lookups(),
        vec![(
            "IPPort".to_string(),
            "internet|1.1.1.1|udp|53".to_string()
        )]
    );
}

#[tokio::test]
async fn consult_api_forces_one_fetch_and_resets() {
    let source = FakeInfoSource::returning(json!({ "description": "fresh" }));
    let service = OoiInformationService::new(repo().await, source.clone());

    let mut info = OoiInformation::new("Finding|KAT-500");
    info.merge(json!({ "description": "stale", "risk": "low" }).as_object().cloned().unwrap());
    info.consult_api = true;

    let saved = service.save(info).await.unwrap();

    assert!(!saved.consult_api);
    assert_eq!(saved.description(), "fresh");
    assert_eq!(saved.data.as_ref().unwrap()["risk"], json!("low"));
    assert_eq!(source.lookups().len(), 1);

    service.save(saved).await.unwrap();
    assert_eq!(source.lookups().len(), 1);
}

#[tokio::test]
async fn refresh_overwrites_existing_fields() {
    let source = FakeInfoSource::returning(json!({ "description": "updated" }));
    let service = OoiInformationService::new(repo().await, source.clone());

    let mut info = OoiInformation::new("Network|internet");
    info.merge(json!({ "description": "old" }).as_object().cloned().unwrap());
    service.save(info).await.unwrap();

    let refreshed = service.refresh("Network|internet").await.unwrap();

    assert_eq!(refreshed.description(), "updated");
    assert!(!refreshed.consult_api);
}

#[tokio::test]
async fn failed_lookup_surfaces_error() {
    let source = FakeInfoSource::default().failing(ClientError::Timeout);
    let service = OoiInformationService::new(repo().await, source);

    assert!(service.description("Port|22").await.is_err());
}

#[tokio::test]
async fn null_description_is_not_refetched() {
    let source = FakeInfoSource::returning(json!({ "description": "unused" }));
    let service = OoiInformationService::new(repo().await, source.clone());

    let mut info = OoiInformation::new("Port|8080");
    info.merge(json!({ "description": null }).as_object().cloned().unwrap());
    service.save(info).await.unwrap();

    assert_eq!(service.description("Port|8080").await.unwrap(), "");
    assert_eq!(service.description("Port|8080").await.unwrap(), "");
    assert!(source.lookups().is_empty());
}
