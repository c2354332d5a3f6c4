use std::sync::Arc;
use virtual_tryon::{
    config::AppConfig,
    db::{PgStore, RecordStore},
    models::{
        status::StatusCheck,
        tryon::{Measurements, TryOnRecord, TryOnStatus, TryOnUpdate},
    },
    services::tryon::TryOnService,
};

mod fixtures;
mod helpers;

/// Integration test: record store against PostgreSQL
///
/// Covers migrations, insert/read, the single settle transition, ordering
/// and status checks.
///
/// Note: This requires a running PostgreSQL instance configured via
/// DATABASE_URL (and FAL_KEY, which is not used).
#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_postgres_store() {
    let config = AppConfig::from_env().expect("Failed to load config");
    let store = PgStore::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    store.ping().await.expect("Ping failed");

    // 1. Insert and read back
    let record = TryOnRecord::new(
        "Integration User".to_string(),
        Measurements {
            height: "180".to_string(),
            weight: "80".to_string(),
            chest: "100".to_string(),
            waist: "85".to_string(),
            hips: "98".to_string(),
        },
        "formal".to_string(),
    );
    store.insert_tryon(&record).await.expect("Insert failed");

    let fetched = store
        .find_tryon(record.id)
        .await
        .expect("Find failed")
        .expect("Record not found");
    assert_eq!(fetched.status, TryOnStatus::Processing);
    assert_eq!(fetched.measurements, record.measurements);

    // 2. Settle once
    let update = TryOnUpdate::Completed {
        tryon_image: "https://fal.media/files/it.png".to_string(),
        feedback: "done".to_string(),
    };
    assert!(store.update_tryon(record.id, &update).await.expect("Update failed"));
    assert!(!store
        .update_tryon(record.id, &TryOnUpdate::Failed)
        .await
        .expect("Update failed"));

    let settled = store.find_tryon(record.id).await.unwrap().unwrap();
    assert_eq!(settled.status, TryOnStatus::Completed);
    assert_eq!(settled.tryon_image.as_deref(), Some("https://fal.media/files/it.png"));

    // 3. Ordering
    let listed = store.list_tryons(100).await.expect("List failed");
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    // 4. Status checks
    let check = StatusCheck::new("integration".to_string());
    store.insert_status_check(&check).await.expect("Insert status failed");
    let checks = store.list_status_checks(1000).await.expect("List status failed");
    assert!(checks.iter().any(|c| c.id == check.id));

    store.close().await;
    println!("✅ PostgreSQL store integration test passed!");
}

/// Full lifecycle through the Postgres store with a stubbed generator.
#[tokio::test]
#[ignore]
async fn test_postgres_lifecycle_failure_path() {
    let config = AppConfig::from_env().expect("Failed to load config");
    let store = Arc::new(
        PgStore::connect(&config.database_url)
            .await
            .expect("Failed to connect to database"),
    );
    let generator = helpers::StubGenerator::new(helpers::StubOutcome::EmptyResult);
    let service = TryOnService::new(store.clone(), generator);

    let err = service
        .submit(fixtures::sample_request())
        .await
        .expect_err("Generation should fail");
    println!("  generation error: {err}");

    let latest = store.list_tryons(1).await.unwrap();
    assert_eq!(latest[0].status, TryOnStatus::Failed);
    assert!(latest[0].tryon_image.is_none());
}
