use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use fmsuit_cli::cache;
use fmsuit_cli::patch::{self, ChallengeUpdate, PatchOutcome};
use fmsuit_cli::paths::DataPaths;
use fmsuit_cli::sync::{SyncError, Synchronizer};
use fmsuit_cli::types::ChallengeStatus;

mod common;
use common::{scraped, FailingSource, FakeSource};

#[tokio::test]
async fn first_sync_into_an_empty_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::with_root(dir.path());
    let source = Arc::new(FakeSource::new(vec![
        scraped("qr-code", "QR code"),
        scraped("recipe-page", "Recipe page"),
    ]));

    let before = Utc::now();
    let catalog = Synchronizer::new(paths.clone(), source).sync().await.unwrap();
    let after = Utc::now();

    assert_eq!(catalog.challenges.len(), 2);
    assert!(catalog
        .challenges
        .iter()
        .all(|c| c.status == ChallengeStatus::Pending));

    assert!(catalog.last_updated >= before && catalog.last_updated <= after);
    assert!(catalog.expires_in >= before + Duration::days(7));
    assert!(catalog.expires_in <= after + Duration::days(7));

    // The snapshot is on disk and loadable.
    let persisted = cache::load_catalog(&paths.catalog_file()).unwrap();
    assert_eq!(persisted, catalog);
}

#[tokio::test]
async fn resync_preserves_progress_and_drops_retired_records() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::with_root(dir.path());

    let first = Arc::new(FakeSource::new(vec![
        scraped("qr-code", "QR code"),
        scraped("retired", "Retired challenge"),
    ]));
    Synchronizer::new(paths.clone(), first).sync().await.unwrap();

    // The user marks one challenge completed between syncs.
    let qr_id = scraped("qr-code", "QR code").stable_id();
    assert_eq!(
        patch::patch(&paths, qr_id, ChallengeUpdate::Status(ChallengeStatus::Completed)).unwrap(),
        PatchOutcome::Updated
    );

    let second = Arc::new(FakeSource::new(vec![
        scraped("qr-code", "QR code v2"),
        scraped("brand-new", "Brand new"),
    ]));
    let catalog = Synchronizer::new(paths.clone(), second).sync().await.unwrap();

    assert_eq!(catalog.challenges.len(), 2);

    let qr = catalog.challenges.iter().find(|c| c.id == qr_id).unwrap();
    assert_eq!(qr.status, ChallengeStatus::Completed);
    assert_eq!(qr.title, "QR code v2");

    let fresh = catalog
        .challenges
        .iter()
        .find(|c| c.title == "Brand new")
        .unwrap();
    assert_eq!(fresh.status, ChallengeStatus::Pending);

    assert!(catalog.challenges.iter().all(|c| c.title != "Retired challenge"));
}

#[tokio::test]
async fn resync_with_identical_content_only_bumps_last_updated() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::with_root(dir.path());
    let records = vec![scraped("qr-code", "QR code"), scraped("recipe-page", "Recipe page")];

    let first = Synchronizer::new(paths.clone(), Arc::new(FakeSource::new(records.clone())))
        .sync()
        .await
        .unwrap();

    std::thread::sleep(StdDuration::from_millis(5));

    let second = Synchronizer::new(paths.clone(), Arc::new(FakeSource::new(records)))
        .sync()
        .await
        .unwrap();

    assert_eq!(second.challenges, first.challenges);
    assert!(second.last_updated > first.last_updated);
}

#[tokio::test]
async fn scrape_failure_is_fatal_and_leaves_no_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::with_root(dir.path());

    let err = Synchronizer::new(paths.clone(), Arc::new(FailingSource))
        .sync()
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Scrape(_)));
    assert!(!paths.catalog_file().exists());
}
