use std::fs;

use chrono::{Duration, Utc};

use fmsuit_cli::cache::{self, CacheError};
use fmsuit_cli::types::{ChallengeCatalog, SessionRecord};

fn session(expires_in: i64) -> SessionRecord {
    SessionRecord {
        name: "session-token".into(),
        value: "abc".into(),
        expires_in,
    }
}

fn catalog(expires_in: chrono::DateTime<Utc>) -> ChallengeCatalog {
    ChallengeCatalog {
        expires_in,
        last_updated: Utc::now(),
        challenges: vec![],
    }
}

#[test]
fn missing_file_is_simply_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");
    assert!(!cache::is_valid(&path).unwrap());
}

#[test]
fn unparsable_existing_file_is_an_error_not_a_miss() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = cache::is_valid(&path).unwrap_err();
    assert!(matches!(err, CacheError::Json(_)));
}

#[test]
fn session_record_is_valid_until_its_epoch_second_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let record = session(Utc::now().timestamp() + 3600);
    cache::save_json(&path, &record).unwrap();
    assert!(cache::is_valid(&path).unwrap());
    assert_eq!(cache::load_session(&path).unwrap(), record);

    cache::save_json(&path, &session(Utc::now().timestamp() - 3600)).unwrap();
    assert!(!cache::is_valid(&path).unwrap());
}

#[test]
fn session_expiry_boundary_counts_as_expired() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    // Expiry lands on the current second; "now" is already at or past it.
    cache::save_json(&path, &session(Utc::now().timestamp())).unwrap();
    assert!(!cache::is_valid(&path).unwrap());
}

#[test]
fn catalog_record_compares_its_absolute_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    cache::save_json(&path, &catalog(Utc::now() + Duration::days(3))).unwrap();
    assert!(cache::is_valid(&path).unwrap());

    cache::save_json(&path, &catalog(Utc::now() - Duration::seconds(1))).unwrap();
    assert!(!cache::is_valid(&path).unwrap());
}

#[test]
fn atomic_save_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    cache::save_json(&path, &catalog(Utc::now())).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}
