//! Catalog synchronization: fetch, merge against the previous snapshot,
//! persist atomically.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::cache::{self, CacheError};
use crate::paths::DataPaths;
use crate::scrape::{CatalogSource, ScrapeError};
use crate::types::{Challenge, ChallengeCatalog, ChallengeStatus, ScrapedChallenge};

/// Snapshot time-to-live. Applies to the whole snapshot, not per record.
const SNAPSHOT_TTL_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub struct Synchronizer {
    paths: DataPaths,
    source: Arc<dyn CatalogSource>,
}

impl Synchronizer {
    pub fn new(paths: DataPaths, source: Arc<dyn CatalogSource>) -> Self {
        Self { paths, source }
    }

    /// Fetch the remote listing, reconcile it with the persisted snapshot and
    /// write the result back.
    ///
    /// The remote listing is authoritative for membership and for every
    /// source-of-truth field; only per-record progress state survives from
    /// the previous snapshot.
    pub async fn sync(&self) -> Result<ChallengeCatalog, SyncError> {
        let fresh = self.source.fetch_challenges().await?;

        let path = self.paths.catalog_file();
        let previous = if path.exists() {
            Some(cache::load_catalog(&path)?)
        } else {
            None
        };

        let now = Utc::now();
        let existing = previous.as_ref().map(|c| c.challenges.as_slice()).unwrap_or(&[]);
        let challenges = merge_challenges(existing, fresh, now);

        let catalog = ChallengeCatalog {
            expires_in: now + Duration::days(SNAPSHOT_TTL_DAYS),
            last_updated: now,
            challenges,
        };

        cache::save_json(&path, &catalog)?;
        tracing::info!(count = catalog.challenges.len(), "catalog synchronized");
        Ok(catalog)
    }
}

/// Reconcile a fresh scrape with previously persisted records.
///
/// For each fresh record: a record with the same id in the old snapshot
/// keeps its `status`, and keeps its `updated_at` too unless a
/// source-of-truth field actually changed. Records absent from the old
/// snapshot come in as `pending`. Records present only in the old snapshot
/// are dropped.
pub fn merge_challenges(
    existing: &[Challenge],
    fresh: Vec<ScrapedChallenge>,
    now: DateTime<Utc>,
) -> Vec<Challenge> {
    let by_id: FxHashMap<u64, &Challenge> = existing.iter().map(|c| (c.id, c)).collect();

    let mut seen: FxHashSet<u64> = FxHashSet::default();
    let mut merged = Vec::with_capacity(fresh.len());

    for scraped in fresh {
        let id = scraped.stable_id();
        if !seen.insert(id) {
            tracing::warn!(id, title = %scraped.title, "duplicate challenge identity in scrape, keeping first");
            continue;
        }
        let challenge = match by_id.get(&id) {
            Some(old) if source_unchanged(old, &scraped) => (*old).clone(),
            Some(old) => scraped.into_challenge(old.status, now),
            None => scraped.into_challenge(ChallengeStatus::Pending, now),
        };
        merged.push(challenge);
    }

    merged
}

fn source_unchanged(old: &Challenge, fresh: &ScrapedChallenge) -> bool {
    old.plan == fresh.plan
        && old.difficulty == fresh.difficulty
        && old.languages == fresh.languages
        && old.is_new == fresh.is_new
        && old.title == fresh.title
        && old.description == fresh.description
        && old.download_link == fresh.download_link
}
