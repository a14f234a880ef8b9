//! Point-in-place update of one persisted catalog record.

use chrono::Utc;

use crate::cache::{self, CacheError};
use crate::paths::DataPaths;
use crate::types::ChallengeStatus;

/// Closed set of record updates. Progress state is the only user-local
/// field, so it is the only thing a consumer can change; everything else is
/// owned by the next synchronization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeUpdate {
    Status(ChallengeStatus),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchOutcome {
    Updated,
    /// No snapshot file exists yet; nothing to patch.
    NoCache,
    /// The id is not present in the snapshot; nothing was mutated.
    NotFound,
}

/// Apply `update` to the record with `id` in the persisted snapshot.
///
/// A missing snapshot or an unknown id is a warning, not an error: the
/// operation becomes a no-op and the file is left untouched. On a hit, the
/// record's `updated_at` and the snapshot's `last_updated` are stamped and
/// the whole snapshot is persisted atomically.
pub fn patch(paths: &DataPaths, id: u64, update: ChallengeUpdate) -> Result<PatchOutcome, CacheError> {
    let path = paths.catalog_file();
    if !path.exists() {
        tracing::warn!(id, "no cache to patch");
        return Ok(PatchOutcome::NoCache);
    }

    let mut catalog = cache::load_catalog(&path)?;
    let Some(challenge) = catalog.challenges.iter_mut().find(|c| c.id == id) else {
        tracing::warn!(id, "challenge id not found in cache");
        return Ok(PatchOutcome::NotFound);
    };

    match update {
        ChallengeUpdate::Status(status) => challenge.status = status,
    }

    let now = Utc::now();
    challenge.updated_at = now;
    catalog.last_updated = now;

    cache::save_json(&path, &catalog)?;
    Ok(PatchOutcome::Updated)
}
