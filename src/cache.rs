//! File-backed TTL validity checks and atomic JSON persistence.
//!
//! Two differently-shaped records share the same validity question: the
//! session file stores its expiry as epoch seconds, the catalog snapshot as
//! an absolute instant. [`CacheEntry`] makes the shape dispatch explicit
//! instead of sniffing individual fields.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ChallengeCatalog, SessionRecord};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Either persisted shape. Deserialization is driven by the incompatible
/// `expires_in` representations (integer seconds vs ISO-8601 string), so a
/// session file can never be mistaken for a catalog or vice versa.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CacheEntry {
    Session(SessionRecord),
    Catalog(ChallengeCatalog),
}

impl CacheEntry {
    /// Absolute expiry instant of the entry, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            CacheEntry::Session(session) => DateTime::from_timestamp(session.expires_in, 0),
            CacheEntry::Catalog(catalog) => Some(catalog.expires_in),
        }
    }
}

/// Whether the record at `path` exists and has not expired.
///
/// A missing file is simply `Ok(false)`. An existing file that cannot be
/// read or parsed is an error for the caller, never silently treated as a
/// miss. The boundary instant counts as expired.
pub fn is_valid(path: &Path) -> Result<bool, CacheError> {
    if !path.exists() {
        return Ok(false);
    }
    let entry = read_entry(path)?;
    let Some(expiry) = entry.expires_at() else {
        return Ok(false);
    };
    Ok(Utc::now() < expiry)
}

pub fn read_entry(path: &Path) -> Result<CacheEntry, CacheError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn load_catalog(path: &Path) -> Result<ChallengeCatalog, CacheError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn load_session(path: &Path) -> Result<SessionRecord, CacheError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Persist `value` as pretty JSON using a temporary file and an atomic
/// rename, so a concurrent validity check never observes a half-written
/// record.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp = path.with_extension("tmp");
    let mut f = File::create(&temp)?;
    let content = serde_json::to_string_pretty(value)?;
    f.write_all(content.as_bytes())?;
    f.sync_all()?;
    fs::rename(temp, path)?;
    Ok(())
}
