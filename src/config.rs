//! Persisted user configuration.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cache::{self, CacheError};
use crate::paths::DataPaths;

/// User-editable settings stored as `config.json` in the data directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Directory where challenge starter archives are downloaded.
    pub challenge_path: PathBuf,
}

impl ConfigFile {
    /// Load the config, falling back to defaults when no file exists yet.
    /// An existing but unreadable file is an error, like any other cache.
    pub fn load(paths: &DataPaths) -> Result<Self, CacheError> {
        let path = paths.config_file();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, paths: &DataPaths) -> Result<(), CacheError> {
        cache::save_json(&paths.config_file(), self)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            challenge_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
