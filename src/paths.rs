use std::path::{Path, PathBuf};

/// Remote source of truth for the challenge catalog.
pub const SITE_URL: &str = "https://www.frontendmentor.io";

/// File layout under the per-user data directory.
///
/// Everything the tool persists (session, catalog snapshot, config, browser
/// profile) lives under one dot-directory in the user's home. The root is
/// overridable so tests can point the whole engine at a tempdir.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn from_home() -> Self {
        let home = dirs::home_dir().expect("couldn't find home dir");
        Self {
            root: home.join(".fmsuit-cli-sessions"),
        }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persisted session credential (`name`/`value`/`expires_in` epoch seconds).
    pub fn session_file(&self) -> PathBuf {
        self.root.join("fm-session.json")
    }

    /// Persisted challenge catalog snapshot.
    pub fn catalog_file(&self) -> PathBuf {
        self.root.join("challenge_cache.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Profile directory handed to the browser during the login flow so the
    /// remote session survives across launches.
    pub fn browser_profile_dir(&self) -> PathBuf {
        self.root.join("browser_session")
    }
}
