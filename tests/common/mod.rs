#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use fmsuit_cli::auth::{AuthResult, SessionAuthenticator, SessionProbe};
use fmsuit_cli::cache;
use fmsuit_cli::paths::DataPaths;
use fmsuit_cli::scrape::{CatalogSource, ScrapeError};
use fmsuit_cli::types::{Difficulty, Plan, ScrapedChallenge, SessionRecord};

pub fn scraped(slug: &str, title: &str) -> ScrapedChallenge {
    ScrapedChallenge {
        plan: Plan::Free,
        difficulty: Difficulty::Junior,
        languages: vec!["HTML".into(), "CSS".into()],
        is_new: false,
        title: title.into(),
        description: "A challenge".into(),
        download_link: format!("https://example.com/challenges/{slug}"),
    }
}

/// Write a session record that is valid for another hour.
pub fn write_live_session(paths: &DataPaths) {
    let record = SessionRecord {
        name: "session-token".into(),
        value: "abc".into(),
        expires_in: Utc::now().timestamp() + 3600,
    };
    cache::save_json(&paths.session_file(), &record).unwrap();
}

pub struct FakeSource {
    challenges: Vec<ScrapedChallenge>,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(challenges: Vec<ScrapedChallenge>) -> Self {
        Self {
            challenges,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn fetch_challenges(&self) -> Result<Vec<ScrapedChallenge>, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.challenges.clone())
    }
}

pub struct FailingSource;

#[async_trait]
impl CatalogSource for FailingSource {
    async fn fetch_challenges(&self) -> Result<Vec<ScrapedChallenge>, ScrapeError> {
        Err(ScrapeError::Timeout(Duration::from_secs(60)))
    }
}

/// Scripted authenticator that records how often it is consulted and, on a
/// successful login, persists a session record the way a real adapter must.
pub struct FakeAuth {
    pub probe_link: Option<String>,
    pub login_ok: bool,
    pub session_paths: Option<DataPaths>,
    pub verify_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
}

impl FakeAuth {
    pub fn new(probe_link: Option<String>, login_ok: bool, session_paths: Option<DataPaths>) -> Self {
        Self {
            probe_link,
            login_ok,
            session_paths,
            verify_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionAuthenticator for FakeAuth {
    async fn verify(&self) -> AuthResult<SessionProbe> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SessionProbe {
            valid: self.probe_link.is_none(),
            login_link: self.probe_link.clone(),
        })
    }

    async fn login(&self, _link: &str) -> AuthResult<bool> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if self.login_ok {
            if let Some(paths) = &self.session_paths {
                write_live_session(paths);
            }
        }
        Ok(self.login_ok)
    }
}
