//! Initialization sequencing: session question first, catalog second.

use std::sync::Arc;

use thiserror::Error;

use crate::auth::{AuthError, SessionAuthenticator};
use crate::cache::{self, CacheError};
use crate::paths::DataPaths;
use crate::scrape::CatalogSource;
use crate::status::{AppStatus, LogSink, PermissionGate, StatusSink};
use crate::sync::{SyncError, Synchronizer};
use crate::types::ChallengeCatalog;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("initialization failed: {0}")]
    Cache(#[from] CacheError),
    #[error("initialization failed: {0}")]
    Auth(#[from] AuthError),
    #[error("initialization failed: login was rejected by the remote source")]
    LoginFailed,
    #[error("initialization failed: {0}")]
    Sync(#[from] SyncError),
}

/// Drives the startup sequence: validate the cached session, authenticate if
/// needed (behind an explicit permission grant), then serve the catalog from
/// cache or re-synchronize it. Each transition is fanned out to the attached
/// observation-only sinks.
pub struct Initializer {
    paths: DataPaths,
    authenticator: Arc<dyn SessionAuthenticator>,
    source: Arc<dyn CatalogSource>,
    gate: Arc<PermissionGate>,
    sinks: Vec<Arc<dyn StatusSink>>,
}

impl Initializer {
    pub fn new(
        paths: DataPaths,
        authenticator: Arc<dyn SessionAuthenticator>,
        source: Arc<dyn CatalogSource>,
    ) -> Self {
        Self {
            paths,
            authenticator,
            source,
            gate: Arc::new(PermissionGate::new()),
            sinks: vec![Arc::new(LogSink)],
        }
    }

    pub fn add_sink(&mut self, sink: Arc<dyn StatusSink>) {
        self.sinks.push(sink);
    }

    /// Handle the consumer uses to resolve the `awaiting_permission` wait.
    pub fn permission_gate(&self) -> Arc<PermissionGate> {
        Arc::clone(&self.gate)
    }

    fn transition(&self, status: AppStatus) {
        for sink in &self.sinks {
            sink.on_transition(status);
        }
    }

    /// Run the full startup sequence and hand back the catalog snapshot.
    pub async fn run(&self) -> Result<ChallengeCatalog, InitError> {
        self.finish(self.run_sequence(false).await)
    }

    /// Like [`run`](Self::run), but re-synchronizes the catalog even when the
    /// cached snapshot is still fresh. The session question is still resolved
    /// first; the catalog is never refreshed ahead of it.
    pub async fn refresh(&self) -> Result<ChallengeCatalog, InitError> {
        self.finish(self.run_sequence(true).await)
    }

    fn finish(
        &self,
        result: Result<ChallengeCatalog, InitError>,
    ) -> Result<ChallengeCatalog, InitError> {
        if result.is_err() {
            self.transition(AppStatus::Error);
        }
        // The sequence always ends on `completed`, even after a fault, so a
        // consumer waiting for "is it over" is never left hanging. The error
        // transition above still fires first.
        self.transition(AppStatus::Completed);
        result
    }

    async fn run_sequence(&self, force_sync: bool) -> Result<ChallengeCatalog, InitError> {
        self.transition(AppStatus::ValidatingSession);
        let session_valid = cache::is_valid(&self.paths.session_file())?;

        if !session_valid {
            let probe = self.authenticator.verify().await?;
            tracing::debug!(
                valid = probe.valid,
                has_link = probe.login_link.is_some(),
                "session probe"
            );

            if let Some(link) = probe.login_link {
                self.transition(AppStatus::AwaitingPermission);
                self.gate.wait().await;

                self.transition(AppStatus::LoggingIn);
                if !self.authenticator.login(&link).await? {
                    return Err(InitError::LoginFailed);
                }
            }
            // No login entry point on the page: proceed unauthenticated, as
            // the legacy flow did.
        }

        self.transition(AppStatus::VerifyingData);
        self.catalog(force_sync).await
    }

    /// Cache-aware catalog access: serve the persisted snapshot while it is
    /// fresh, re-synchronize otherwise (or unconditionally with `force_sync`).
    pub async fn catalog(&self, force_sync: bool) -> Result<ChallengeCatalog, InitError> {
        let path = self.paths.catalog_file();
        if !force_sync && cache::is_valid(&path)? {
            return Ok(cache::load_catalog(&path)?);
        }

        self.transition(AppStatus::ScrapingData);
        let synchronizer = Synchronizer::new(self.paths.clone(), Arc::clone(&self.source));
        Ok(synchronizer.sync().await?)
    }
}
