//! Contract for the external session authenticator.
//!
//! The real implementation drives a browser; the engine only depends on this
//! boundary and never on how a login is actually performed.

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::CacheError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session probe failed: {0}")]
    Probe(String),
    #[error("login flow failed: {0}")]
    Login(String),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Result of checking the remote source for an active session indicator.
#[derive(Clone, Debug)]
pub struct SessionProbe {
    /// Whether the remote source reported an active session.
    pub valid: bool,
    /// Login entry point discovered on the page, when one is visible.
    pub login_link: Option<String>,
}

#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Check the remote source for an active session indicator. Never
    /// mutates local state. May take open-ended wall-clock time.
    async fn verify(&self) -> AuthResult<SessionProbe>;

    /// Drive an interactive authentication flow against `link`.
    ///
    /// On success a [`crate::types::SessionRecord`] has been persisted to the
    /// session path before `Ok(true)` is returned. `Ok(false)` signals an
    /// unrecoverable login failure. Implementations must release any
    /// acquired external resource (such as a browser process) on every exit
    /// path, including errors.
    async fn login(&self, link: &str) -> AuthResult<bool>;
}
