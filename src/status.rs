//! Initialization status reporting and the permission gate.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tokio::sync::mpsc;

/// States of the initialization sequence, in the order they are normally
/// traversed. `error` is reachable from any non-terminal state; the sequence
/// always ends on `completed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppStatus {
    Idle,
    ValidatingSession,
    AwaitingPermission,
    LoggingIn,
    VerifyingData,
    ScrapingData,
    Completed,
    Error,
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AppStatus::Idle => "idle",
            AppStatus::ValidatingSession => "validating_session",
            AppStatus::AwaitingPermission => "awaiting_permission",
            AppStatus::LoggingIn => "logging_in",
            AppStatus::VerifyingData => "verifying_data",
            AppStatus::ScrapingData => "scraping_data",
            AppStatus::Completed => "completed",
            AppStatus::Error => "error",
        })
    }
}

/// Observation-only consumer of state transitions.
///
/// Sinks take `&self` and return nothing, so an observer has no channel back
/// into the sequence it is watching.
pub trait StatusSink: Send + Sync {
    fn on_transition(&self, status: AppStatus);
}

/// Logs each transition. Installed by default.
pub struct LogSink;

impl StatusSink for LogSink {
    fn on_transition(&self, status: AppStatus) {
        tracing::debug!(status = %status, "status transition");
    }
}

/// In-memory sink for tests and snapshots.
#[derive(Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<AppStatus>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<AppStatus> {
        self.entries.lock().unwrap().clone()
    }
}

impl StatusSink for MemorySink {
    fn on_transition(&self, status: AppStatus) {
        self.entries.lock().unwrap().push(status);
    }
}

/// Forwards transitions to an async consumer. A dropped receiver is ignored:
/// the sequence outlives any particular observer.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<AppStatus>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<AppStatus>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelSink {
    fn on_transition(&self, status: AppStatus) {
        let _ = self.tx.send(status);
    }
}

/// Single-notification wait point for the login permission.
///
/// The sequence suspends in `wait` until some other task calls `grant`; there
/// is no polling interval and no engine-side timeout. Granting before the
/// sequence reaches the wait is fine: the flag is latched.
#[derive(Default)]
pub struct PermissionGate {
    granted: AtomicBool,
    notify: Notify,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self) {
        self.granted.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_granted(&self) -> bool {
        self.granted.load(Ordering::Acquire)
    }

    pub async fn wait(&self) {
        loop {
            // Register interest before checking the flag so a grant landing
            // between the check and the await is not lost.
            let notified = self.notify.notified();
            if self.granted.load(Ordering::Acquire) {
                return;
            }
            notified.await;
        }
    }
}
