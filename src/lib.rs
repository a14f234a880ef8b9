//! Offline-first challenge catalog engine: session lifecycle, cache
//! validity, catalog synchronization with user-state-preserving merges, and
//! point updates of individual records.
//!
//! The engine never talks to a browser or a terminal itself; it depends on
//! the [`auth::SessionAuthenticator`] and [`scrape::CatalogSource`]
//! boundaries and reports progress through observation-only
//! [`status::StatusSink`]s. Production adapters live in [`adapters`].

pub mod adapters;
pub mod auth;
pub mod browser;
pub mod cache;
pub mod cli;
pub mod config;
pub mod controller;
pub mod patch;
pub mod paths;
pub mod scrape;
pub mod status;
pub mod sync;
pub mod types;

pub use controller::{InitError, Initializer};
pub use paths::DataPaths;
pub use status::{AppStatus, PermissionGate, StatusSink};
pub use types::{Challenge, ChallengeCatalog, ChallengeStatus, Difficulty, Plan, SessionRecord};
