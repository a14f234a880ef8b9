//! Production implementations of the collaborator contracts.

pub mod browser_auth;
pub mod http_source;

pub use browser_auth::BrowserAuthenticator;
pub use http_source::HttpCatalogSource;
