//! Interactive authenticator backed by the user's own browser.
//!
//! `verify` probes the landing page for a login anchor the same way the
//! listing renders it. `login` opens the discovered Chromium-family browser
//! on the login link with a dedicated profile directory, then captures the
//! session cookie from the user and persists it as the session record.

use std::process::{Command, Stdio};
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use regex::Regex;

use crate::auth::{AuthError, AuthResult, SessionAuthenticator, SessionProbe};
use crate::browser::find_chromium_browser;
use crate::cache;
use crate::paths::DataPaths;
use crate::types::SessionRecord;

const SESSION_COOKIE_NAME: &str = "__Secure-next-auth.session-token";
const SESSION_TTL_DAYS: i64 = 30;

pub struct BrowserAuthenticator {
    base_url: String,
    paths: DataPaths,
}

impl BrowserAuthenticator {
    pub fn new(base_url: impl Into<String>, paths: DataPaths) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            paths,
        }
    }
}

#[async_trait]
impl SessionAuthenticator for BrowserAuthenticator {
    async fn verify(&self) -> AuthResult<SessionProbe> {
        let url = self.base_url.clone();
        let has_catalog = self.paths.catalog_file().exists();

        let login_link = tokio::task::spawn_blocking(move || -> AuthResult<Option<String>> {
            let body = ureq::get(&url)
                .call()
                .map_err(|e| AuthError::Probe(e.to_string()))?
                .into_string()
                .map_err(|e| AuthError::Probe(e.to_string()))?;
            Ok(find_login_anchor(&body, &url))
        })
        .await
        .map_err(|e| AuthError::Probe(format!("probe task failed: {e}")))??;

        // Legacy heuristic: no login anchor plus local data already present
        // is treated as a live session.
        Ok(SessionProbe {
            valid: login_link.is_none() && has_catalog,
            login_link,
        })
    }

    async fn login(&self, link: &str) -> AuthResult<bool> {
        let Some(browser) = find_chromium_browser() else {
            return Err(AuthError::Login(
                "no Chromium-family browser was found on this machine".into(),
            ));
        };

        let profile = self.paths.browser_profile_dir();
        std::fs::create_dir_all(&profile)
            .map_err(|e| AuthError::Login(format!("cannot create browser profile dir: {e}")))?;

        let mut child = Command::new(&browser)
            .arg(format!("--user-data-dir={}", profile.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg(link)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AuthError::Login(format!("failed to launch {}: {e}", browser.display())))?;

        let prompt = tokio::task::spawn_blocking(|| {
            dialoguer::Input::<String>::new()
                .with_prompt("Finish logging in, then paste the session cookie value (empty aborts)")
                .allow_empty(true)
                .interact_text()
        })
        .await;

        // The browser is released on every exit path, including prompt errors.
        let _ = child.kill();
        let _ = child.wait();

        let value = prompt
            .map_err(|e| AuthError::Login(format!("prompt task failed: {e}")))?
            .map_err(|e| AuthError::Login(format!("prompt failed: {e}")))?;

        let value = value.trim().to_string();
        if value.is_empty() {
            return Ok(false);
        }

        let record = SessionRecord {
            name: SESSION_COOKIE_NAME.to_string(),
            value,
            expires_in: (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        };
        cache::save_json(&self.paths.session_file(), &record)?;
        Ok(true)
    }
}

static LOGIN_RE: OnceLock<Regex> = OnceLock::new();

fn find_login_anchor(html: &str, base_url: &str) -> Option<String> {
    let re = LOGIN_RE.get_or_init(|| {
        Regex::new(r#"(?is)<a[^>]+href="([^"]+)"[^>]*>[^<]*log\s?in"#).expect("login regex")
    });
    re.captures(html).map(|caps| {
        let href = &caps[1];
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{base_url}{href}")
        } else {
            format!("{base_url}/{href}")
        }
    })
}
