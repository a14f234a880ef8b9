//! HTTP-backed catalog source.
//!
//! Fetches the public challenges page and extracts the card fields with the
//! same queries the listing renders them under. This stands in for a full
//! browser-automation driver, which stays behind the [`CatalogSource`]
//! boundary.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::scrape::{CatalogSource, ScrapeError};
use crate::types::{Difficulty, Plan, ScrapedChallenge};

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

pub struct HttpCatalogSource {
    base_url: String,
    timeout: Duration,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_challenges(&self) -> Result<Vec<ScrapedChallenge>, ScrapeError> {
        let url = format!("{}/challenges", self.base_url);
        let base = self.base_url.clone();
        let request_timeout = self.timeout;

        let fetch = tokio::task::spawn_blocking(move || fetch_page(&url, request_timeout));
        let body = tokio::time::timeout(request_timeout + Duration::from_secs(5), fetch)
            .await
            .map_err(|_| ScrapeError::Timeout(request_timeout))?
            .map_err(|e| ScrapeError::Network(format!("fetch task failed: {e}")))??;

        parse_challenge_cards(&body, &base)
    }
}

fn fetch_page(url: &str, timeout: Duration) -> Result<String, ScrapeError> {
    let response = ureq::get(url).timeout(timeout).call().map_err(|e| match e {
        ureq::Error::Status(code, _) => {
            ScrapeError::Network(format!("challenges page returned HTTP {code}"))
        }
        ureq::Error::Transport(transport) => ScrapeError::Network(transport.to_string()),
    })?;
    response
        .into_string()
        .map_err(|e| ScrapeError::Network(e.to_string()))
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

fn text_of(el: ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel)
        .next()
        .map(|m| m.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        format!("{base_url}/{href}")
    }
}

/// Extract every challenge card from the listing page.
///
/// Cards whose plan or difficulty badge does not parse are skipped with a
/// warning; a page without the challenge list at all is a structural fault.
fn parse_challenge_cards(html: &str, base_url: &str) -> Result<Vec<ScrapedChallenge>, ScrapeError> {
    let document = Html::parse_document(html);

    let list_sel = selector("main ul");
    if document.select(&list_sel).next().is_none() {
        return Err(ScrapeError::MissingStructure(
            "challenge list not found under main".into(),
        ));
    }

    let card_sel = selector("li.isolate");
    let plan_sel = selector(r#"span[class*="tracking-wider"]"#);
    let difficulty_sel = selector(r#"div[class*="w-min"] span:last-child"#);
    let tag_sel = selector("ul li");
    let ribbon_sel = selector("span");
    let title_sel = selector("h2");
    let description_sel = selector("p");
    let link_sel = selector("a");

    let mut challenges = Vec::new();
    for card in document.select(&card_sel) {
        let title = text_of(card, &title_sel).unwrap_or_else(|| "Untitled".to_string());

        let plan_raw = text_of(card, &plan_sel).unwrap_or_else(|| "premium".to_string());
        let Some(plan) = Plan::parse(&plan_raw) else {
            tracing::warn!(%title, plan = %plan_raw, "unrecognized plan badge, skipping card");
            continue;
        };

        let Some(difficulty) = text_of(card, &difficulty_sel).and_then(|d| Difficulty::parse(&d))
        else {
            tracing::warn!(%title, "unrecognized difficulty badge, skipping card");
            continue;
        };

        let languages: Vec<String> = card
            .select(&tag_sel)
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let is_new = text_of(card, &ribbon_sel)
            .map(|s| s.to_lowercase().contains("new"))
            .unwrap_or(false);

        let description = text_of(card, &description_sel)
            .unwrap_or_else(|| "No description".to_string());

        let download_link = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| absolutize(base_url, href))
            .unwrap_or_default();

        challenges.push(ScrapedChallenge {
            plan,
            difficulty,
            languages,
            is_new,
            title,
            description,
            download_link,
        });
    }

    Ok(challenges)
}
