use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pricing tier of a challenge, as rendered on its card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    #[serde(rename = "free+")]
    FreePlus,
    Premium,
}

impl Plan {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "free" => Some(Plan::Free),
            "free+" => Some(Plan::FreePlus),
            "premium" => Some(Plan::Premium),
            _ => None,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Plan::Free => "free",
            Plan::FreePlus => "free+",
            Plan::Premium => "premium",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Newbie,
    Junior,
    Intermediate,
    Advanced,
    Guru,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "newbie" => Some(Difficulty::Newbie),
            "junior" => Some(Difficulty::Junior),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            "guru" => Some(Difficulty::Guru),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Newbie => "newbie",
            Difficulty::Junior => "junior",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Guru => "guru",
        })
    }
}

/// User-local progress state. This is the one field the synchronizer never
/// overwrites from a fresh scrape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Pending,
    Started,
    Completed,
    NewStart,
}

#[derive(Debug, Error)]
#[error("unknown challenge status: {0}")]
pub struct UnknownStatus(String);

impl FromStr for ChallengeStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Ok(ChallengeStatus::Pending),
            "started" => Ok(ChallengeStatus::Started),
            "completed" => Ok(ChallengeStatus::Completed),
            "new_start" => Ok(ChallengeStatus::NewStart),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChallengeStatus::Pending => "pending",
            ChallengeStatus::Started => "started",
            ChallengeStatus::Completed => "completed",
            ChallengeStatus::NewStart => "new_start",
        })
    }
}

/// One catalog record as persisted in the snapshot file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: u64,
    pub plan: Plan,
    pub difficulty: Difficulty,
    pub languages: Vec<String>,
    pub status: ChallengeStatus,
    #[serde(rename = "isNew")]
    pub is_new: bool,
    pub title: String,
    pub description: String,
    #[serde(rename = "downloadLink")]
    pub download_link: String,
    pub updated_at: DateTime<Utc>,
}

impl Challenge {
    /// Challenge slug embedded in the download link, when present.
    pub fn slug(&self) -> Option<&str> {
        slug_of(&self.download_link)
    }
}

/// Source-of-truth fields of one challenge as returned by the scrape
/// collaborator. Progress state and timestamps are attached during the merge.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrapedChallenge {
    pub plan: Plan,
    pub difficulty: Difficulty,
    pub languages: Vec<String>,
    pub is_new: bool,
    pub title: String,
    pub description: String,
    pub download_link: String,
}

impl ScrapedChallenge {
    /// Content-derived identity used as the merge key.
    ///
    /// The remote listing carries no explicit record id and its ordering is
    /// not stable across scrapes, so identity is taken from the challenge
    /// slug embedded in the download link (falling back to the title),
    /// reduced to a deterministic 64-bit digest to keep the persisted shape
    /// compact.
    pub fn stable_id(&self) -> u64 {
        let key = slug_of(&self.download_link).unwrap_or(self.title.as_str());
        let mut hasher = FxHasher::default();
        hasher.write(key.as_bytes());
        hasher.finish()
    }

    pub fn into_challenge(self, status: ChallengeStatus, updated_at: DateTime<Utc>) -> Challenge {
        let id = self.stable_id();
        Challenge {
            id,
            plan: self.plan,
            difficulty: self.difficulty,
            languages: self.languages,
            status,
            is_new: self.is_new,
            title: self.title,
            description: self.description,
            download_link: self.download_link,
            updated_at,
        }
    }
}

/// Full persisted catalog state at a point in time. Replaced wholesale on
/// every synchronization; the record-level merge preserves user state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChallengeCatalog {
    pub expires_in: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub challenges: Vec<Challenge>,
}

/// Session credential extracted during login. Replaced wholesale on the next
/// login, never merged. `expires_in` is epoch seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub name: String,
    pub value: String,
    pub expires_in: i64,
}

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_of(link: &str) -> Option<&str> {
    let re =
        SLUG_RE.get_or_init(|| Regex::new(r"/challenges/([A-Za-z0-9_-]+)").expect("slug regex"));
    re.captures(link).and_then(|c| c.get(1)).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraped(title: &str, link: &str) -> ScrapedChallenge {
        ScrapedChallenge {
            plan: Plan::Free,
            difficulty: Difficulty::Newbie,
            languages: vec!["HTML".into()],
            is_new: false,
            title: title.into(),
            description: "desc".into(),
            download_link: link.into(),
        }
    }

    #[test]
    fn stable_id_follows_slug_not_order_or_title() {
        let a = scraped("QR code", "https://example.com/challenges/qr-code-component");
        let renamed = scraped(
            "QR code component (updated)",
            "https://example.com/challenges/qr-code-component",
        );
        assert_eq!(a.stable_id(), renamed.stable_id());

        let b = scraped("QR code", "https://example.com/challenges/other-challenge");
        assert_ne!(a.stable_id(), b.stable_id());
    }

    #[test]
    fn stable_id_falls_back_to_title_without_slug() {
        let a = scraped("Some title", "");
        let b = scraped("Some title", "");
        let c = scraped("Other title", "");
        assert_eq!(a.stable_id(), b.stable_id());
        assert_ne!(a.stable_id(), c.stable_id());
    }

    #[test]
    fn status_round_trips_through_from_str() {
        for status in [
            ChallengeStatus::Pending,
            ChallengeStatus::Started,
            ChallengeStatus::Completed,
            ChallengeStatus::NewStart,
        ] {
            assert_eq!(status.to_string().parse::<ChallengeStatus>().unwrap(), status);
        }
        assert!("finished".parse::<ChallengeStatus>().is_err());
    }

    #[test]
    fn wire_names_match_the_persisted_format() {
        let json = serde_json::to_value(Challenge {
            id: 7,
            plan: Plan::FreePlus,
            difficulty: Difficulty::Guru,
            languages: vec!["HTML".into(), "CSS".into()],
            status: ChallengeStatus::NewStart,
            is_new: true,
            title: "t".into(),
            description: "d".into(),
            download_link: "l".into(),
            updated_at: Utc::now(),
        })
        .unwrap();

        assert_eq!(json["plan"], "free+");
        assert_eq!(json["difficulty"], "guru");
        assert_eq!(json["status"], "new_start");
        assert!(json["isNew"].as_bool().unwrap());
        assert!(json.get("downloadLink").is_some());
        assert!(json.get("updated_at").is_some());
    }
}
