use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Social platform a pipeline run targets. Adding a platform means adding a
/// variant here plus an adapter; the orchestrator never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    TikTok,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
        }
    }

    /// Public profile URL for an account on this platform.
    pub fn profile_link(&self, username: &str) -> String {
        match self {
            Platform::Instagram => format!("https://www.instagram.com/{username}"),
            Platform::TikTok => format!("https://www.tiktok.com/@{username}"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Uniqueness key for all dedup and storage. An account is always scoped to
/// one platform; there is no cross-platform identity resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub platform: Platform,
    pub username: String,
}

impl Identity {
    pub fn new(platform: Platform, username: impl Into<String>) -> Self {
        Self {
            platform,
            username: username.into(),
        }
    }

    pub fn profile_link(&self) -> String {
        self.platform.profile_link(&self.username)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform, self.username)
    }
}

/// Profile state as observed once per run. Never merged across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub identity: Identity,
    pub profile_pic_url: String,
    pub posts_count: i64,
    pub followers_count: i64,
    pub biography: String,
}

/// Engagement counters for one recent post. `taken_at` is the platform's
/// epoch-seconds publish time, 0 when the upstream item omits it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PostStats {
    pub taken_at: i64,
    pub likes: i64,
    pub comments: i64,
}

/// Derived engagement metrics. Never persisted on its own; only as part of a
/// qualifying record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementResult {
    pub median_likes: i64,
    pub median_comments: i64,
    /// Percentage, full precision. Rendered to two decimals only at the
    /// persistence boundary.
    pub engagement_rate: f64,
}

/// One row of the Main worksheet: an identity that passed every threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifyingRecord {
    pub snapshot: ProfileSnapshot,
    pub profile_link: String,
    pub median_comments: i64,
    pub median_likes: i64,
    pub engagement_rate: f64,
}

impl QualifyingRecord {
    pub fn new(snapshot: ProfileSnapshot, result: EngagementResult) -> Self {
        let profile_link = snapshot.identity.profile_link();
        Self {
            snapshot,
            profile_link,
            median_comments: result.median_comments,
            median_likes: result.median_likes,
            engagement_rate: result.engagement_rate,
        }
    }
}

/// One row of the Hashtags worksheet: what one invocation was asked to do,
/// written before any scraping and regardless of outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub raw_input: String,
    pub normalized_hashtags: Vec<String>,
}

impl AuditRecord {
    pub fn new(raw_input: impl Into<String>, normalized_hashtags: Vec<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            raw_input: raw_input.into(),
            normalized_hashtags,
        }
    }
}

/// Qualification thresholds. An account must clear all three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// Audience floor: followers_count must exceed this.
    pub min_followers: i64,
    /// Track-record floor: posts_count must exceed this.
    pub min_posts: i64,
    /// Minimum engagement rate, in percent.
    pub min_engagement: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_followers: 1000,
            min_posts: 20,
            min_engagement: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_links_match_platform_conventions() {
        assert_eq!(
            Platform::Instagram.profile_link("teachergram"),
            "https://www.instagram.com/teachergram"
        );
        assert_eq!(
            Platform::TikTok.profile_link("mathstok"),
            "https://www.tiktok.com/@mathstok"
        );
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("Instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("TIKTOK".parse::<Platform>().unwrap(), Platform::TikTok);
        assert!("myspace".parse::<Platform>().is_err());
    }
}
