// Test mocks for the sourcing pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockAdapter (PlatformAdapter) — HashMap-based hashtag→owners and
//   username→profile/activity, with per-unit failure injection
// - MockStore (RecordSink + ProcessedIndex) — in-memory rows plus a
//   known-username set
//
// Both record calls so tests can assert what was (and was not) fetched.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use sourcer_common::{
    AuditRecord, Identity, Platform, PostStats, ProfileSnapshot, QualifyingRecord,
};

use crate::traits::{Discovery, PlatformAdapter, ProcessedIndex, RecordSink};

// ---------------------------------------------------------------------------
// Builders for test fixtures
// ---------------------------------------------------------------------------

pub fn profile(
    platform: Platform,
    username: &str,
    followers_count: i64,
    posts_count: i64,
) -> ProfileSnapshot {
    ProfileSnapshot {
        identity: Identity::new(platform, username),
        profile_pic_url: format!("https://cdn.example/{username}.jpg"),
        posts_count,
        followers_count,
        biography: format!("bio of {username}"),
    }
}

pub fn sample(taken_at: i64, likes: i64, comments: i64) -> PostStats {
    PostStats {
        taken_at,
        likes,
        comments,
    }
}

// ---------------------------------------------------------------------------
// MockAdapter
// ---------------------------------------------------------------------------

/// Scripted platform adapter. Unregistered hashtags yield nothing;
/// registered failures behave like upstream faults.
pub struct MockAdapter {
    platform: Platform,
    hashtag_results: HashMap<String, Result<Vec<String>, String>>,
    side_channel: HashMap<String, Vec<PostStats>>,
    profiles: HashMap<String, ProfileSnapshot>,
    failing_profiles: HashSet<String>,
    activity: HashMap<String, Vec<PostStats>>,
    failing_activity: HashSet<String>,
    pub profile_calls: Mutex<Vec<String>>,
    pub activity_calls: Mutex<Vec<String>>,
}

impl MockAdapter {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            hashtag_results: HashMap::new(),
            side_channel: HashMap::new(),
            profiles: HashMap::new(),
            failing_profiles: HashSet::new(),
            activity: HashMap::new(),
            failing_activity: HashSet::new(),
            profile_calls: Mutex::new(Vec::new()),
            activity_calls: Mutex::new(Vec::new()),
        }
    }

    /// Discovery under `hashtag` returns these account owners.
    pub fn on_hashtag(mut self, hashtag: &str, owners: &[&str]) -> Self {
        self.hashtag_results.insert(
            hashtag.to_string(),
            Ok(owners.iter().map(|o| o.to_string()).collect()),
        );
        self
    }

    /// Discovery under `hashtag` fails with an upstream fault.
    pub fn on_failing_hashtag(mut self, hashtag: &str, error: &str) -> Self {
        self.hashtag_results
            .insert(hashtag.to_string(), Err(error.to_string()));
        self
    }

    /// Discovery bundles these posts for `username` (TikTok-shaped source).
    pub fn with_side_channel(mut self, username: &str, posts: Vec<PostStats>) -> Self {
        self.side_channel.insert(username.to_string(), posts);
        self
    }

    pub fn with_profile(mut self, profile: ProfileSnapshot) -> Self {
        self.profiles
            .insert(profile.identity.username.clone(), profile);
        self
    }

    /// Profile fetch for `username` fails with an upstream fault.
    pub fn with_failing_profile(mut self, username: &str) -> Self {
        self.failing_profiles.insert(username.to_string());
        self
    }

    pub fn with_activity(mut self, username: &str, posts: Vec<PostStats>) -> Self {
        self.activity.insert(username.to_string(), posts);
        self
    }

    /// Activity fetch for `username` fails with an upstream fault.
    pub fn with_failing_activity(mut self, username: &str) -> Self {
        self.failing_activity.insert(username.to_string());
        self
    }

    pub fn profile_calls(&self) -> Vec<String> {
        self.profile_calls.lock().unwrap().clone()
    }

    pub fn activity_calls(&self) -> Vec<String> {
        self.activity_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformAdapter for MockAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn discover(&self, hashtags: &[String], _limit: u32) -> Result<Discovery> {
        let mut discovery = Discovery::default();
        for hashtag in hashtags {
            match self.hashtag_results.get(hashtag) {
                Some(Ok(owners)) => {
                    for owner in owners {
                        discovery.usernames.insert(owner.clone());
                        if let Some(posts) = self.side_channel.get(owner) {
                            discovery
                                .posts_by_user
                                .insert(owner.clone(), posts.clone());
                        }
                    }
                }
                Some(Err(error)) => {
                    tracing::warn!(hashtag, error, "Mock hashtag scrape failed, skipping");
                }
                None => {}
            }
        }
        Ok(discovery)
    }

    async fn fetch_profile(&self, username: &str) -> Result<Option<ProfileSnapshot>> {
        self.profile_calls.lock().unwrap().push(username.to_string());
        if self.failing_profiles.contains(username) {
            bail!("simulated profile fault for {username}");
        }
        Ok(self.profiles.get(username).cloned())
    }

    async fn fetch_recent_activity(&self, username: &str, _limit: u32) -> Result<Vec<PostStats>> {
        self.activity_calls.lock().unwrap().push(username.to_string());
        if self.failing_activity.contains(username) {
            bail!("simulated activity fault for {username}");
        }
        Ok(self.activity.get(username).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// In-memory store. Appends accumulate; the known-username set backs the
/// dedup check, mirroring the Main worksheet's username column.
#[derive(Default)]
pub struct MockStore {
    known: HashSet<String>,
    pub qualifying: Mutex<Vec<QualifyingRecord>>,
    pub audits: Mutex<Vec<AuditRecord>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a username as already present in the store.
    pub fn with_known(mut self, username: &str) -> Self {
        self.known.insert(username.to_string());
        self
    }

    pub fn qualifying(&self) -> Vec<QualifyingRecord> {
        self.qualifying.lock().unwrap().clone()
    }

    pub fn audits(&self) -> Vec<AuditRecord> {
        self.audits.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for MockStore {
    async fn append_qualifying(&self, record: &QualifyingRecord) -> Result<()> {
        self.qualifying.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn append_audit(&self, record: &AuditRecord) -> Result<()> {
        self.audits.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl ProcessedIndex for MockStore {
    async fn already_processed(&self, identity: &Identity) -> Result<bool> {
        Ok(self.known.contains(&identity.username))
    }
}
