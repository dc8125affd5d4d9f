// Trait abstractions for the pipeline's three external seams.
//
// PlatformAdapter — discovery/profile/activity against one upstream source.
// RecordSink — append-only writes to the durable store.
// ProcessedIndex — read path into the store's username column for dedup.
//
// These enable deterministic testing with MockAdapter and MockStore:
// no network, no spreadsheet. `cargo test` in seconds.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;

use sourcer_common::{AuditRecord, Identity, Platform, PostStats, ProfileSnapshot, QualifyingRecord};
use sourcer_sheets::SheetStore;

// ---------------------------------------------------------------------------
// PlatformAdapter
// ---------------------------------------------------------------------------

/// What one hashtag batch turned up.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Deduplicated account usernames across every hashtag in the batch.
    pub usernames: HashSet<String>,
    /// Side-channel: post stats bundled with discovery, keyed by username.
    /// Populated when the upstream hashtag source returns full post items
    /// (TikTok); left empty when it returns bare owners (Instagram), in which
    /// case the orchestrator calls `fetch_recent_activity` instead.
    pub posts_by_user: HashMap<String, Vec<PostStats>>,
}

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Query the upstream source once per hashtag and accumulate a
    /// deduplicated username set. A failing hashtag is logged and skipped;
    /// it never aborts the batch.
    async fn discover(&self, hashtags: &[String], limit: u32) -> Result<Discovery>;

    /// Fetch current profile state. `Ok(None)` means the source has no
    /// record for the account — a skip, not a fault.
    async fn fetch_profile(&self, username: &str) -> Result<Option<ProfileSnapshot>>;

    /// Fetch recent post stats, recency descending. Only called when
    /// `discover` did not populate the side-channel for this account.
    async fn fetch_recent_activity(&self, username: &str, limit: u32) -> Result<Vec<PostStats>>;
}

// ---------------------------------------------------------------------------
// RecordSink / ProcessedIndex
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Append one qualifying account row. Append-only; never read back.
    async fn append_qualifying(&self, record: &QualifyingRecord) -> Result<()>;

    /// Append one per-invocation audit row, written before any scraping.
    async fn append_audit(&self, record: &AuditRecord) -> Result<()>;
}

#[async_trait]
pub trait ProcessedIndex: Send + Sync {
    /// Whether this identity already has a durable row. A true result skips
    /// all enrichment work for the identity. Concurrent runs can race past
    /// each other here; a duplicate row is degraded, not corrupting.
    async fn already_processed(&self, identity: &Identity) -> Result<bool>;
}

#[async_trait]
impl RecordSink for SheetStore {
    async fn append_qualifying(&self, record: &QualifyingRecord) -> Result<()> {
        Ok(SheetStore::append_qualifying(self, record).await?)
    }

    async fn append_audit(&self, record: &AuditRecord) -> Result<()> {
        Ok(SheetStore::append_audit(self, record).await?)
    }
}

#[async_trait]
impl ProcessedIndex for SheetStore {
    async fn already_processed(&self, identity: &Identity) -> Result<bool> {
        Ok(self.is_known_username(&identity.username).await?)
    }
}
