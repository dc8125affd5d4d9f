//! Pipeline orchestrator — hashtags in, durable qualifying rows out.
//!
//! One run: validate input, write the audit row, discover accounts across
//! all hashtags, drop already-stored identities, then enrich and score the
//! rest under a bounded fan-out. Per-hashtag and per-identity upstream
//! failures are logged and skipped; only store unavailability and invalid
//! input abort the run.

use std::fmt;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use sourcer_common::{
    AuditRecord, Identity, PostStats, ProfileSnapshot, QualifyingRecord, SourcerError, Thresholds,
};

use crate::evaluator::{self, Verdict};
use crate::traits::{Discovery, PlatformAdapter, ProcessedIndex, RecordSink};

pub struct Pipeline<'a, A, S> {
    adapter: &'a A,
    store: &'a S,
    thresholds: Thresholds,
    concurrency: usize,
}

/// Per-run counters, printed as the completion summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub hashtags: u32,
    pub discovered: u32,
    pub skipped_known: u32,
    pub profiles_missing: u32,
    pub enrich_failed: u32,
    pub below_floor: u32,
    pub low_engagement: u32,
    pub stored: u32,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Sourcing Run Complete ===")?;
        writeln!(f, "Hashtags used:       {}", self.hashtags)?;
        writeln!(f, "Accounts discovered: {}", self.discovered)?;
        writeln!(f, "Already stored:      {}", self.skipped_known)?;
        writeln!(f, "Profiles missing:    {}", self.profiles_missing)?;
        writeln!(f, "Enrichment failures: {}", self.enrich_failed)?;
        writeln!(f, "Below floor:         {}", self.below_floor)?;
        writeln!(f, "Low engagement:      {}", self.low_engagement)?;
        writeln!(f, "Stored:              {}", self.stored)
    }
}

/// Outcome of the concurrent enrichment stage for one account.
enum Enriched {
    /// Upstream has no profile record — a skip, not a fault.
    ProfileMissing,
    /// Profile or activity fetch failed.
    Failed(String),
    /// Failed the followers/posts floor; activity was never fetched.
    BelowFloor,
    /// Cleared the floor and was scored.
    Scored(ProfileSnapshot, Verdict),
}

impl<'a, A, S> Pipeline<'a, A, S>
where
    A: PlatformAdapter,
    S: RecordSink + ProcessedIndex,
{
    pub fn new(adapter: &'a A, store: &'a S, thresholds: Thresholds, concurrency: usize) -> Self {
        Self {
            adapter,
            store,
            thresholds,
            concurrency: concurrency.max(1),
        }
    }

    /// Run the pipeline end to end. `raw_hashtags` is the operator's
    /// comma-separated input, recorded verbatim in the audit row.
    pub async fn run(&self, raw_hashtags: &str, limit: u32) -> Result<RunStats, SourcerError> {
        if raw_hashtags.trim().is_empty() {
            return Err(SourcerError::Validation(
                "Please enter at least one hashtag.".to_string(),
            ));
        }
        let hashtags = parse_hashtags(raw_hashtags);
        if hashtags.is_empty() {
            return Err(SourcerError::Validation(
                "No valid hashtags entered.".to_string(),
            ));
        }

        let platform = self.adapter.platform();
        info!(%platform, hashtags = hashtags.len(), limit, "Pipeline run starting");

        // Audit row first: it must be durable before any qualifying row,
        // and it is written regardless of how the run goes from here.
        let audit = AuditRecord::new(raw_hashtags, hashtags.clone());
        self.store
            .append_audit(&audit)
            .await
            .map_err(|e| SourcerError::Store(e.to_string()))?;

        let discovery = match self.adapter.discover(&hashtags, limit).await {
            Ok(discovery) => discovery,
            Err(e) => {
                warn!(error = %e, "Discovery failed outright, completing with no accounts");
                Discovery::default()
            }
        };

        let mut stats = RunStats {
            hashtags: hashtags.len() as u32,
            discovered: discovery.usernames.len() as u32,
            ..RunStats::default()
        };

        // Dedup gate: resolved against the store before any enrichment spend.
        let mut usernames: Vec<String> = discovery.usernames.iter().cloned().collect();
        usernames.sort();
        let mut pending = Vec::new();
        for username in usernames {
            let identity = Identity::new(platform, username.clone());
            let known = self
                .store
                .already_processed(&identity)
                .await
                .map_err(|e| SourcerError::Store(e.to_string()))?;
            if known {
                info!(%identity, "Skipping, already stored");
                stats.skipped_known += 1;
            } else {
                pending.push(username);
            }
        }

        let side_channel = &discovery.posts_by_user;
        let mut outcomes = stream::iter(pending)
            .map(|username| async move {
                let samples = side_channel.get(&username).map(Vec::as_slice);
                let outcome = self.enrich_and_score(&username, samples, limit).await;
                (username, outcome)
            })
            .buffer_unordered(self.concurrency);

        // Single-writer loop: every sink append happens here, sequentially.
        while let Some((username, outcome)) = outcomes.next().await {
            match outcome {
                Enriched::ProfileMissing => {
                    info!(username, "No profile data, skipping");
                    stats.profiles_missing += 1;
                }
                Enriched::Failed(reason) => {
                    warn!(username, reason, "Enrichment failed, skipping");
                    stats.enrich_failed += 1;
                }
                Enriched::BelowFloor => {
                    info!(username, "Skipping, below audience floor");
                    stats.below_floor += 1;
                }
                Enriched::Scored(snapshot, verdict) => {
                    if verdict.qualifies {
                        let record = QualifyingRecord::new(snapshot, verdict.result);
                        self.store
                            .append_qualifying(&record)
                            .await
                            .map_err(|e| SourcerError::Store(e.to_string()))?;
                        stats.stored += 1;
                    } else {
                        info!(
                            username,
                            engagement_rate = verdict.result.engagement_rate,
                            "Skipping due to low engagement rate"
                        );
                        stats.low_engagement += 1;
                    }
                }
            }
        }

        info!(stored = stats.stored, "Pipeline run complete");
        Ok(stats)
    }

    async fn enrich_and_score(
        &self,
        username: &str,
        side_channel: Option<&[PostStats]>,
        limit: u32,
    ) -> Enriched {
        let profile = match self.adapter.fetch_profile(username).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return Enriched::ProfileMissing,
            Err(e) => return Enriched::Failed(e.to_string()),
        };

        // Audience floor before the activity fetch — no second actor run
        // for clearly unqualified accounts.
        if !evaluator::passes_floor(&profile, &self.thresholds) {
            return Enriched::BelowFloor;
        }

        let samples = match side_channel {
            Some(posts) => posts.to_vec(),
            None => match self.adapter.fetch_recent_activity(username, limit).await {
                Ok(posts) => posts,
                Err(e) => return Enriched::Failed(e.to_string()),
            },
        };

        let verdict = evaluator::score(&profile, &samples, &self.thresholds);
        Enriched::Scored(profile, verdict)
    }
}

/// Split the operator's comma-separated input: trim whitespace, drop empty
/// segments, keep everything else verbatim (including a leading `#`).
pub fn parse_hashtags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_drops_empty_segments() {
        assert_eq!(
            parse_hashtags(" #IBExams , , #IBDiploma ,"),
            vec!["#IBExams", "#IBDiploma"]
        );
    }

    #[test]
    fn parse_preserves_tags_verbatim() {
        assert_eq!(parse_hashtags("maths,#Maths"), vec!["maths", "#Maths"]);
    }

    #[test]
    fn parse_of_separators_only_is_empty() {
        assert!(parse_hashtags(", ,,").is_empty());
    }
}
