//! Engagement evaluation — pure functions, no I/O.
//!
//! Three short-circuiting stages: audience floor, median activity scoring,
//! engagement threshold. The floor is checked by the orchestrator before any
//! activity fetch so clearly unqualified accounts never cost an upstream call.

use std::fmt;

use sourcer_common::{EngagementResult, PostStats, ProfileSnapshot, Thresholds};

/// How many recent posts feed the medians. Medians over a small recent
/// window resist viral outliers better than means.
const RECENT_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Failed the followers/posts floor; activity was never fetched.
    BelowAudienceFloor,
    /// Engagement rate below the configured minimum.
    LowEngagement,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::BelowAudienceFloor => f.write_str("below audience floor"),
            RejectionReason::LowEngagement => f.write_str("low engagement"),
        }
    }
}

/// Outcome of scoring one account.
#[derive(Debug, Clone, Copy)]
pub struct Verdict {
    pub qualifies: bool,
    pub result: EngagementResult,
    pub rejection: Option<RejectionReason>,
}

/// Audience floor: both counts must strictly exceed their thresholds.
pub fn passes_floor(profile: &ProfileSnapshot, thresholds: &Thresholds) -> bool {
    profile.followers_count > thresholds.min_followers
        && profile.posts_count > thresholds.min_posts
}

/// Score an account that already cleared the floor. Takes whatever samples
/// exist (possibly none), keeps the 5 most recent, and compares the median
/// engagement rate against the threshold at full precision.
pub fn score(
    profile: &ProfileSnapshot,
    samples: &[PostStats],
    thresholds: &Thresholds,
) -> Verdict {
    let (median_likes, median_comments) = recent_medians(samples);
    let engagement_rate =
        engagement_rate(median_likes, median_comments, profile.followers_count);
    let result = EngagementResult {
        median_likes,
        median_comments,
        engagement_rate,
    };

    if engagement_rate < thresholds.min_engagement {
        Verdict {
            qualifies: false,
            result,
            rejection: Some(RejectionReason::LowEngagement),
        }
    } else {
        Verdict {
            qualifies: true,
            result,
            rejection: None,
        }
    }
}

/// Median likes and comments over the most recent posts. Input order does
/// not matter: samples are re-sorted by recency before the window is cut.
/// No samples means both medians are 0.
pub fn recent_medians(samples: &[PostStats]) -> (i64, i64) {
    if samples.is_empty() {
        return (0, 0);
    }

    let mut recent: Vec<PostStats> = samples.to_vec();
    recent.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
    recent.truncate(RECENT_WINDOW);

    let likes: Vec<i64> = recent.iter().map(|p| p.likes).collect();
    let comments: Vec<i64> = recent.iter().map(|p| p.comments).collect();
    (median(&likes), median(&comments))
}

/// (median_likes + median_comments) / followers as a percentage.
/// Zero followers yields 0.0, never a division fault.
pub fn engagement_rate(median_likes: i64, median_comments: i64, followers_count: i64) -> f64 {
    if followers_count <= 0 {
        return 0.0;
    }
    ((median_likes + median_comments) as f64 / followers_count as f64) * 100.0
}

/// Integer median: middle element for odd counts, midpoint of the middle
/// pair truncated toward zero for even counts.
fn median(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        ((sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourcer_common::{Identity, Platform};

    fn profile(followers: i64, posts: i64) -> ProfileSnapshot {
        ProfileSnapshot {
            identity: Identity::new(Platform::Instagram, "teachergram"),
            profile_pic_url: String::new(),
            posts_count: posts,
            followers_count: followers,
            biography: String::new(),
        }
    }

    fn sample(taken_at: i64, likes: i64, comments: i64) -> PostStats {
        PostStats {
            taken_at,
            likes,
            comments,
        }
    }

    #[test]
    fn floor_requires_strictly_greater_counts() {
        let thresholds = Thresholds::default();
        assert!(passes_floor(&profile(1001, 21), &thresholds));
        assert!(!passes_floor(&profile(1000, 21), &thresholds));
        assert!(!passes_floor(&profile(1001, 20), &thresholds));
        assert!(!passes_floor(&profile(0, 100), &thresholds));
    }

    #[test]
    fn no_samples_scores_zero_and_rejects() {
        let verdict = score(&profile(5000, 50), &[], &Thresholds::default());
        assert!(!verdict.qualifies);
        assert_eq!(verdict.rejection, Some(RejectionReason::LowEngagement));
        assert_eq!(verdict.result.median_likes, 0);
        assert_eq!(verdict.result.median_comments, 0);
        assert_eq!(verdict.result.engagement_rate, 0.0);
    }

    #[test]
    fn medians_are_input_order_invariant() {
        let samples = vec![
            sample(5, 100, 10),
            sample(4, 90, 9),
            sample(3, 80, 8),
            sample(2, 70, 7),
            sample(1, 60, 6),
        ];
        let mut shuffled = samples.clone();
        shuffled.reverse();
        shuffled.swap(0, 2);

        assert_eq!(recent_medians(&samples), recent_medians(&shuffled));
        assert_eq!(recent_medians(&samples), (80, 8));
    }

    #[test]
    fn only_the_five_most_recent_samples_count() {
        // Two old viral posts must not move the medians.
        let samples = vec![
            sample(10, 10, 1),
            sample(9, 20, 2),
            sample(8, 30, 3),
            sample(7, 40, 4),
            sample(6, 50, 5),
            sample(1, 900_000, 90_000),
            sample(2, 800_000, 80_000),
        ];
        assert_eq!(recent_medians(&samples), (30, 3));
    }

    #[test]
    fn even_count_median_truncates_toward_zero() {
        // numpy-style: median of [3, 4] is 3.5, stored as 3.
        let samples = vec![sample(2, 3, 4), sample(1, 4, 3)];
        assert_eq!(recent_medians(&samples), (3, 3));
    }

    #[test]
    fn fewer_than_five_samples_still_score() {
        let samples = vec![sample(3, 12, 2), sample(2, 10, 4), sample(1, 8, 6)];
        assert_eq!(recent_medians(&samples), (10, 4));
    }

    #[test]
    fn engagement_rate_worked_example_qualifies() {
        // followers=2000, medians 10+5 → 0.75%, above the 0.25% default.
        let rate = engagement_rate(10, 5, 2000);
        assert!((rate - 0.75).abs() < 1e-9);

        let samples = vec![sample(1, 10, 5)];
        let verdict = score(&profile(2000, 30), &samples, &Thresholds::default());
        assert!(verdict.qualifies);
        assert!(verdict.rejection.is_none());
    }

    #[test]
    fn full_scenario_medians_and_rate() {
        // likes [100,90,80,70,60], comments [10,9,8,7,6] at 5000 followers:
        // medians 80/8, rate (88/5000)*100 = 1.76%.
        let samples = vec![
            sample(5, 100, 10),
            sample(4, 90, 9),
            sample(3, 80, 8),
            sample(2, 70, 7),
            sample(1, 60, 6),
        ];
        let verdict = score(&profile(5000, 50), &samples, &Thresholds::default());
        assert!(verdict.qualifies);
        assert_eq!(verdict.result.median_likes, 80);
        assert_eq!(verdict.result.median_comments, 8);
        assert!((verdict.result.engagement_rate - 1.76).abs() < 1e-9);
    }

    #[test]
    fn zero_followers_never_qualifies() {
        let samples = vec![sample(1, 1_000_000, 100_000)];
        let verdict = score(&profile(0, 50), &samples, &Thresholds::default());
        assert!(!verdict.qualifies);
        assert_eq!(verdict.result.engagement_rate, 0.0);
        assert_eq!(verdict.rejection, Some(RejectionReason::LowEngagement));
    }

    #[test]
    fn rate_at_threshold_qualifies() {
        // Exactly 0.25%: 5 / 2000 * 100.
        let samples = vec![sample(1, 5, 0)];
        let verdict = score(&profile(2000, 30), &samples, &Thresholds::default());
        assert!(verdict.qualifies);
    }
}
