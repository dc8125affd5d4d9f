//! Orchestrator scenarios against the in-memory mocks: input validation,
//! audit ordering, dedup, partial discovery, the floor short-circuit, and
//! the qualify/reject/fault paths. No network, no spreadsheet.

use sourcer_common::{Platform, SourcerError, Thresholds};
use sourcer_scout::pipeline::{Pipeline, RunStats};
use sourcer_scout::testing::{profile, sample, MockAdapter, MockStore};

async fn run(
    adapter: &MockAdapter,
    store: &MockStore,
    raw_hashtags: &str,
) -> Result<RunStats, SourcerError> {
    Pipeline::new(adapter, store, Thresholds::default(), 4)
        .run(raw_hashtags, 50)
        .await
}

#[tokio::test]
async fn empty_input_rejected_before_any_work() {
    let adapter = MockAdapter::new(Platform::Instagram);
    let store = MockStore::new();

    let err = run(&adapter, &store, "   ").await.unwrap_err();
    assert!(matches!(err, SourcerError::Validation(_)));

    // Nothing audited, nothing fetched.
    assert!(store.audits().is_empty());
    assert!(adapter.profile_calls().is_empty());
}

#[tokio::test]
async fn separator_only_input_rejected() {
    let adapter = MockAdapter::new(Platform::Instagram);
    let store = MockStore::new();

    let err = run(&adapter, &store, ", ,,").await.unwrap_err();
    match err {
        SourcerError::Validation(message) => {
            assert_eq!(message, "No valid hashtags entered.");
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert!(store.audits().is_empty());
}

#[tokio::test]
async fn failing_hashtag_is_isolated() {
    let adapter = MockAdapter::new(Platform::Instagram)
        .on_failing_hashtag("#a", "upstream fault")
        .on_hashtag("#b", &["u1", "u2"])
        .with_profile(profile(Platform::Instagram, "u1", 500, 50))
        .with_profile(profile(Platform::Instagram, "u2", 500, 50));
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a, #b").await.unwrap();

    // The batch completed over the survivors of "#b".
    assert_eq!(stats.discovered, 2);
    let mut fetched = adapter.profile_calls();
    fetched.sort();
    assert_eq!(fetched, vec!["u1", "u2"]);

    // The audit row still names both input hashtags.
    let audits = store.audits();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].raw_input, "#a, #b");
    assert_eq!(audits[0].normalized_hashtags, vec!["#a", "#b"]);
}

#[tokio::test]
async fn known_identity_skips_enrichment_but_audit_is_written() {
    let adapter = MockAdapter::new(Platform::Instagram).on_hashtag("#a", &["u1"]);
    let store = MockStore::new().with_known("u1");

    let stats = run(&adapter, &store, "#a").await.unwrap();

    assert_eq!(stats.skipped_known, 1);
    assert_eq!(stats.stored, 0);
    assert!(adapter.profile_calls().is_empty());
    assert!(store.qualifying().is_empty());
    assert_eq!(store.audits().len(), 1);
}

#[tokio::test]
async fn audience_floor_short_circuits_activity_fetch() {
    let adapter = MockAdapter::new(Platform::Instagram)
        .on_hashtag("#a", &["small"])
        .with_profile(profile(Platform::Instagram, "small", 900, 100));
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a").await.unwrap();

    assert_eq!(stats.below_floor, 1);
    assert!(adapter.activity_calls().is_empty());
    assert!(store.qualifying().is_empty());
}

#[tokio::test]
async fn missing_profile_is_a_skip_not_a_fault() {
    let adapter = MockAdapter::new(Platform::Instagram).on_hashtag("#a", &["ghost"]);
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a").await.unwrap();

    assert_eq!(stats.profiles_missing, 1);
    assert_eq!(stats.enrich_failed, 0);
    assert!(store.qualifying().is_empty());
}

#[tokio::test]
async fn per_identity_faults_never_abort_the_run() {
    let adapter = MockAdapter::new(Platform::Instagram)
        .on_hashtag("#a", &["broken", "good"])
        .with_failing_profile("broken")
        .with_profile(profile(Platform::Instagram, "good", 5000, 50))
        .with_activity(
            "good",
            vec![
                sample(5, 100, 10),
                sample(4, 90, 9),
                sample(3, 80, 8),
                sample(2, 70, 7),
                sample(1, 60, 6),
            ],
        );
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a").await.unwrap();

    assert_eq!(stats.enrich_failed, 1);
    assert_eq!(stats.stored, 1);
    assert_eq!(store.qualifying()[0].snapshot.identity.username, "good");
}

#[tokio::test]
async fn activity_fault_skips_the_identity() {
    let adapter = MockAdapter::new(Platform::Instagram)
        .on_hashtag("#a", &["flaky"])
        .with_profile(profile(Platform::Instagram, "flaky", 5000, 50))
        .with_failing_activity("flaky");
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a").await.unwrap();

    assert_eq!(stats.enrich_failed, 1);
    assert!(store.qualifying().is_empty());
}

#[tokio::test]
async fn qualifying_account_is_stored_with_median_metrics() {
    let adapter = MockAdapter::new(Platform::Instagram)
        .on_hashtag("#a", &["star"])
        .with_profile(profile(Platform::Instagram, "star", 5000, 50))
        .with_activity(
            "star",
            vec![
                sample(5, 100, 10),
                sample(4, 90, 9),
                sample(3, 80, 8),
                sample(2, 70, 7),
                sample(1, 60, 6),
            ],
        );
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a").await.unwrap();
    assert_eq!(stats.stored, 1);

    let records = store.qualifying();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].median_likes, 80);
    assert_eq!(records[0].median_comments, 8);
    assert!((records[0].engagement_rate - 1.76).abs() < 1e-9);
    assert_eq!(records[0].profile_link, "https://www.instagram.com/star");
}

#[tokio::test]
async fn low_engagement_account_is_rejected() {
    // Big audience, tiny interaction: 11 / 1_000_000 is far below 0.25%.
    let adapter = MockAdapter::new(Platform::Instagram)
        .on_hashtag("#a", &["broadcast"])
        .with_profile(profile(Platform::Instagram, "broadcast", 1_000_000, 50))
        .with_activity("broadcast", vec![sample(2, 10, 1), sample(1, 10, 1)]);
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a").await.unwrap();

    assert_eq!(stats.low_engagement, 1);
    assert!(store.qualifying().is_empty());
}

#[tokio::test]
async fn no_activity_data_rejects_without_qualifying() {
    let adapter = MockAdapter::new(Platform::Instagram)
        .on_hashtag("#a", &["silent"])
        .with_profile(profile(Platform::Instagram, "silent", 5000, 50));
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a").await.unwrap();

    // Activity was fetched, came back empty, and zero medians never qualify.
    assert_eq!(adapter.activity_calls(), vec!["silent"]);
    assert_eq!(stats.low_engagement, 1);
    assert!(store.qualifying().is_empty());
}

#[tokio::test]
async fn side_channel_posts_avoid_a_second_fetch() {
    let adapter = MockAdapter::new(Platform::TikTok)
        .on_hashtag("#a", &["bundled"])
        .with_side_channel(
            "bundled",
            vec![sample(3, 120, 12), sample(2, 100, 10), sample(1, 80, 8)],
        )
        .with_profile(profile(Platform::TikTok, "bundled", 5000, 50));
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a").await.unwrap();

    assert!(adapter.activity_calls().is_empty());
    assert_eq!(stats.stored, 1);

    let records = store.qualifying();
    assert_eq!(records[0].median_likes, 100);
    assert_eq!(records[0].median_comments, 10);
    assert_eq!(records[0].profile_link, "https://www.tiktok.com/@bundled");
}

#[tokio::test]
async fn duplicate_owners_across_hashtags_enrich_once() {
    let adapter = MockAdapter::new(Platform::Instagram)
        .on_hashtag("#a", &["u1"])
        .on_hashtag("#b", &["u1"])
        .with_profile(profile(Platform::Instagram, "u1", 500, 50));
    let store = MockStore::new();

    let stats = run(&adapter, &store, "#a, #b").await.unwrap();

    assert_eq!(stats.discovered, 1);
    assert_eq!(adapter.profile_calls(), vec!["u1"]);
}
