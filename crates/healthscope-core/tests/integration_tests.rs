//! Integration tests for healthscope-core
//!
//! These tests exercise the full onboard → log → analyze → reset workflow
//! against an on-disk store, plus the launch gate against a scripted transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Url;

use healthscope_core::gate::{ProbeOutcome, ProbeResponse};
use healthscope_core::insights::InsightsFeed;
use healthscope_core::{
    analyze, onboarding, statistics, AccountService, Confirmation, GateConfig, GateDecision,
    GateResolver, GateTransport, InsightPriority, OnboardingDraft, PersistenceStore,
    SymptomCategory, SymptomEntry, SymptomRepository, SymptomSeverity, TimeRange,
};

fn entry(category: SymptomCategory, severity: SymptomSeverity, hours_ago: i64) -> SymptomEntry {
    SymptomEntry::new(category, severity).at(Utc::now() - chrono::Duration::hours(hours_ago))
}

// =============================================================================
// Persistence Integration Tests
// =============================================================================

#[test]
fn test_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("healthscope.db");

    let first = entry(SymptomCategory::Headache, SymptomSeverity::Moderate, 2)
        .with_notes("after lunch")
        .with_duration(Some(Duration::from_secs(45 * 60)));
    let second = entry(SymptomCategory::Fever, SymptomSeverity::Severe, 1);

    {
        let store = PersistenceStore::open(&path).unwrap();
        let repository = SymptomRepository::new(store);
        repository.add(first.clone()).unwrap();
        repository.add(second.clone()).unwrap();
    }

    let store = PersistenceStore::open(&path).unwrap();
    let repository = SymptomRepository::new(store.clone());

    // Newest first, fields unchanged
    assert_eq!(repository.all(), vec![second.clone(), first.clone()]);
    assert_eq!(store.load_symptoms(), vec![second, first]);
}

#[test]
fn test_update_and_delete_are_written_through() {
    let dir = tempfile::tempdir().unwrap();
    let store = PersistenceStore::open(dir.path().join("healthscope.db")).unwrap();
    let repository = SymptomRepository::new(store.clone());

    let original = entry(SymptomCategory::Cough, SymptomSeverity::Mild, 3);
    repository.add(original.clone()).unwrap();

    let mut edited = original.clone();
    edited.severity = SymptomSeverity::Severe;
    edited.notes = "worse at night".into();
    assert!(repository.update(edited.clone()).unwrap());
    assert_eq!(store.load_symptoms(), vec![edited]);

    // Unknown ids are ignored
    let stranger = entry(SymptomCategory::Other, SymptomSeverity::Mild, 0);
    assert!(!repository.update(stranger.clone()).unwrap());
    assert!(!repository.delete(stranger.id).unwrap());
    assert_eq!(store.load_symptoms().len(), 1);

    assert!(repository.delete(original.id).unwrap());
    assert!(!repository.delete(original.id).unwrap());
    assert!(store.load_symptoms().is_empty());
}

// =============================================================================
// Workflow Integration Tests
// =============================================================================

#[test]
fn test_full_tracking_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let store = PersistenceStore::open(dir.path().join("healthscope.db")).unwrap();

    let draft = OnboardingDraft {
        name: "Ana".into(),
        age: "34".into(),
        email: "ana@example.com".into(),
    };
    let profile = onboarding::complete(&draft, &store).unwrap();
    assert!(store.has_completed_onboarding());

    let repository = Arc::new(SymptomRepository::new(store.clone()));
    let feed = InsightsFeed::attach(repository.clone());
    assert_eq!(feed.snapshot().statistics.total_count, 0);

    for hours_ago in [1, 5, 9] {
        repository
            .add(entry(SymptomCategory::Headache, SymptomSeverity::Moderate, hours_ago))
            .unwrap();
    }
    repository
        .add(entry(SymptomCategory::Fatigue, SymptomSeverity::Mild, 12))
        .unwrap();
    // Outside the week window but inside the month
    repository
        .add(entry(SymptomCategory::Fever, SymptomSeverity::Severe, 24 * 20))
        .unwrap();

    let week = feed.snapshot();
    assert_eq!(week.range, TimeRange::Week);
    assert_eq!(week.statistics.total_count, 4);
    assert_eq!(
        week.statistics.most_common_category,
        Some(SymptomCategory::Headache)
    );
    let titles: Vec<&str> = week.insights.iter().map(|i| i.title.as_str()).collect();
    assert!(titles.contains(&"Recurring Headache"));
    assert!(titles.contains(&"Stay Hydrated"));
    assert!(titles.contains(&"Prioritize Rest"));
    assert!(!titles.contains(&"Severe Symptoms Detected"));

    feed.select_range(TimeRange::Month);
    let month = feed.snapshot();
    assert_eq!(month.statistics.total_count, 5);
    assert_eq!(month.insights[0].title, "Severe Symptoms Detected");
    assert!(month.revision > week.revision);

    let service = AccountService::new(store.clone(), repository.clone());
    assert_eq!(service.profile().map(|p| p.id), Some(profile.id));

    assert!(!service.reset_symptoms(Confirmation::Cancelled).unwrap());
    assert_eq!(repository.len(), 5);

    assert!(service.delete_account(Confirmation::Confirmed).unwrap());
    assert!(service.profile().is_none());
    assert!(!store.has_completed_onboarding());
    assert!(repository.is_empty());
    assert_eq!(feed.snapshot().statistics.total_count, 0);
}

#[test]
fn test_analysis_on_fixed_clock() {
    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let old = now - chrono::Duration::days(12);

    let entries = vec![
        SymptomEntry::new(SymptomCategory::Nausea, SymptomSeverity::Mild).at(old),
        SymptomEntry::new(SymptomCategory::Cough, SymptomSeverity::Mild).at(old),
    ];

    let insights = analyze(&entries, now);
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].title, "Symptom-Free Week");
    assert_eq!(insights[0].priority, InsightPriority::Low);

    let stats = statistics(&entries, now);
    assert_eq!(stats.count_in_last_week, 0);
    // Tie goes to the category declared first
    assert_eq!(stats.most_common_category, Some(SymptomCategory::Cough));
}

// =============================================================================
// Gate Integration Tests
// =============================================================================

struct FixedTransport {
    outcome: ProbeOutcome,
    calls: AtomicUsize,
}

#[async_trait]
impl GateTransport for FixedTransport {
    async fn fetch(&self, _url: &Url, _config: &GateConfig) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[tokio::test]
async fn test_gate_decision_seeds_next_launch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("healthscope.db");
    let config = GateConfig::with_endpoint("https://example.com/launch");

    let transport = Arc::new(FixedTransport {
        outcome: ProbeOutcome::Response(ProbeResponse {
            status: 302,
            content_length: None,
            body_len: 0,
        }),
        calls: AtomicUsize::new(0),
    });

    {
        let store = PersistenceStore::open(&path).unwrap();
        let resolver = GateResolver::with_transport(config.clone(), store, transport.clone());
        assert_eq!(resolver.current_decision(), GateDecision::ShowNative);
        assert_eq!(resolver.resolve().await, GateDecision::ShowWeb);
    }

    // Next launch starts from the cached decision and probes again
    let store = PersistenceStore::open(&path).unwrap();
    let resolver = Arc::new(GateResolver::with_transport(config, store, transport.clone()));
    assert_eq!(resolver.current_decision(), GateDecision::ShowWeb);

    let decision = resolver.clone().spawn().await.unwrap();
    assert_eq!(decision, GateDecision::ShowWeb);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_gate_cache_survives_account_deletion() {
    let store = PersistenceStore::in_memory();
    let transport = Arc::new(FixedTransport {
        outcome: ProbeOutcome::TransportError("dns failure".into()),
        calls: AtomicUsize::new(0),
    });
    let resolver = GateResolver::with_transport(
        GateConfig::with_endpoint("https://example.com/launch"),
        store.clone(),
        transport,
    );
    assert_eq!(resolver.resolve().await, GateDecision::ShowNative);

    let repository = Arc::new(SymptomRepository::new(store.clone()));
    let service = AccountService::new(store.clone(), repository);
    service.delete_account(Confirmation::Confirmed).unwrap();

    assert!(store.gate_cache());
}
