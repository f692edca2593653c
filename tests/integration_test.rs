//! Integration test: config load, encrypted store, leases, orchestrator, inbox.

mod common;

use chrono::{TimeZone, Utc};
use common::*;
use credit_scoring::{
    config::{NotifyConfig, OrchestratorConfig, ServiceConfig},
    notify::NotificationClient,
    orchestrator::{input_fingerprint, ScoringOrchestrator},
    scoring::CreditScorer,
    storage::{AssessmentRecord, AssessmentStore},
    RawApplicationInput,
};
use std::path::Path;
use std::sync::Arc;

fn fast_config(max_attempts: u32) -> OrchestratorConfig {
    OrchestratorConfig {
        max_attempts,
        base_delay_ms: 1,
        ..OrchestratorConfig::default()
    }
}

fn orchestrator(
    scorer: CreditScorer,
    store: &Arc<AssessmentStore>,
    config: OrchestratorConfig,
) -> ScoringOrchestrator {
    ScoringOrchestrator::new(Arc::new(scorer), Arc::clone(store), config)
}

fn open_store(dir: &Path) -> Arc<AssessmentStore> {
    Arc::new(AssessmentStore::open(&dir.join("assessments.db"), b"test-secret").unwrap())
}

fn record(application_id: &str, assessment_id: &str, scored_at_ms: i64) -> AssessmentRecord {
    let result = linear_scorer().predict(&example_input()).unwrap();
    AssessmentRecord {
        application_id: application_id.to_string(),
        assessment_id: assessment_id.to_string(),
        scored_at: Utc.timestamp_millis_opt(scored_at_ms).unwrap(),
        input_hash: input_fingerprint(&example_input()).unwrap(),
        result,
    }
}

#[test]
fn config_load_default() {
    let c = ServiceConfig::load(Path::new("nonexistent.json")).unwrap();
    assert_eq!(c.orchestrator.lease_minutes, 30);
    assert_eq!(c.orchestrator.max_attempts, 3);
    assert_eq!(c.orchestrator.poll_interval_secs, 0);
    assert!(!c.notify.enabled);
    assert_eq!(c.log.level, "info");
}

#[test]
fn config_partial_file_keeps_section_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let body = r#"{"artifact_dir": "/opt/models", "orchestrator": {"max_attempts": 5}}"#;
    std::fs::write(&path, body).unwrap();
    let c = ServiceConfig::load(&path).unwrap();
    assert_eq!(c.artifact_dir, Path::new("/opt/models"));
    assert_eq!(c.orchestrator.max_attempts, 5);
    assert_eq!(c.orchestrator.lease_minutes, 30);
    assert!(c.log.json);
}

#[test]
fn storage_roundtrip_and_upsert() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    store.upsert_assessment(&record("APP-1", "a-1", 1_000)).unwrap();
    let got = store.get_assessment("APP-1").unwrap().unwrap();
    assert_eq!(got.assessment_id, "a-1");
    assert_eq!(got.scored_at.timestamp_millis(), 1_000);
    assert_eq!(got.result.credit_score, 567);
    assert_eq!(got.result.model_version, "2.1.0");

    store.upsert_assessment(&record("APP-1", "a-2", 2_000)).unwrap();
    assert_eq!(store.count_assessments().unwrap(), 1);
    assert_eq!(store.get_assessment("APP-1").unwrap().unwrap().assessment_id, "a-2");
    assert!(store.get_assessment("APP-2").unwrap().is_none());
}

#[test]
fn storage_payload_needs_the_right_secret() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assessments.db");
    {
        let store = AssessmentStore::open(&path, b"secret-a").unwrap();
        store.upsert_assessment(&record("APP-1", "a-1", 1_000)).unwrap();
    }
    let other = AssessmentStore::open(&path, b"secret-b").unwrap();
    assert!(other.get_assessment("APP-1").is_err());
}

#[test]
fn storage_prune() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    store.upsert_assessment(&record("old", "a-1", 1_000)).unwrap();
    store.upsert_assessment(&record("new", "a-2", 5_000)).unwrap();
    assert_eq!(store.prune_before(3_000).unwrap(), 1);
    assert!(store.get_assessment("old").unwrap().is_none());
    assert!(store.get_assessment("new").unwrap().is_some());
}

#[test]
fn lease_blocks_until_expiry_or_release() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    assert!(store.try_acquire_lease("APP-1", "h1", 1_000, 500).unwrap());
    assert!(!store.try_acquire_lease("APP-1", "h2", 1_200, 500).unwrap());
    // Other applications are independent.
    assert!(store.try_acquire_lease("APP-2", "h2", 1_200, 500).unwrap());
    // Expired at 1500.
    assert!(store.try_acquire_lease("APP-1", "h2", 1_500, 500).unwrap());

    // Only the current holder can release.
    store.release_lease("APP-1", "h1").unwrap();
    assert!(!store.try_acquire_lease("APP-1", "h3", 1_600, 500).unwrap());
    store.release_lease("APP-1", "h2").unwrap();
    assert!(store.try_acquire_lease("APP-1", "h3", 1_600, 500).unwrap());
}

#[test]
fn unbounded_lease_does_not_overflow() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let now = Utc::now().timestamp_millis();

    assert!(store.try_acquire_lease("APP-1", "h1", now, i64::MAX).unwrap());
    assert!(!store.try_acquire_lease("APP-1", "h2", now + 1, 500).unwrap());
    store.release_lease("APP-1", "h1").unwrap();
    assert!(store.try_acquire_lease("APP-1", "h2", now + 1, 500).unwrap());
}

#[test]
fn orchestrator_accepts_maximum_lease_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let config = OrchestratorConfig {
        lease_minutes: u64::MAX,
        ..fast_config(3)
    };
    let orchestrator = orchestrator(linear_scorer(), &store, config);

    let response = orchestrator.score_application("APP-1", &example_input());
    assert!(response.success, "{response:?}");
    assert_eq!(store.count_assessments().unwrap(), 1);
}

#[test]
fn unreachable_notify_endpoint_does_not_fail_scoring() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let notifier = NotificationClient::new(&NotifyConfig {
        enabled: true,
        endpoint: Some("http://127.0.0.1:9".into()),
    });
    assert!(notifier.is_some());
    let orchestrator =
        orchestrator(linear_scorer(), &store, fast_config(1)).with_notifier(notifier);

    let response = orchestrator.score_application("APP-1", &example_input());
    assert!(response.success, "{response:?}");
    let stored = store.get_assessment("APP-1").unwrap().unwrap();
    assert_eq!(stored.result.credit_score, 567);
}

#[test]
fn orchestrator_persists_and_audits() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let audit = dir.path().join("audit.ndjson");
    let orchestrator = orchestrator(linear_scorer(), &store, fast_config(3))
        .with_audit_log(&audit)
        .unwrap();

    let response = orchestrator.score_application("APP-1", &example_input());
    assert!(response.success);
    assert_eq!(response.result.as_ref().unwrap().credit_score, 567);

    let stored = store.get_assessment("APP-1").unwrap().unwrap();
    assert_eq!(stored.result.credit_score, 567);
    assert_eq!(stored.input_hash, input_fingerprint(&example_input()).unwrap());

    let bad = RawApplicationInput {
        dti: None,
        ..example_input()
    };
    let response = orchestrator.score_application("APP-2", &bad);
    assert!(!response.success);
    assert_eq!(response.violations, vec!["dti is required".to_string()]);
    assert!(store.get_assessment("APP-2").unwrap().is_none());
    assert_eq!(store.count_assessments().unwrap(), 1);

    let lines: Vec<serde_json::Value> = std::fs::read_to_string(&audit)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["application_id"], "APP-1");
    assert_eq!(lines[0]["success"], true);
    assert_eq!(lines[0]["credit_score"], 567);
    assert_eq!(lines[1]["success"], false);
    assert!(lines[1]["error"].as_str().unwrap().contains("dti"));
}

#[test]
fn held_lease_rejects_second_scorer() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let now = Utc::now().timestamp_millis();
    assert!(store.try_acquire_lease("APP-1", "someone-else", now, 60_000).unwrap());

    let orchestrator = orchestrator(linear_scorer(), &store, fast_config(3));
    let response = orchestrator.run_with_retry("APP-1", &example_input());
    assert!(!response.success);
    assert!(response.error.unwrap().contains("in progress"));
    assert_eq!(store.count_assessments().unwrap(), 0);
}

#[test]
fn transient_inference_failures_are_retried() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let scorer = CreditScorer::from_artifact(artifact_with(Box::new(FlakyRegressor::new(2))));
    let orchestrator = orchestrator(scorer, &store, fast_config(3));

    let response = orchestrator.run_with_retry("APP-1", &example_input());
    assert!(response.success, "{response:?}");
    assert_eq!(response.result.unwrap().credit_score, 567);
    assert_eq!(store.count_assessments().unwrap(), 1);
}

#[test]
fn retries_stop_at_max_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let scorer = CreditScorer::from_artifact(artifact_with(Box::new(FlakyRegressor::new(5))));
    let orchestrator = orchestrator(scorer, &store, fast_config(2));

    let response = orchestrator.run_with_retry("APP-1", &example_input());
    assert!(!response.success);
    assert!(response.error.unwrap().contains("model inference"));
    assert_eq!(store.count_assessments().unwrap(), 0);
    // Lease was released after each attempt.
    assert!(store
        .try_acquire_lease("APP-1", "next", Utc::now().timestamp_millis(), 1_000)
        .unwrap());
}

#[test]
fn inbox_pass_sorts_records_by_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let inbox = dir.path().join("inbox");
    std::fs::create_dir_all(&inbox).unwrap();

    let mut good = serde_json::to_value(example_input()).unwrap();
    good["application_id"] = serde_json::json!("APP-7");
    std::fs::write(inbox.join("a.json"), good.to_string()).unwrap();

    let mut bad = serde_json::to_value(example_input()).unwrap();
    bad["dti"] = serde_json::Value::Null;
    std::fs::write(inbox.join("b.json"), bad.to_string()).unwrap();

    std::fs::write(inbox.join("notes.txt"), "ignored").unwrap();

    let orchestrator = orchestrator(linear_scorer(), &store, fast_config(3));
    let summary = orchestrator.process_inbox(&inbox).unwrap();
    assert_eq!((summary.scanned, summary.succeeded, summary.failed), (2, 1, 1));

    assert!(inbox.join("processed/a.json").exists());
    assert!(inbox.join("failed/b.json").exists());
    assert!(!inbox.join("a.json").exists());
    assert!(inbox.join("notes.txt").exists());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(inbox.join("failed/b.result.json")).unwrap())
            .unwrap();
    assert_eq!(report["success"], false);
    assert_eq!(report["violations"][0], "dti is required");

    assert!(store.get_assessment("APP-7").unwrap().is_some());
    assert!(store.get_assessment("b").unwrap().is_none());

    // A second pass finds nothing new.
    let summary = orchestrator.process_inbox(&inbox).unwrap();
    assert_eq!(summary.scanned, 0);
}
