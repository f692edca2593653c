//! Credit-scoring service entrypoint: scores loan-application records dropped
//! into the inbox directory. Runs a single pass or a polling loop with a
//! configurable interval.

use credit_scoring::{
    config::ServiceConfig,
    logging::StructuredLogger,
    notify::NotificationClient,
    orchestrator::ScoringOrchestrator,
    scoring::CreditScorer,
    storage::AssessmentStore,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("CREDIT_SCORING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = ServiceConfig::load(&config_path)?;

    StructuredLogger::init(&config.log)?;

    info!(
        artifact_dir = ?config.artifact_dir,
        inbox = ?config.inbox_dir,
        "credit scoring service starting"
    );

    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(&config.inbox_dir)?;

    let secret = match std::env::var("CREDIT_SCORING_STORE_SECRET") {
        Ok(s) if !s.is_empty() => s,
        _ => {
            warn!("CREDIT_SCORING_STORE_SECRET not set; using development secret");
            "development-store-secret".to_string()
        }
    };
    let store_path = config.data_dir.join("assessments.db");
    let store = Arc::new(AssessmentStore::open(&store_path, secret.as_bytes())?);

    let scorer = Arc::new(CreditScorer::new(config.artifact_dir.clone()));
    // Load failure is terminal for this process.
    scorer.ensure_loaded()?;
    let health = scorer.health_check();
    info!(
        model_version = ?health.model_version,
        backend = ?health.backend,
        self_test = ?health.self_test,
        "scorer ready"
    );

    let orchestrator = ScoringOrchestrator::new(scorer, store, config.orchestrator.clone())
        .with_notifier(NotificationClient::new(&config.notify))
        .with_audit_log(&config.data_dir.join("audit.ndjson"))?;

    let interval_secs = config.orchestrator.poll_interval_secs;
    if interval_secs > 0 {
        info!(interval_secs, "polling mode (Ctrl+C to stop)");
        static STOP: AtomicBool = AtomicBool::new(false);
        let _ = ctrlc::set_handler(|| {
            STOP.store(true, Ordering::Relaxed);
        });
        let mut pass: u64 = 0;
        while !STOP.load(Ordering::Relaxed) {
            pass += 1;
            if let Err(e) = orchestrator.process_inbox(&config.inbox_dir) {
                warn!(pass, error = %e, "inbox pass failed");
            }
            for _ in 0..interval_secs {
                if STOP.load(Ordering::Relaxed) {
                    break;
                }
                std::thread::sleep(Duration::from_secs(1));
            }
        }
        info!("credit scoring service stopping");
    } else {
        let summary = orchestrator.process_inbox(&config.inbox_dir)?;
        info!(?summary, "single pass complete");
    }

    Ok(())
}
