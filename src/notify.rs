//! Notification client: posts a summary of each completed assessment to the
//! application-management system. Delivery failures are logged, never fatal.

use crate::config::NotifyConfig;
use crate::storage::AssessmentRecord;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Serialize)]
struct AssessmentPayload<'a> {
    application_id: &'a str,
    assessment_id: &'a str,
    scored_at: String,
    credit_score: u16,
    category: &'a str,
    risk_level: &'a str,
    confidence: f64,
    confidence_level: &'a str,
    model_version: &'a str,
    job_category: &'a str,
}

pub struct NotificationClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl NotificationClient {
    /// `None` when notifications are disabled or no endpoint is configured.
    pub fn new(config: &NotifyConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let endpoint = config.endpoint.as_ref()?.trim_end_matches('/');
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .ok()?;
        Some(Self {
            client,
            base_url: endpoint.to_string(),
        })
    }

    fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), String> {
        let url = format!("{}{}", self.base_url, path);
        let res = self.client.post(&url).json(body).send().map_err(|e| e.to_string())?;
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().unwrap_or_default();
            return Err(format!("{} {}", status, text));
        }
        Ok(())
    }

    /// Best effort: a failed delivery is logged and otherwise ignored.
    pub fn assessment_completed(&self, record: &AssessmentRecord) {
        let result = &record.result;
        let payload = AssessmentPayload {
            application_id: &record.application_id,
            assessment_id: &record.assessment_id,
            scored_at: record.scored_at.to_rfc3339(),
            credit_score: result.credit_score,
            category: result.category.as_str(),
            risk_level: result.risk_level.as_str(),
            confidence: result.confidence,
            confidence_level: result.confidence_level.as_str(),
            model_version: &result.model_version,
            job_category: &result.ghana_employment.job_category,
        };
        let application_id = record.application_id.as_str();
        match self.post("/api/v1/assessments", &payload) {
            Ok(()) => info!(application_id, "assessment notification sent"),
            Err(e) => warn!(application_id, error = %e, "assessment notification failed"),
        }
    }
}
