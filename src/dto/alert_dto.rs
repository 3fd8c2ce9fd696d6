use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::alert::{AlertStats, AlertStatus, MisuseAlert};
use crate::models::analytics::AnalysisReport;
use crate::models::data_quality::DataQualitySummary;
use crate::services::misuse_detector::DetectionThresholds;
use crate::utils::errors::{bad_request_error, AppResult};

/// Query de `GET /api/fuel/alerts`
#[derive(Debug, Default, Deserialize)]
pub struct AlertListQuery {
    pub status: Option<String>,
}

impl AlertListQuery {
    /// `?status=reviewed` y `?status=REVIEWED` son equivalentes
    pub fn status_filter(&self) -> AppResult<Option<AlertStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => serde_json::from_value(Value::String(raw.to_ascii_uppercase()))
                .map(Some)
                .map_err(|_| bad_request_error(&format!("Unknown alert status '{}'", raw))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlertStatusRequest {
    pub status: AlertStatus,
}

/// Reporte de alertas tal como lo consume el panel
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertListResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub alerts: Vec<MisuseAlert>,
    /// Contadores sobre todas las alertas, no solo las filtradas
    pub stats: AlertStats,
    pub data_quality: DataQualitySummary,
    pub thresholds: DetectionThresholds,
}

impl AlertListResponse {
    pub fn from_report(
        report: &AnalysisReport,
        status: Option<AlertStatus>,
        thresholds: DetectionThresholds,
    ) -> Self {
        let alerts = report
            .alerts
            .iter()
            .filter(|alert| status.map_or(true, |status| alert.status == status))
            .cloned()
            .collect();

        Self {
            run_id: report.run_id,
            generated_at: report.generated_at,
            alerts,
            stats: report.stats.clone(),
            data_quality: report.data_quality.clone(),
            thresholds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_parsing() {
        let query = AlertListQuery { status: Some("reviewed".to_string()) };
        assert_eq!(query.status_filter().unwrap(), Some(AlertStatus::Reviewed));

        let query = AlertListQuery { status: Some(" ".to_string()) };
        assert_eq!(query.status_filter().unwrap(), None);

        let query = AlertListQuery { status: Some("closed".to_string()) };
        assert!(query.status_filter().is_err());
    }
}
