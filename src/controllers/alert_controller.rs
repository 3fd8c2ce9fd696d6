use std::sync::Arc;

use crate::dto::alert_dto::{AlertListQuery, AlertListResponse, UpdateAlertStatusRequest};
use crate::dto::api_response::ApiResponse;
use crate::models::alert::MisuseAlert;
use crate::services::analysis_service::AnalysisService;
use crate::utils::errors::AppError;

pub struct AlertController {
    analysis: Arc<AnalysisService>,
}

impl AlertController {
    pub fn new(analysis: Arc<AnalysisService>) -> Self {
        Self { analysis }
    }

    /// Último análisis (lo ejecuta si todavía no hay ninguno)
    pub async fn list(&self, query: AlertListQuery) -> Result<AlertListResponse, AppError> {
        let status = query.status_filter()?;
        let report = self.analysis.latest_or_run().await?;

        Ok(AlertListResponse::from_report(&report, status, *self.analysis.thresholds()))
    }

    pub async fn refresh(&self) -> Result<ApiResponse<AlertListResponse>, AppError> {
        let report = self.analysis.refresh().await?;

        Ok(ApiResponse::success(AlertListResponse::from_report(
            &report,
            None,
            *self.analysis.thresholds(),
        )))
    }

    pub async fn update_status(
        &self,
        alert_id: &str,
        request: UpdateAlertStatusRequest,
    ) -> Result<ApiResponse<MisuseAlert>, AppError> {
        let alert = self.analysis.update_status(alert_id, request.status).await?;
        let message = format!("Alert {} marked as {}", alert.id, alert.status);

        Ok(ApiResponse::success_with_message(alert, message))
    }
}
