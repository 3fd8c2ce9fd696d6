use std::sync::Arc;

use chrono::{Datelike, Utc};
use validator::Validate;

use crate::dto::report_dto::{FleetSummaryQuery, MonthlyReportQuery};
use crate::models::analytics::{FleetFuelSummary, MonthlyReport, VehicleAggregate};
use crate::models::{EntityId, FuelHistoryFilter};
use crate::services::analysis_service::AnalysisService;
use crate::services::grouping_service::group_by_vehicle;
use crate::services::report_service;
use crate::utils::errors::AppError;

/// Los reportes se calculan sobre un snapshot nuevo en cada consulta
pub struct ReportController {
    analysis: Arc<AnalysisService>,
}

impl ReportController {
    pub fn new(analysis: Arc<AnalysisService>) -> Self {
        Self { analysis }
    }

    pub async fn monthly(&self, query: MonthlyReportQuery) -> Result<MonthlyReport, AppError> {
        query.validate()?;
        let year = query.year.unwrap_or_else(|| Utc::now().year());

        let snapshot = self.analysis.snapshot(&FuelHistoryFilter::default()).await?;
        let grouped = group_by_vehicle(&snapshot);

        Ok(report_service::monthly_report(&grouped, year))
    }

    pub async fn vehicle(&self, vehicle_id: String) -> Result<VehicleAggregate, AppError> {
        let vehicle_id = EntityId::from(vehicle_id);
        let filter = FuelHistoryFilter {
            vehicle_id: Some(vehicle_id.clone()),
            month: None,
        };

        let snapshot = self.analysis.snapshot(&filter).await?;
        let grouped = group_by_vehicle(&snapshot);

        report_service::vehicle_report(&snapshot, &grouped, &vehicle_id)
    }

    pub async fn fleet_summary(&self, query: FleetSummaryQuery) -> Result<FleetFuelSummary, AppError> {
        let reference = query.reference_date()?;

        let snapshot = self.analysis.snapshot(&FuelHistoryFilter::default()).await?;
        let grouped = group_by_vehicle(&snapshot);

        Ok(report_service::fleet_summary(&grouped, reference))
    }
}
