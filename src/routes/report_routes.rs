use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::report_dto::{FleetSummaryQuery, MonthlyReportQuery};
use crate::models::analytics::{FleetFuelSummary, MonthlyReport, VehicleAggregate};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/monthly", get(monthly_report))
        .route("/vehicles/:vehicle_id", get(vehicle_report))
}

async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<Json<MonthlyReport>, AppError> {
    let controller = ReportController::new(state.analysis.clone());
    let response = controller.monthly(query).await?;
    Ok(Json(response))
}

async fn vehicle_report(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<VehicleAggregate>, AppError> {
    let controller = ReportController::new(state.analysis.clone());
    let response = controller.vehicle(vehicle_id).await?;
    Ok(Json(response))
}

pub async fn fleet_summary(
    State(state): State<AppState>,
    Query(query): Query<FleetSummaryQuery>,
) -> Result<Json<FleetFuelSummary>, AppError> {
    let controller = ReportController::new(state.analysis.clone());
    let response = controller.fleet_summary(query).await?;
    Ok(Json(response))
}
