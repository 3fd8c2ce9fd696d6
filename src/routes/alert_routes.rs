use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::controllers::alert_controller::AlertController;
use crate::dto::alert_dto::{AlertListQuery, AlertListResponse, UpdateAlertStatusRequest};
use crate::dto::api_response::ApiResponse;
use crate::models::alert::MisuseAlert;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/refresh", post(refresh_alerts))
        .route("/:alert_id/status", patch(update_alert_status))
}

async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertListQuery>,
) -> Result<Json<AlertListResponse>, AppError> {
    let controller = AlertController::new(state.analysis.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn refresh_alerts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AlertListResponse>>, AppError> {
    let controller = AlertController::new(state.analysis.clone());
    let response = controller.refresh().await?;
    Ok(Json(response))
}

async fn update_alert_status(
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
    Json(request): Json<UpdateAlertStatusRequest>,
) -> Result<Json<ApiResponse<MisuseAlert>>, AppError> {
    let controller = AlertController::new(state.analysis.clone());
    let response = controller.update_status(&alert_id, request).await?;
    Ok(Json(response))
}
