//! Rutas de la API
//!
//! Todas las rutas de negocio cuelgan de `/api/fuel`.

pub mod alert_routes;
pub mod report_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub fn create_fuel_router() -> Router<AppState> {
    Router::new()
        .nest("/alerts", alert_routes::create_alert_router())
        .nest("/reports", report_routes::create_report_router())
        .route("/summary", get(report_routes::fleet_summary))
}

/// Router completo con CORS y trazas HTTP
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/fuel", create_fuel_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "fuel_watch",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
