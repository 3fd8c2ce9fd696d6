use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fuel_watch::cache::InMemoryAlertStatusStore;
use fuel_watch::config::EnvironmentConfig;
use fuel_watch::models::{AnalysisSnapshot, FuelHistoryFilter};
use fuel_watch::routes::create_router;
use fuel_watch::services::ingestion_service::build_snapshot;
use fuel_watch::services::{AnalysisService, FleetDataSource, MisuseDetector};
use fuel_watch::state::AppState;
use fuel_watch::utils::errors::{AppError, AppResult};

struct FakeFleet {
    fuel: Vec<Value>,
    vehicles: Vec<Value>,
}

#[async_trait]
impl FleetDataSource for FakeFleet {
    async fn fetch_snapshot(&self, _filter: &FuelHistoryFilter) -> AppResult<AnalysisSnapshot> {
        Ok(build_snapshot(self.fuel.clone(), self.vehicles.clone()))
    }
}

struct DownFleet;

#[async_trait]
impl FleetDataSource for DownFleet {
    async fn fetch_snapshot(&self, _filter: &FuelHistoryFilter) -> AppResult<AnalysisSnapshot> {
        Err(AppError::Upstream { endpoint: "/fuel".to_string(), status: 500 })
    }
}

fn fleet() -> FakeFleet {
    FakeFleet {
        fuel: vec![
            json!({ "id": 1, "vehicle": { "id": 1 }, "quantity": 30, "cost": 45, "mileage": 1000, "date": "2024-01-01" }),
            json!({ "id": 2, "vehicleId": 1, "quantity": 80, "cost": 120, "mileage": 1400, "date": "2024-01-10" }),
            json!({ "id": 3, "vehicleId": "1", "quantity": 30, "cost": 45, "mileage": 1300, "date": "2024-01-20" }),
            json!({ "id": 4, "vehicleId": 2, "quantity": 40, "cost": 60, "mileage": 500, "date": "2024-03-05" }),
            json!({ "id": 5, "vehicleId": 9, "quantity": 40, "cost": 60, "mileage": 500, "date": "2024-03-05" }),
            json!({ "id": 6, "vehicleId": 2, "quantity": 40 }),
        ],
        vehicles: vec![
            json!({ "id": 1, "licensePlate": "CAB-0001", "make": "Toyota", "model": "Hilux" }),
            json!({ "id": 2, "licensePlate": "CAB-0002", "make": "Ford", "model": "Ranger" }),
        ],
    }
}

fn test_app(source: impl FleetDataSource + 'static) -> Router {
    let vars: HashMap<&str, &str> = HashMap::from([("FLEET_API_URL", "http://fleet.test")]);
    let config = EnvironmentConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
        .expect("test config");

    let analysis = AnalysisService::new(
        Arc::new(source),
        MisuseDetector::new(config.thresholds),
        Arc::new(InMemoryAlertStatusStore::new()),
    );
    create_router(AppState::new(config, analysis))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app(fleet());
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "fuel_watch");
}

#[tokio::test]
async fn test_alerts_are_ranked_with_data_quality() {
    let app = test_app(fleet());
    let (status, body) = get(&app, "/api/fuel/alerts").await;

    assert_eq!(status, StatusCode::OK);
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["id"], "ALERT-3-MILEAGE");
    assert_eq!(alerts[0]["severity"], "HIGH");
    assert_eq!(alerts[0]["vehiclePlate"], "CAB-0001");
    assert_eq!(alerts[0]["details"], "Odometer decreased from 1400km to 1300km");
    assert_eq!(alerts[1]["id"], "ALERT-2-QUANTITY");
    assert_eq!(alerts[1]["status"], "PENDING");

    assert_eq!(body["stats"]["total"], 2);
    assert_eq!(body["stats"]["high"], 1);
    assert_eq!(body["dataQuality"]["totalRecords"], 6);
    assert_eq!(body["dataQuality"]["analyzedRecords"], 4);
    assert_eq!(body["dataQuality"]["malformedRecords"], 1);
    assert_eq!(body["dataQuality"]["orphanRecords"], 1);
    assert_eq!(body["thresholds"]["tankCapacityLiters"], 60.0);
}

#[tokio::test]
async fn test_status_filter_and_transitions() {
    let app = test_app(fleet());

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/fuel/alerts/ALERT-2-QUANTITY/status",
        Some(json!({ "status": "REVIEWED" })),
    )
    .await;
    // Sin análisis publicado la alerta todavía no existe
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    get(&app, "/api/fuel/alerts").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/fuel/alerts/ALERT-2-QUANTITY/status",
        Some(json!({ "status": "REVIEWED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "REVIEWED");

    let (_, body) = get(&app, "/api/fuel/alerts?status=reviewed").await;
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["id"], "ALERT-2-QUANTITY");
    assert_eq!(body["stats"]["reviewed"], 1);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/fuel/alerts/ALERT-3-MILEAGE/status",
        Some(json!({ "status": "RESOLVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
    assert_eq!(body["details"]["allowed"], "REVIEWED");

    let (status, _) = get(&app, "/api/fuel/alerts?status=archived").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_keeps_reviewed_status() {
    let app = test_app(fleet());
    get(&app, "/api/fuel/alerts").await;
    send(
        &app,
        Method::PATCH,
        "/api/fuel/alerts/ALERT-3-MILEAGE/status",
        Some(json!({ "status": "REVIEWED" })),
    )
    .await;

    let (status, body) = send(&app, Method::POST, "/api/fuel/alerts/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let alerts = body["data"]["alerts"].as_array().unwrap();
    let mileage = alerts.iter().find(|a| a["id"] == "ALERT-3-MILEAGE").unwrap();
    assert_eq!(mileage["status"], "REVIEWED");
    assert_eq!(body["data"]["stats"]["pending"], 1);
}

#[tokio::test]
async fn test_monthly_report() {
    let app = test_app(fleet());
    let (status, body) = get(&app, "/api/fuel/reports/monthly?year=2024").await;

    assert_eq!(status, StatusCode::OK);
    let months = body["months"].as_array().unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["month"], 3);
    assert_eq!(months[1]["monthName"], "January");
    assert_eq!(months[1]["totalLiters"], 140.0);
    assert_eq!(months[1]["changePercent"], Value::Null);
    assert_eq!(body["summary"]["recordCount"], 4);

    let (status, body) = get(&app, "/api/fuel/reports/monthly?year=1850").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_vehicle_report() {
    let app = test_app(fleet());

    let (status, body) = get(&app, "/api/fuel/reports/vehicles/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle"]["licensePlate"], "CAB-0001");
    assert_eq!(body["recordCount"], 3);
    assert_eq!(body["totalDistanceKm"], 400.0);
    assert_eq!(body["recentFills"].as_array().unwrap().len(), 3);

    let (status, body) = get(&app, "/api/fuel/reports/vehicles/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["avgEfficiencyKmPerLiter"], Value::Null);

    let (status, _) = get(&app, "/api/fuel/reports/vehicles/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fleet_summary() {
    let app = test_app(fleet());

    let (status, body) = get(&app, "/api/fuel/summary?date=2024-03-18").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["month"], "2024-03");
    assert_eq!(body["totalCostThisMonth"], 60.0);
    assert_eq!(body["highestFuelConsumingVehicle"], "CAB-0002");
    assert_eq!(body["fuelUsageTrend"], "UP");

    let (status, _) = get(&app, "/api/fuel/summary?date=march").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_failure_is_bad_gateway() {
    let app = test_app(DownFleet);

    let (status, body) = get(&app, "/api/fuel/alerts").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "FETCH_FAILURE");
    assert_eq!(body["details"]["status"], 500);

    let (status, _) = get(&app, "/api/fuel/reports/monthly?year=2024").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
