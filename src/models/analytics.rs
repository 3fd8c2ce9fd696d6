//! Modelos de Analytics
//!
//! Este módulo contiene las filas de reportes (mensual, por vehículo, resumen
//! de flota) y el reporte de análisis de mal uso. Todo es derivado y de solo
//! lectura: se recalcula en cada consulta.
//!
//! Los cocientes con denominador cero se representan como `None` (`null` en
//! JSON) para que el consumidor muestre "N/A" en lugar de NaN o Infinity.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::alert::{AlertStats, MisuseAlert};
use super::data_quality::DataQualitySummary;
use super::vehicle::VehicleSummary;
use crate::utils::dates::iso_datetime;

/// Fila del reporte mensual (solo meses con registros)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub month_name: String,
    pub total_liters: f64,
    pub total_cost: f64,
    pub avg_price_per_liter: Option<f64>,
    pub record_count: usize,
    /// Variación de litros frente al mes anterior con registros
    pub change_percent: Option<f64>,
}

/// Totales del año seleccionado
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub total_liters: f64,
    pub total_cost: f64,
    pub avg_price_per_liter: Option<f64>,
    pub record_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub year: i32,
    pub months: Vec<MonthlyAggregate>,
    pub summary: YearSummary,
}

/// Punto de la serie de últimas cargas de un vehículo
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillPoint {
    #[serde(with = "iso_datetime")]
    pub date: NaiveDateTime,
    pub liters: f64,
    pub cost: f64,
    pub mileage: f64,
}

/// Reporte de un vehículo
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleAggregate {
    pub vehicle: VehicleSummary,
    pub total_liters: f64,
    pub total_cost: f64,
    pub avg_cost_per_liter: Option<f64>,
    pub record_count: usize,
    #[serde(serialize_with = "iso_datetime::serialize_option")]
    pub first_fill: Option<NaiveDateTime>,
    #[serde(serialize_with = "iso_datetime::serialize_option")]
    pub last_fill: Option<NaiveDateTime>,
    pub total_distance_km: Option<f64>,
    /// km/L; `None` = sin datos suficientes
    pub avg_efficiency_km_per_liter: Option<f64>,
    pub liters_per_100_km: Option<f64>,
    pub recent_fills: Vec<FillPoint>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageTrend {
    Up,
    Down,
    Stable,
}

/// Resumen de combustible del mes en curso
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetFuelSummary {
    /// `YYYY-MM`
    pub month: String,
    pub total_cost_this_month: f64,
    pub total_liters_this_month: f64,
    pub total_liters_previous_month: f64,
    pub highest_fuel_consuming_vehicle: Option<String>,
    pub fuel_usage_trend: UsageTrend,
}

/// Resultado de un análisis de mal uso
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub generation: u64,
    pub generated_at: DateTime<Utc>,
    pub alerts: Vec<MisuseAlert>,
    pub stats: AlertStats,
    pub data_quality: DataQualitySummary,
}
