//! Detector de mal uso de combustible
//!
//! Aplica un conjunto fijo de reglas a los registros de cada vehículo, en orden
//! cronológico. Un mismo registro puede disparar varias reglas; cada una genera
//! su propia alerta. El texto de `details` incluye los valores exactos que
//! dispararon la regla (auditoría).
//!
//! Reglas, en orden de evaluación:
//! 1. `EXCESSIVE_REFUELING` - recarga grande menos de un día después de la anterior
//! 2. `UNUSUAL_QUANTITY` - cantidad por encima de la capacidad típica del tanque
//! 3. `SUSPICIOUS_MILEAGE` - el odómetro retrocede
//! 4. `ABNORMAL_CONSUMPTION` - desviación de la media de las cargas anteriores

use serde::Serialize;

use crate::models::alert::{AlertType, MisuseAlert};
use crate::models::FuelRecord;
use crate::services::grouping_service::{GroupedRecords, VehicleGroup};
use crate::utils::dates::days_between;
use crate::utils::numbers::to_fixed;

/// Umbrales de detección
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionThresholds {
    /// Intervalo mínimo (días) entre recargas antes de considerarlas excesivas
    pub min_refuel_interval_days: f64,
    /// Litros a partir de los cuales una recarga rápida es sospechosa
    pub excessive_refuel_liters: f64,
    /// Capacidad típica máxima del tanque
    pub tank_capacity_liters: f64,
    /// Desviación relativa máxima frente a la media (0.5 = 50%)
    pub consumption_deviation: f64,
    /// Registros previos necesarios para evaluar el consumo
    pub min_consumption_history: usize,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            min_refuel_interval_days: 1.0,
            excessive_refuel_liters: 20.0,
            tank_capacity_liters: 60.0,
            consumption_deviation: 0.5,
            min_consumption_history: 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MisuseDetector {
    thresholds: DetectionThresholds,
}

impl MisuseDetector {
    pub fn new(thresholds: DetectionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DetectionThresholds {
        &self.thresholds
    }

    /// Evaluar todos los grupos; las alertas salen en orden de emisión
    pub fn detect(&self, grouped: &GroupedRecords<'_>) -> Vec<MisuseAlert> {
        let mut alerts = Vec::new();
        for group in &grouped.groups {
            self.analyze_group(group, &mut alerts);
        }

        log::info!(
            "🔍 {} alertas detectadas en {} vehículos",
            alerts.len(),
            grouped.groups.len()
        );
        alerts
    }

    fn analyze_group(&self, group: &VehicleGroup<'_>, alerts: &mut Vec<MisuseAlert>) {
        let vehicle = group.vehicle;
        let records = &group.records;

        for (index, record) in records.iter().enumerate() {
            let previous = index.checked_sub(1).map(|prev| records[prev]);
            let history = &records[..index];

            let findings = [
                previous.and_then(|prev| self.check_excessive_refueling(record, prev)),
                self.check_unusual_quantity(record),
                previous.and_then(|prev| self.check_suspicious_mileage(record, prev)),
                self.check_abnormal_consumption(record, history),
            ];

            alerts.extend(
                findings
                    .into_iter()
                    .flatten()
                    .map(|(alert_type, details)| MisuseAlert::new(alert_type, vehicle, record, details)),
            );
        }
    }

    fn check_excessive_refueling(&self, record: &FuelRecord, previous: &FuelRecord) -> Option<(AlertType, String)> {
        let days_diff = days_between(&previous.date, &record.date);

        if days_diff < self.thresholds.min_refuel_interval_days
            && record.quantity > self.thresholds.excessive_refuel_liters
        {
            return Some((
                AlertType::ExcessiveRefueling,
                format!(
                    "Refilled {}L only {} days after previous refill",
                    record.quantity,
                    to_fixed(days_diff, 1)
                ),
            ));
        }
        None
    }

    fn check_unusual_quantity(&self, record: &FuelRecord) -> Option<(AlertType, String)> {
        if record.quantity > self.thresholds.tank_capacity_liters {
            return Some((
                AlertType::UnusualQuantity,
                format!("Refilled {}L, exceeds typical tank capacity", record.quantity),
            ));
        }
        None
    }

    fn check_suspicious_mileage(&self, record: &FuelRecord, previous: &FuelRecord) -> Option<(AlertType, String)> {
        if record.mileage < previous.mileage {
            return Some((
                AlertType::SuspiciousMileage,
                format!(
                    "Odometer decreased from {}km to {}km",
                    previous.mileage, record.mileage
                ),
            ));
        }
        None
    }

    fn check_abnormal_consumption(&self, record: &FuelRecord, history: &[&FuelRecord]) -> Option<(AlertType, String)> {
        if history.is_empty() || history.len() < self.thresholds.min_consumption_history {
            return None;
        }

        let avg_quantity = history.iter().map(|r| r.quantity).sum::<f64>() / history.len() as f64;
        if avg_quantity <= 0.0 {
            return None;
        }

        let deviation = (record.quantity - avg_quantity).abs() / avg_quantity;
        if deviation > self.thresholds.consumption_deviation {
            return Some((
                AlertType::AbnormalConsumption,
                format!(
                    "Fuel amount ({}L) deviates {}% from average ({}L)",
                    record.quantity,
                    to_fixed(deviation * 100.0, 0),
                    to_fixed(avg_quantity, 1)
                ),
            ));
        }
        None
    }
}
