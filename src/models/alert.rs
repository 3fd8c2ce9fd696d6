//! Modelos de alertas de mal uso de combustible
//!
//! Las alertas son derivadas: se recalculan en cada análisis. Lo único que
//! persiste es el estado de revisión, indexado por `AlertKey`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity_id::EntityId;
use super::fuel_record::FuelRecord;
use super::vehicle::Vehicle;
use crate::utils::dates::iso_datetime;

/// Tipo de alerta - una por regla del detector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    ExcessiveRefueling,
    UnusualQuantity,
    SuspiciousMileage,
    AbnormalConsumption,
}

impl AlertType {
    /// Severidad fija por regla
    pub fn severity(self) -> Severity {
        match self {
            AlertType::ExcessiveRefueling => Severity::High,
            AlertType::UnusualQuantity => Severity::Medium,
            AlertType::SuspiciousMileage => Severity::High,
            AlertType::AbnormalConsumption => Severity::Medium,
        }
    }

    /// Sufijo usado en el id de la alerta (`ALERT-{recordId}-{sufijo}`)
    pub fn id_suffix(self) -> &'static str {
        match self {
            AlertType::ExcessiveRefueling => "EXCESSIVE",
            AlertType::UnusualQuantity => "QUANTITY",
            AlertType::SuspiciousMileage => "MILEAGE",
            AlertType::AbnormalConsumption => "CONSUMPTION",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::ExcessiveRefueling => "EXCESSIVE_REFUELING",
            AlertType::UnusualQuantity => "UNUSUAL_QUANTITY",
            AlertType::SuspiciousMileage => "SUSPICIOUS_MILEAGE",
            AlertType::AbnormalConsumption => "ABNORMAL_CONSUMPTION",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Orden de triaje: HIGH=3, MEDIUM=2, LOW=1
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }
}

/// Estado de revisión: PENDING -> REVIEWED -> RESOLVED
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
}

impl AlertStatus {
    /// Siguiente estado permitido, `None` si ya está resuelta
    pub fn next(self) -> Option<AlertStatus> {
        match self {
            AlertStatus::Pending => Some(AlertStatus::Reviewed),
            AlertStatus::Reviewed => Some(AlertStatus::Resolved),
            AlertStatus::Resolved => None,
        }
    }

    /// Solo se avanza un paso cada vez, nunca hacia atrás
    pub fn can_transition_to(self, target: AlertStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Pending => "PENDING",
            AlertStatus::Reviewed => "REVIEWED",
            AlertStatus::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identidad estable de una alerta entre análisis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertKey {
    pub record_id: EntityId,
    pub alert_type: AlertType,
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.record_id, self.alert_type)
    }
}

/// Alerta de mal uso detectada sobre un registro
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MisuseAlert {
    pub id: String,
    pub vehicle_id: EntityId,
    pub vehicle_plate: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    #[serde(with = "iso_datetime")]
    pub date: NaiveDateTime,
    pub details: String,
    pub status: AlertStatus,
    pub record_id: EntityId,
}

impl MisuseAlert {
    pub fn new(alert_type: AlertType, vehicle: &Vehicle, record: &FuelRecord, details: String) -> Self {
        Self {
            id: format!("ALERT-{}-{}", record.id, alert_type.id_suffix()),
            vehicle_id: vehicle.id.clone(),
            vehicle_plate: vehicle.display_plate(),
            alert_type,
            severity: alert_type.severity(),
            date: record.date,
            details,
            status: AlertStatus::Pending,
            record_id: record.id.clone(),
        }
    }

    pub fn key(&self) -> AlertKey {
        AlertKey {
            record_id: self.record_id.clone(),
            alert_type: self.alert_type,
        }
    }
}

/// Contadores mostrados junto a la lista de alertas
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub total: usize,
    pub pending: usize,
    pub reviewed: usize,
    pub resolved: usize,
    pub high: usize,
}

impl AlertStats {
    pub fn from_alerts(alerts: &[MisuseAlert]) -> Self {
        alerts.iter().fold(AlertStats::default(), |mut stats, alert| {
            stats.total += 1;
            match alert.status {
                AlertStatus::Pending => stats.pending += 1,
                AlertStatus::Reviewed => stats.reviewed += 1,
                AlertStatus::Resolved => stats.resolved += 1,
            }
            if alert.severity == Severity::High {
                stats.high += 1;
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_one_step() {
        assert!(AlertStatus::Pending.can_transition_to(AlertStatus::Reviewed));
        assert!(AlertStatus::Reviewed.can_transition_to(AlertStatus::Resolved));

        assert!(!AlertStatus::Pending.can_transition_to(AlertStatus::Resolved));
        assert!(!AlertStatus::Reviewed.can_transition_to(AlertStatus::Pending));
        assert!(!AlertStatus::Resolved.can_transition_to(AlertStatus::Reviewed));
        assert!(!AlertStatus::Pending.can_transition_to(AlertStatus::Pending));
        assert_eq!(AlertStatus::Resolved.next(), None);
    }

    #[test]
    fn test_fixed_severities() {
        assert_eq!(AlertType::ExcessiveRefueling.severity(), Severity::High);
        assert_eq!(AlertType::SuspiciousMileage.severity(), Severity::High);
        assert_eq!(AlertType::UnusualQuantity.severity(), Severity::Medium);
        assert_eq!(AlertType::AbnormalConsumption.severity(), Severity::Medium);
        assert!(Severity::High.rank() > Severity::Medium.rank());
        assert!(Severity::Medium.rank() > Severity::Low.rank());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&AlertType::ExcessiveRefueling).unwrap(),
            "\"EXCESSIVE_REFUELING\""
        );
        let status: AlertStatus = serde_json::from_str("\"REVIEWED\"").unwrap();
        assert_eq!(status, AlertStatus::Reviewed);
        let key = AlertKey { record_id: EntityId::Number(12), alert_type: AlertType::UnusualQuantity };
        assert_eq!(key.to_string(), "12:UNUSUAL_QUANTITY");
    }
}
