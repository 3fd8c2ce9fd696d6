//! Ordenamiento de alertas para triaje
//!
//! Severidad descendente y luego fecha descendente (más reciente primero).
//! `sort_by` es estable, así que los empates conservan el orden de emisión
//! del detector.

use std::cmp::Ordering;

use crate::models::alert::MisuseAlert;

pub fn rank_alerts(mut alerts: Vec<MisuseAlert>) -> Vec<MisuseAlert> {
    alerts.sort_by(compare_for_triage);
    alerts
}

fn compare_for_triage(a: &MisuseAlert, b: &MisuseAlert) -> Ordering {
    b.severity
        .rank()
        .cmp(&a.severity.rank())
        .then_with(|| b.date.cmp(&a.date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alert::{AlertStatus, AlertType, Severity};
    use crate::models::EntityId;
    use crate::utils::dates::parse_record_date;

    fn alert(record_id: i64, alert_type: AlertType, date: &str) -> MisuseAlert {
        MisuseAlert {
            id: format!("ALERT-{}-{}", record_id, alert_type.id_suffix()),
            vehicle_id: EntityId::Number(1),
            vehicle_plate: "CAB-0001".to_string(),
            alert_type,
            severity: alert_type.severity(),
            date: parse_record_date(date).unwrap(),
            details: String::new(),
            status: AlertStatus::Pending,
            record_id: EntityId::Number(record_id),
        }
    }

    #[test]
    fn test_severity_then_most_recent_first() {
        let ranked = rank_alerts(vec![
            alert(1, AlertType::SuspiciousMileage, "2024-01-01"),
            alert(2, AlertType::UnusualQuantity, "2024-06-01"),
            alert(3, AlertType::ExcessiveRefueling, "2024-03-01"),
        ]);

        let order: Vec<(Severity, String)> = ranked
            .iter()
            .map(|a| (a.severity, a.date.format("%Y-%m-%d").to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Severity::High, "2024-03-01".to_string()),
                (Severity::High, "2024-01-01".to_string()),
                (Severity::Medium, "2024-06-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_ties_keep_emission_order() {
        let ranked = rank_alerts(vec![
            alert(5, AlertType::UnusualQuantity, "2024-02-01"),
            alert(5, AlertType::AbnormalConsumption, "2024-02-01"),
            alert(4, AlertType::UnusualQuantity, "2024-02-01"),
        ]);

        let ids: Vec<&str> = ranked.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ALERT-5-QUANTITY", "ALERT-5-CONSUMPTION", "ALERT-4-QUANTITY"]);
    }
}
