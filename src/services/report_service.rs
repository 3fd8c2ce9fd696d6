//! Servicio de reportes de consumo
//!
//! Agregados de solo lectura sobre los registros agrupados: reporte mensual de
//! un año, reporte por vehículo y resumen de flota del mes en curso. Solo se
//! consideran registros de vehículos conocidos.

use chrono::{Datelike, Months, NaiveDate};

use crate::models::analytics::{
    FillPoint, FleetFuelSummary, MonthlyAggregate, MonthlyReport, UsageTrend, VehicleAggregate,
    YearSummary,
};
use crate::models::vehicle::VehicleSummary;
use crate::models::{AnalysisSnapshot, EntityId, FuelRecord};
use crate::services::grouping_service::GroupedRecords;
use crate::utils::errors::{not_found_error, AppResult};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Cantidad de cargas incluidas en `recentFills`
pub const RECENT_FILLS_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    liters: f64,
    cost: f64,
    count: usize,
}

impl Totals {
    fn add(&mut self, record: &FuelRecord) {
        self.liters += record.quantity;
        self.cost += record.cost;
        self.count += 1;
    }

    fn price_per_liter(&self) -> Option<f64> {
        ratio(self.cost, self.liters)
    }
}

/// Cociente protegido: `None` si el denominador es cero
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// Reporte mensual de un año; meses sin registros se omiten.
/// El cambio se calcula en orden de calendario y los meses se devuelven del
/// más reciente al más antiguo.
pub fn monthly_report(grouped: &GroupedRecords<'_>, year: i32) -> MonthlyReport {
    let mut buckets = [Totals::default(); 12];

    for (_, record) in grouped.records() {
        if record.date.year() == year {
            buckets[record.date.month0() as usize].add(record);
        }
    }

    let mut months = Vec::new();
    let mut summary = Totals::default();
    let mut previous_liters: Option<f64> = None;

    for (index, totals) in buckets.iter().enumerate() {
        if totals.count == 0 {
            continue;
        }

        let change_percent = previous_liters
            .and_then(|previous| ratio(totals.liters - previous, previous))
            .map(|change| change * 100.0);

        months.push(MonthlyAggregate {
            year,
            month: index as u32 + 1,
            month_name: MONTH_NAMES[index].to_string(),
            total_liters: totals.liters,
            total_cost: totals.cost,
            avg_price_per_liter: totals.price_per_liter(),
            record_count: totals.count,
            change_percent,
        });

        summary.liters += totals.liters;
        summary.cost += totals.cost;
        summary.count += totals.count;
        previous_liters = Some(totals.liters);
    }
    months.reverse();

    log::debug!("📊 Reporte mensual {}: {} meses con registros", year, months.len());

    MonthlyReport {
        year,
        months,
        summary: YearSummary {
            total_liters: summary.liters,
            total_cost: summary.cost,
            avg_price_per_liter: summary.price_per_liter(),
            record_count: summary.count,
        },
    }
}

/// Reporte de un vehículo; 404 si el vehículo no está registrado
pub fn vehicle_report(
    snapshot: &AnalysisSnapshot,
    grouped: &GroupedRecords<'_>,
    vehicle_id: &EntityId,
) -> AppResult<VehicleAggregate> {
    let vehicle = snapshot
        .vehicle(vehicle_id)
        .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

    let records: &[&FuelRecord] = grouped
        .group(vehicle_id)
        .map(|group| group.records.as_slice())
        .unwrap_or(&[]);

    let mut totals = Totals::default();
    for record in records {
        totals.add(record);
    }

    let distance = mileage_span(records);
    let avg_efficiency_km_per_liter = match distance {
        Some(distance) if records.len() >= 2 => ratio(distance, totals.liters),
        _ => None,
    };
    let liters_per_100_km = match distance {
        Some(distance) if records.len() >= 2 => ratio(totals.liters * 100.0, distance),
        _ => None,
    };

    let recent_fills = records
        .iter()
        .skip(records.len().saturating_sub(RECENT_FILLS_LIMIT))
        .map(|record| FillPoint {
            date: record.date,
            liters: record.quantity,
            cost: record.cost,
            mileage: record.mileage,
        })
        .collect();

    Ok(VehicleAggregate {
        vehicle: VehicleSummary::from(vehicle),
        total_liters: totals.liters,
        total_cost: totals.cost,
        avg_cost_per_liter: totals.price_per_liter(),
        record_count: totals.count,
        first_fill: records.first().map(|record| record.date),
        last_fill: records.last().map(|record| record.date),
        total_distance_km: distance,
        avg_efficiency_km_per_liter,
        liters_per_100_km,
        recent_fills,
    })
}

/// Distancia recorrida: odómetro máximo menos mínimo
fn mileage_span(records: &[&FuelRecord]) -> Option<f64> {
    let mut mileages = records.iter().map(|record| record.mileage);
    let first = mileages.next()?;
    let (min, max) = mileages.fold((first, first), |(min, max), m| (min.min(m), max.max(m)));
    Some(max - min)
}

/// Resumen de flota para el mes calendario de `reference`
pub fn fleet_summary(grouped: &GroupedRecords<'_>, reference: NaiveDate) -> FleetFuelSummary {
    let current = month_start(reference);
    let previous = current.checked_sub_months(Months::new(1)).unwrap_or(current);

    let mut this_month = Totals::default();
    let mut previous_liters = 0.0;
    let mut highest: Option<(f64, String)> = None;

    for group in &grouped.groups {
        let mut vehicle_liters = 0.0;
        let mut has_records = false;

        for record in &group.records {
            let month = month_start(record.date.date());
            if month == current {
                this_month.add(record);
                vehicle_liters += record.quantity;
                has_records = true;
            } else if month == previous {
                previous_liters += record.quantity;
            }
        }

        // Empates: gana el primer vehículo
        let is_higher = match &highest {
            Some((liters, _)) => vehicle_liters > *liters,
            None => true,
        };
        if has_records && is_higher {
            highest = Some((vehicle_liters, group.vehicle.display_plate()));
        }
    }

    let fuel_usage_trend = if this_month.liters > previous_liters {
        UsageTrend::Up
    } else if this_month.liters < previous_liters {
        UsageTrend::Down
    } else {
        UsageTrend::Stable
    };

    FleetFuelSummary {
        month: current.format("%Y-%m").to_string(),
        total_cost_this_month: this_month.cost,
        total_liters_this_month: this_month.liters,
        total_liters_previous_month: previous_liters,
        highest_fuel_consuming_vehicle: highest.map(|(_, plate)| plate),
        fuel_usage_trend,
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
