//! Fechas de los registros de combustible
//!
//! La API de flota envía fechas ISO-8601, a veces solo la fecha y a veces
//! fecha y hora. Internamente todo se maneja como `NaiveDateTime`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Parsear la fecha de un registro (`2024-03-01`, RFC 3339 o fecha-hora local)
pub fn parse_record_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    // Con offset explícito se normaliza a UTC
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Días (fraccionarios) transcurridos entre dos registros
pub fn days_between(earlier: &NaiveDateTime, later: &NaiveDateTime) -> f64 {
    (*later - *earlier).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Formato de salida: solo fecha si es medianoche, fecha-hora en otro caso
pub fn format_record_date(value: &NaiveDateTime) -> String {
    if value.hour() == 0 && value.minute() == 0 && value.second() == 0 && value.nanosecond() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Serializadores serde para `NaiveDateTime` con el formato de `format_record_date`
pub mod iso_datetime {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_record_date(value))
    }

    pub fn serialize_option<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }
}
