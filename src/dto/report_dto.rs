use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::utils::errors::{bad_request_error, AppResult};

/// Query de `GET /api/fuel/reports/monthly`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct MonthlyReportQuery {
    #[validate(range(min = 2000, max = 2100))]
    pub year: Option<i32>,
}

/// Query de `GET /api/fuel/summary`
#[derive(Debug, Default, Deserialize)]
pub struct FleetSummaryQuery {
    /// `YYYY-MM-DD`; por defecto hoy (UTC)
    pub date: Option<String>,
}

impl FleetSummaryQuery {
    pub fn reference_date(&self) -> AppResult<NaiveDate> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(Utc::now().date_naive()),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| bad_request_error(&format!("Invalid date '{}', expected YYYY-MM-DD", raw))),
        }
    }
}
