//! Reporting date ranges

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar days sent as `startDate`/`endDate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `days` before `end` up to `end`
    pub fn trailing_days(end: NaiveDate, days: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }

    /// Trailing window ending today (UTC)
    pub fn trailing_days_from_today(days: u32) -> Self {
        Self::trailing_days(Utc::now().date_naive(), days)
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    /// Query pairs for the analytics endpoints
    pub fn query(&self) -> [(&'static str, String); 2] {
        [("startDate", self.start_param()), ("endDate", self.end_param())]
    }
}
