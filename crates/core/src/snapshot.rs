//! Dashboard snapshot records
//!
//! Shapes of the analytics backend responses. Every metric is optional on
//! the wire; a missing key means "no data for this aggregate", never an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One day of footfall, per branch and in total.
///
/// The wire form is a flat object such as
/// `{"date": "2025-01-01", "siruseri": 40, "tnagar": 35, "navalur": 25, "total": 100}`.
/// Any other numeric key is taken as a branch count; non-numeric extras are
/// dropped. A missing `total` is the sum of the branch counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFootfallDay", into = "RawFootfallDay")]
pub struct FootfallDay {
    /// Day in `YYYY-MM-DD` form
    pub date: String,
    /// Visitors per branch key
    pub counts: BTreeMap<String, u64>,
    /// Visitors across all branches
    pub total: u64,
    /// Whether this day is a forecast rather than history
    pub predicted: bool,
}

impl FootfallDay {
    /// Build a day from branch counts; the total is their sum
    pub fn new<I, K>(date: impl Into<String>, counts: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let counts: BTreeMap<String, u64> = counts.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let total = counts.values().fold(0u64, |sum, v| sum.saturating_add(*v));
        Self {
            date: date.into(),
            counts,
            total,
            predicted: false,
        }
    }

    /// Visitors for one branch key (0 when absent)
    pub fn count(&self, branch: &str) -> u64 {
        self.counts.get(branch).copied().unwrap_or(0)
    }

    /// Parsed calendar date, if the backend sent a valid one
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn as_predicted(mut self) -> Self {
        self.predicted = true;
        self
    }
}

#[derive(Serialize, Deserialize)]
struct RawFootfallDay {
    #[serde(default)]
    date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    predicted: bool,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<RawFootfallDay> for FootfallDay {
    fn from(raw: RawFootfallDay) -> Self {
        let counts: BTreeMap<String, u64> = raw
            .rest
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| (key, v.round() as u64))
            })
            .collect();

        let total = match raw.total {
            Some(total) if total.is_finite() && total >= 0.0 => total.round() as u64,
            _ => counts.values().fold(0u64, |sum, v| sum.saturating_add(*v)),
        };

        Self {
            date: raw.date,
            counts,
            total,
            predicted: raw.predicted,
        }
    }
}

impl From<FootfallDay> for RawFootfallDay {
    fn from(day: FootfallDay) -> Self {
        Self {
            date: day.date,
            total: Some(day.total as f64),
            predicted: day.predicted,
            rest: day
                .counts
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
        }
    }
}

/// Aggregated metrics for one branch over the requested range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchComparison {
    /// Branch name (mapped to its display name on receipt)
    #[serde(default)]
    pub branch_name: String,
    pub total_footfall: Option<f64>,
    pub total_revenue: Option<f64>,
    /// Average rating on a 1..5 scale
    pub customer_satisfaction: Option<f64>,
    /// Service efficiency percentage
    pub service_efficiency: Option<f64>,
}

/// Live server figures shown on the dashboard header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeStats {
    pub server_health: Option<Value>,
    pub active_connections: Option<u64>,
    pub last_update: Option<Value>,
    /// Any other keys the backend reports
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RealTimeStats {
    /// True when none of the known fields are present
    pub fn is_empty(&self) -> bool {
        self.server_health.is_none() && self.active_connections.is_none() && self.last_update.is_none()
    }

    pub fn server_health_text(&self) -> Option<String> {
        self.server_health.as_ref().map(value_text)
    }

    pub fn last_update_text(&self) -> Option<String> {
        self.last_update.as_ref().map(value_text)
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Bundle of analytics data fetched for one response synthesis.
///
/// Each field is `None` when its fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(rename = "footfallData", default, skip_serializing_if = "Option::is_none")]
    pub footfall: Option<Vec<FootfallDay>>,
    #[serde(rename = "branchData", default, skip_serializing_if = "Option::is_none")]
    pub branch_comparison: Option<Vec<BranchComparison>>,
    #[serde(rename = "realTimeStats", default, skip_serializing_if = "Option::is_none")]
    pub real_time_stats: Option<RealTimeStats>,
}

impl DashboardSnapshot {
    /// Footfall series, or `None` when absent or empty
    pub fn footfall_series(&self) -> Option<&[FootfallDay]> {
        self.footfall.as_deref().filter(|s| !s.is_empty())
    }

    /// Branch comparison records, or `None` when absent or empty
    pub fn branches(&self) -> Option<&[BranchComparison]> {
        self.branch_comparison.as_deref().filter(|b| !b.is_empty())
    }

    /// Real-time stats, or `None` when absent or carrying no known field
    pub fn stats(&self) -> Option<&RealTimeStats> {
        self.real_time_stats.as_ref().filter(|s| !s.is_empty())
    }

    pub fn has_any_data(&self) -> bool {
        self.footfall_series().is_some() || self.branches().is_some() || self.stats().is_some()
    }
}
