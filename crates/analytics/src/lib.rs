//! Analytics data for the assistant
//!
//! Features:
//! - Data Fetch Layer: concurrent snapshot retrieval from the analytics REST backend
//! - Derived dashboard metrics (shares, peaks, trends, rating distributions)
//! - Abbreviated currency and count formatting
//! - Seeded day-of-week footfall forecasting

pub mod client;
pub mod derived;
pub mod fetch;
pub mod forecast;
pub mod format;
pub mod range;

pub use client::{AnalyticsSource, HttpAnalyticsClient};
pub use derived::{
    average_daily, branch_totals, classify_trend, efficiency_profile, footfall_summary, peak_day,
    radar_scores, satisfaction_distribution, share_percent, total_visitors, BranchTotal,
    EfficiencyProfile, EngagementLevel, FootfallSummary, RadarScores, RatingDistribution, Trend,
    TrendDirection,
};
pub use fetch::fetch_snapshot;
pub use forecast::Forecaster;
pub use format::{format_count, format_currency, format_signed};
pub use range::DateRange;

use thiserror::Error;

/// Analytics errors
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for AnalyticsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AnalyticsError::Decode(err.to_string())
        } else {
            AnalyticsError::Network(err.to_string())
        }
    }
}
