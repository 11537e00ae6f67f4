//! Assistant behaviour and baseline figures

use serde::{Deserialize, Serialize};

/// Assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Bank name used in greetings and help text
    #[serde(default = "default_bank_name")]
    pub bank_name: String,

    /// First bot message of every transcript
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Answer from local templates when the language-model service fails
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,

    /// Number of trailing footfall points used for trend direction
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// Days covered by a forecast
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,

    /// Fixed forecast seed; unset draws a fresh seed per reply
    #[serde(default)]
    pub forecast_seed: Option<u64>,

    /// Quick suggestions offered before the first message
    #[serde(default = "default_suggestions")]
    pub suggestions: Vec<String>,
}

fn default_bank_name() -> String {
    "ABC Bank".to_string()
}
fn default_welcome_message() -> String {
    "Welcome to ABC Bank Analytics Assistant! I'm here to help you navigate the dashboard, \
     understand analytics, and answer questions about branch performance, customer trends, \
     and operational insights. How can I assist you today?"
        .to_string()
}
fn default_true() -> bool {
    true
}
fn default_trend_window() -> usize {
    5
}
fn default_forecast_days() -> usize {
    7
}
fn default_suggestions() -> Vec<String> {
    [
        "What is the total footfall for the past 7 days?",
        "Which branch has the highest footfall?",
        "Compare branch performance",
        "What is the revenue breakdown by branch?",
        "Show customer satisfaction scores",
        "Predict footfall for next week",
        "How is staff efficiency across branches?",
        "Give me a dashboard overview",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            bank_name: default_bank_name(),
            welcome_message: default_welcome_message(),
            fallback_enabled: true,
            trend_window: default_trend_window(),
            forecast_days: default_forecast_days(),
            forecast_seed: None,
            suggestions: default_suggestions(),
        }
    }
}

/// Placeholder figures the dashboard shows where the backend reports nothing.
///
/// Replies that use them label the result as an estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Previous-period satisfaction score compared against
    #[serde(default = "default_satisfaction_baseline")]
    pub satisfaction_baseline: f64,

    /// Revenue above which a branch counts as high-revenue
    #[serde(default = "default_high_revenue_threshold")]
    pub high_revenue_threshold: f64,

    /// Estimated growth % for high-revenue branches
    #[serde(default = "default_revenue_growth_high")]
    pub revenue_growth_high: f64,

    /// Estimated growth % for the rest
    #[serde(default = "default_revenue_growth_low")]
    pub revenue_growth_low: f64,

    /// Daily total forecast when there is no history
    #[serde(default = "default_forecast_base_daily")]
    pub forecast_base_daily: f64,

    /// Relative forecast jitter (0.05 = ±5%)
    #[serde(default = "default_forecast_jitter")]
    pub forecast_jitter: f64,

    /// Branch split used when history has no per-branch counts
    #[serde(default = "default_split")]
    pub default_split: Vec<f64>,

    /// Review count assumed for rating distributions
    #[serde(default = "default_review_count")]
    pub review_count: u32,
}

fn default_satisfaction_baseline() -> f64 {
    3.5
}
fn default_high_revenue_threshold() -> f64 {
    2_000_000.0
}
fn default_revenue_growth_high() -> f64 {
    12.5
}
fn default_revenue_growth_low() -> f64 {
    8.3
}
fn default_forecast_base_daily() -> f64 {
    38.0
}
fn default_forecast_jitter() -> f64 {
    0.05
}
fn default_split() -> Vec<f64> {
    vec![0.40, 0.35, 0.25]
}
fn default_review_count() -> u32 {
    100
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            satisfaction_baseline: default_satisfaction_baseline(),
            high_revenue_threshold: default_high_revenue_threshold(),
            revenue_growth_high: default_revenue_growth_high(),
            revenue_growth_low: default_revenue_growth_low(),
            forecast_base_daily: default_forecast_base_daily(),
            forecast_jitter: default_forecast_jitter(),
            default_split: default_split(),
            review_count: default_review_count(),
        }
    }
}

impl BaselineConfig {
    /// Estimated growth % for a branch with the given revenue
    pub fn estimated_growth(&self, revenue: f64) -> f64 {
        if revenue > self.high_revenue_threshold {
            self.revenue_growth_high
        } else {
            self.revenue_growth_low
        }
    }
}
