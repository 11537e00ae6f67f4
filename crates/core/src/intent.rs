//! Chat intents

use serde::{Deserialize, Serialize};

/// Classified purpose of a user's chat message.
///
/// Derived purely from the input text; carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Visitor counts and trends
    Footfall,
    /// Branch-by-branch performance
    BranchComparison,
    /// Revenue and earnings
    Revenue,
    /// Customer satisfaction scores
    Satisfaction,
    /// Forecasts
    Prediction,
    /// Staff scheduling and utilization
    Staff,
    /// Live dashboard status
    DashboardOverview,
    /// Usage help
    Help,
    /// Nothing matched
    Default,
}

impl Intent {
    pub const ALL: [Intent; 9] = [
        Intent::Footfall,
        Intent::BranchComparison,
        Intent::Revenue,
        Intent::Satisfaction,
        Intent::Prediction,
        Intent::Staff,
        Intent::DashboardOverview,
        Intent::Help,
        Intent::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Footfall => "footfall",
            Intent::BranchComparison => "branch_comparison",
            Intent::Revenue => "revenue",
            Intent::Satisfaction => "satisfaction",
            Intent::Prediction => "prediction",
            Intent::Staff => "staff",
            Intent::DashboardOverview => "dashboard_overview",
            Intent::Help => "help",
            Intent::Default => "default",
        }
    }

    /// Whether any data-driven template exists for this intent
    pub fn uses_live_data(&self) -> bool {
        !matches!(self, Intent::Help | Intent::Default)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
