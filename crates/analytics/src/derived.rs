//! Derived dashboard metrics
//!
//! Pure aggregations over a fetched snapshot. Functions that would divide by
//! zero or scan an empty series return `None` instead.

use std::collections::BTreeSet;

use branch_assistant_core::{BranchComparison, BranchDirectory, FootfallDay};
use serde::{Deserialize, Serialize};

/// Visitors of one branch over a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTotal {
    /// Branch key as it appears in footfall records
    pub key: String,
    pub visitors: u64,
}

/// Per-branch visitor totals, in directory order
pub fn branch_totals(series: &[FootfallDay], directory: &BranchDirectory) -> Vec<BranchTotal> {
    let keys: BTreeSet<String> = series.iter().flat_map(|day| day.counts.keys().cloned()).collect();
    directory
        .ordered_keys(keys.iter())
        .into_iter()
        .map(|key| {
            let visitors = series
                .iter()
                .fold(0u64, |sum, day| sum.saturating_add(day.count(&key)));
            BranchTotal { key, visitors }
        })
        .collect()
}

/// Sum of daily totals, saturating at `u64::MAX`
pub fn total_visitors(series: &[FootfallDay]) -> u64 {
    series.iter().fold(0u64, |sum, day| sum.saturating_add(day.total))
}

/// Average daily visitors to one decimal
pub fn average_daily(series: &[FootfallDay]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let average = total_visitors(series) as f64 / series.len() as f64;
    Some((average * 10.0).round() / 10.0)
}

/// Busiest day; the first one wins a tie
pub fn peak_day(series: &[FootfallDay]) -> Option<&FootfallDay> {
    let mut peak = series.first()?;
    for day in &series[1..] {
        if day.total > peak.total {
            peak = day;
        }
    }
    Some(peak)
}

/// `round(part / total * 100)`, or `None` for a non-positive total
pub fn share_percent(part: f64, total: f64) -> Option<u32> {
    if !(total.is_finite() && total > 0.0) || !part.is_finite() {
        return None;
    }
    Some((part / total * 100.0).round().max(0.0) as u32)
}

/// Direction of recent footfall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend over a trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Average change per day
    pub delta_per_day: f64,
    /// Points actually used
    pub points: usize,
}

/// Classify the last `window` values.
///
/// The delta is `(last - first) / (n - 1)`; above +5 is increasing, below -5
/// decreasing. Fewer than two points is stable with a zero delta.
pub fn classify_trend(values: &[f64], window: usize) -> Trend {
    let start = values.len().saturating_sub(window.max(2));
    let recent = &values[start..];
    let n = recent.len();

    let delta_per_day = match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if n >= 2 => (last - first) / (n - 1) as f64,
        _ => 0.0,
    };
    let direction = if delta_per_day > 5.0 {
        TrendDirection::Increasing
    } else if delta_per_day < -5.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    Trend {
        direction,
        delta_per_day,
        points: n,
    }
}

/// Overall customer engagement for a visitor total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementLevel {
    Strong,
    Moderate,
    Light,
}

impl EngagementLevel {
    pub fn from_total(total: u64) -> Self {
        if total > 200 {
            EngagementLevel::Strong
        } else if total > 100 {
            EngagementLevel::Moderate
        } else {
            EngagementLevel::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementLevel::Strong => "Strong",
            EngagementLevel::Moderate => "Moderate",
            EngagementLevel::Light => "Light",
        }
    }
}

/// Footfall chart summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootfallSummary {
    /// Historical plus predicted visitors
    pub total_visitors: u64,
    pub historical_total: u64,
    pub predicted_total: u64,
    /// Rounded average over historical days
    pub daily_average: u64,
    /// Highest daily total, predictions included
    pub peak: u64,
    /// Last vs first historical day, % to one decimal
    pub growth_rate: f64,
}

pub fn footfall_summary(series: &[FootfallDay]) -> FootfallSummary {
    let historical: Vec<u64> = series.iter().filter(|d| !d.predicted).map(|d| d.total).collect();
    let historical_total = historical.iter().fold(0u64, |sum, v| sum.saturating_add(*v));
    let predicted_total = series
        .iter()
        .filter(|d| d.predicted)
        .fold(0u64, |sum, d| sum.saturating_add(d.total));

    let daily_average = if historical.is_empty() {
        0
    } else {
        (historical_total as f64 / historical.len() as f64).round() as u64
    };

    let first = historical.first().copied().unwrap_or(0);
    let last = historical.last().copied().unwrap_or(0);
    let growth_rate = if first > 0 {
        ((last as f64 - first as f64) / first as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    FootfallSummary {
        total_visitors: historical_total.saturating_add(predicted_total),
        historical_total,
        predicted_total,
        daily_average,
        peak: series.iter().map(|d| d.total).max().unwrap_or(0),
        growth_rate,
    }
}

/// Estimated star-rating breakdown for an average score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingDistribution {
    /// Percent of reviews per rating, five stars first
    pub percentages: [f64; 5],
    /// Review counts per rating, five stars first
    pub counts: [u32; 5],
}

impl RatingDistribution {
    /// Percent for a star rating (1..=5)
    pub fn percentage(&self, stars: u8) -> Option<f64> {
        stars
            .checked_sub(1)
            .filter(|i| *i < 5)
            .map(|i| self.percentages[4 - i as usize])
    }
}

pub fn satisfaction_distribution(score: f64, reviews: u32) -> RatingDistribution {
    let percentages = [
        (25.0_f64).max((score - 3.0) * 22.5),
        (20.0_f64).max(45.0 - (score - 4.0).abs() * 8.0),
        (5.0_f64).max(25.0 - (score - 2.5) * 6.0),
        (2.0_f64).max(8.0 - score * 1.5),
        (1.0_f64).max(5.0 - score * 1.2),
    ]
    .map(|p| p.min(100.0));
    let counts = percentages.map(|p| (p / 100.0 * f64::from(reviews)).round() as u32);

    RatingDistribution { percentages, counts }
}

/// Operational figures estimated from a service efficiency percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyProfile {
    pub wait_time_minutes: u32,
    /// Transaction speed, %
    pub transaction_speed: f64,
    /// Staff utilization, %
    pub staff_utilization: f64,
}

pub fn efficiency_profile(efficiency: f64) -> EfficiencyProfile {
    let wait = (10.0 - efficiency / 10.0).round().max(1.0);
    EfficiencyProfile {
        wait_time_minutes: wait as u32,
        transaction_speed: (efficiency + 20.0).min(98.0),
        staff_utilization: (efficiency + 15.0).min(95.0),
    }
}

/// Branch metrics scaled to 0..=100 for comparison charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarScores {
    pub footfall: u32,
    pub satisfaction: u32,
    pub efficiency: u32,
    pub revenue: u32,
}

pub fn radar_scores(branch: &BranchComparison) -> RadarScores {
    let scale = |value: f64| value.round().clamp(0.0, 100.0) as u32;
    RadarScores {
        footfall: scale(branch.total_footfall.unwrap_or(0.0) / 600.0 * 100.0),
        satisfaction: scale(branch.customer_satisfaction.unwrap_or(0.0) * 20.0),
        efficiency: scale(branch.service_efficiency.unwrap_or(0.0)),
        revenue: scale(branch.total_revenue.unwrap_or(0.0) / 500_000_000.0 * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week() -> Vec<FootfallDay> {
        (1..=7)
            .map(|d| {
                FootfallDay::new(
                    format!("2025-01-0{}", d),
                    [("siruseri", 40), ("tnagar", 35), ("navalur", 25)],
                )
            })
            .collect()
    }

    #[test]
    fn test_totals_saturate_on_huge_counts() {
        let series = vec![
            FootfallDay::new("2025-01-01", [("siruseri", u64::MAX / 2 + 1)]),
            FootfallDay::new("2025-01-02", [("siruseri", u64::MAX / 2 + 1)]),
        ];
        assert_eq!(total_visitors(&series), u64::MAX);
        assert_eq!(branch_totals(&series, &BranchDirectory::default())[0].visitors, u64::MAX);
        assert_eq!(footfall_summary(&series).total_visitors, u64::MAX);
    }

    #[test]
    fn test_branch_totals_and_shares() {
        let series = week();
        let totals = branch_totals(&series, &BranchDirectory::default());
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0], BranchTotal { key: "siruseri".into(), visitors: 280 });
        assert_eq!(total_visitors(&series), 700);

        let shares: u32 = totals
            .iter()
            .filter_map(|t| share_percent(t.visitors as f64, 700.0))
            .sum();
        assert_eq!(shares, 100);
    }

    #[test]
    fn test_share_of_zero_total() {
        assert_eq!(share_percent(10.0, 0.0), None);
    }

    #[test]
    fn test_average_and_peak() {
        let mut series = week();
        series[3] = FootfallDay::new("2025-01-04", [("siruseri", 150)]);
        series[5] = FootfallDay::new("2025-01-06", [("siruseri", 150)]);
        assert_eq!(peak_day(&series).unwrap().date, "2025-01-04");
        assert_eq!(average_daily(&series), Some(114.3));
        assert!(peak_day(&[]).is_none());
        assert!(average_daily(&[]).is_none());
    }

    #[test]
    fn test_trend_increasing() {
        let trend = classify_trend(&[100.0, 100.0, 100.0, 100.0, 140.0], 5);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.delta_per_day, 10.0);
    }

    #[test]
    fn test_trend_stable_and_decreasing() {
        assert_eq!(classify_trend(&[100.0; 5], 5).direction, TrendDirection::Stable);
        let trend = classify_trend(&[300.0, 200.0, 180.0, 170.0, 160.0, 100.0], 5);
        assert_eq!(trend.points, 5);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_trend_short_series() {
        let trend = classify_trend(&[120.0], 5);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.delta_per_day, 0.0);
        assert_eq!(classify_trend(&[], 5).points, 0);
    }

    #[test]
    fn test_engagement_levels() {
        assert_eq!(EngagementLevel::from_total(700), EngagementLevel::Strong);
        assert_eq!(EngagementLevel::from_total(150), EngagementLevel::Moderate);
        assert_eq!(EngagementLevel::from_total(100), EngagementLevel::Light);
    }

    #[test]
    fn test_footfall_summary() {
        let mut series = vec![
            FootfallDay::new("2025-01-01", [("siruseri", 50)]),
            FootfallDay::new("2025-01-02", [("siruseri", 60)]),
            FootfallDay::new("2025-01-03", [("siruseri", 75)]),
        ];
        series.push(FootfallDay::new("2025-01-04", [("siruseri", 80)]).as_predicted());

        let summary = footfall_summary(&series);
        assert_eq!(summary.historical_total, 185);
        assert_eq!(summary.predicted_total, 80);
        assert_eq!(summary.total_visitors, 265);
        assert_eq!(summary.daily_average, 62);
        assert_eq!(summary.peak, 80);
        assert_eq!(summary.growth_rate, 50.0);
        assert_eq!(footfall_summary(&[]), FootfallSummary::default());
    }

    #[test]
    fn test_satisfaction_distribution() {
        let distribution = satisfaction_distribution(4.0, 200);
        assert_eq!(distribution.percentage(5), Some(25.0));
        assert_eq!(distribution.percentage(4), Some(45.0));
        assert_eq!(distribution.percentage(3), Some(16.0));
        assert_eq!(distribution.percentage(2), Some(2.0));
        assert_eq!(distribution.percentage(1), Some(1.0));
        assert_eq!(distribution.counts, [50, 90, 32, 4, 2]);
        assert_eq!(distribution.percentage(0), None);
    }

    #[test]
    fn test_efficiency_profile() {
        let profile = efficiency_profile(85.0);
        assert_eq!(profile.wait_time_minutes, 2);
        assert_eq!(profile.transaction_speed, 98.0);
        assert_eq!(profile.staff_utilization, 95.0);

        let profile = efficiency_profile(40.0);
        assert_eq!(profile.wait_time_minutes, 6);
        assert_eq!(profile.transaction_speed, 60.0);
        assert_eq!(profile.staff_utilization, 55.0);
    }

    #[test]
    fn test_radar_scores_clamped() {
        let branch = BranchComparison {
            branch_name: "New York".into(),
            total_footfall: Some(900.0),
            total_revenue: Some(250_000_000.0),
            customer_satisfaction: Some(4.2),
            service_efficiency: Some(88.0),
        };
        let scores = radar_scores(&branch);
        assert_eq!(scores.footfall, 100);
        assert_eq!(scores.satisfaction, 84);
        assert_eq!(scores.efficiency, 88);
        assert_eq!(scores.revenue, 50);
    }
}
