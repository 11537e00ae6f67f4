//! Day-of-week footfall forecasting
//!
//! Forecasts are pure given the random source, so a seeded `StdRng` gives
//! a reproducible series.

use branch_assistant_config::BaselineConfig;
use branch_assistant_core::{BranchDirectory, FootfallDay};
use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;

use crate::derived::branch_totals;

/// Traffic multiplier per weekday, Sunday first
const WEEKDAY_MULTIPLIERS: [f64; 7] = [0.8, 1.2, 1.1, 1.15, 1.1, 1.0, 0.85];

pub fn weekday_multiplier(date: NaiveDate) -> f64 {
    WEEKDAY_MULTIPLIERS[date.weekday().num_days_from_sunday() as usize]
}

#[derive(Debug, Clone)]
pub struct Forecaster {
    base_daily: f64,
    jitter: f64,
    default_split: Vec<f64>,
    directory: BranchDirectory,
}

impl Forecaster {
    pub fn new(baselines: &BaselineConfig, directory: BranchDirectory) -> Self {
        Self {
            base_daily: baselines.forecast_base_daily,
            jitter: baselines.forecast_jitter.clamp(0.0, 0.99),
            default_split: baselines.default_split.clone(),
            directory,
        }
    }

    /// First day to forecast: the day after the last dated history entry,
    /// else the day after `today`
    pub fn next_start(history: &[FootfallDay], today: NaiveDate) -> NaiveDate {
        history
            .iter()
            .rev()
            .find_map(FootfallDay::parsed_date)
            .unwrap_or(today)
            + Duration::days(1)
    }

    /// Forecast `days` days starting at `start`.
    ///
    /// Each day is the historical daily average (or the configured base) times
    /// the weekday multiplier and a jitter draw, split across branches by their
    /// historical shares. Branch counts always sum to the day total.
    pub fn forecast<R: Rng + ?Sized>(
        &self,
        history: &[FootfallDay],
        start: NaiveDate,
        days: usize,
        rng: &mut R,
    ) -> Vec<FootfallDay> {
        let historical: Vec<&FootfallDay> = history.iter().filter(|d| !d.predicted).collect();
        let base = if historical.is_empty() {
            self.base_daily
        } else {
            historical.iter().map(|d| d.total as f64).sum::<f64>() / historical.len() as f64
        };
        let split = self.branch_split(history);

        (0..days)
            .map(|offset| {
                let date = start + Duration::days(offset as i64);
                let noise = if self.jitter > 0.0 {
                    rng.gen_range(-self.jitter..=self.jitter)
                } else {
                    0.0
                };
                let total = (base * weekday_multiplier(date) * (1.0 + noise)).round().max(0.0) as u64;
                let counts = allocate(total, &split);
                let mut day = FootfallDay::new(date.format("%Y-%m-%d").to_string(), counts);
                day.total = total;
                day.as_predicted()
            })
            .collect()
    }

    /// Branch keys with their traffic shares
    fn branch_split(&self, history: &[FootfallDay]) -> Vec<(String, f64)> {
        let totals = branch_totals(history, &self.directory);
        let sum = totals.iter().fold(0u64, |sum, t| sum.saturating_add(t.visitors));
        if sum > 0 {
            return totals
                .into_iter()
                .map(|t| (t.key, t.visitors as f64 / sum as f64))
                .collect();
        }

        let weight_sum: f64 = self.default_split.iter().sum();
        self.directory
            .profiles()
            .iter()
            .enumerate()
            .map(|(i, profile)| {
                let weight = self.default_split.get(i).copied().unwrap_or(0.0);
                let share = if weight_sum > 0.0 { weight / weight_sum } else { 0.0 };
                (profile.key.clone(), share)
            })
            .collect()
    }
}

/// Round each share of `total`; the last branch takes the remainder
fn allocate(total: u64, split: &[(String, f64)]) -> Vec<(String, u64)> {
    let mut remaining = total;
    let mut counts = Vec::with_capacity(split.len());
    for (i, (key, share)) in split.iter().enumerate() {
        let count = if i + 1 == split.len() {
            remaining
        } else {
            ((total as f64 * share).round() as u64).min(remaining)
        };
        remaining -= count;
        counts.push((key.clone(), count));
    }
    counts
}
