//! Data Fetch Layer

use branch_assistant_core::DashboardSnapshot;

use crate::client::AnalyticsSource;
use crate::range::DateRange;
use crate::AnalyticsError;

/// Fetch a fresh snapshot with the three calls in flight together.
///
/// A failing call is logged and leaves its field `None`; the others still
/// land. Nothing is retried or cached.
pub async fn fetch_snapshot<S>(source: &S, range: &DateRange) -> DashboardSnapshot
where
    S: AnalyticsSource + ?Sized,
{
    tracing::debug!(
        start = %range.start_param(),
        end = %range.end_param(),
        "Fetching dashboard snapshot"
    );

    let (footfall, branches, stats) = tokio::join!(
        source.footfall_trends(range),
        source.branch_comparison(range),
        source.real_time_stats(),
    );

    let snapshot = DashboardSnapshot {
        footfall: settle("footfall-trends", footfall),
        branch_comparison: settle("branch-comparison", branches),
        real_time_stats: settle("real-time-stats", stats),
    };

    tracing::info!(
        footfall_records = snapshot.footfall.as_ref().map(Vec::len),
        branch_records = snapshot.branch_comparison.as_ref().map(Vec::len),
        stats = snapshot.real_time_stats.is_some(),
        has_data = snapshot.has_any_data(),
        "Dashboard snapshot fetched"
    );

    snapshot
}

fn settle<T>(endpoint: &'static str, result: Result<T, AnalyticsError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(endpoint, error = %e, "Analytics fetch failed");
            metrics::counter!("analytics_fetch_failures_total", "endpoint" => endpoint).increment(1);
            None
        }
    }
}
