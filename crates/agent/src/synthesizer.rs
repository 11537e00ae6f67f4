//! Response synthesis
//!
//! Each intent has a data-driven template and a generic one. The data-driven
//! template runs when the snapshot field it needs is present and usable;
//! any aggregation problem (empty series, zero totals, missing metrics)
//! degrades to the generic text, which carries [`LIVE_DATA_NOTICE`].

use branch_assistant_analytics::{
    average_daily, branch_totals, classify_trend, efficiency_profile, format_count, format_currency,
    format_signed, peak_day, satisfaction_distribution, share_percent, total_visitors,
    EngagementLevel, Forecaster, Trend, TrendDirection,
};
use branch_assistant_config::{BaselineConfig, Settings};
use branch_assistant_core::{
    BranchComparison, BranchDirectory, DashboardSnapshot, FootfallDay, Intent, RealTimeStats,
};
use chrono::{Datelike, Utc, Weekday};
use rand::Rng;
use thiserror::Error;

/// Marker line closing every generic reply to a data question
pub const LIVE_DATA_NOTICE: &str = "⚠️ *Backend connection needed for live data*";

/// Why a data-driven template could not run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("no {0} data")]
    NoData(&'static str),

    #[error("{0} total is zero")]
    ZeroTotal(&'static str),
}

type Synthesis = Result<String, SynthesisError>;

/// Turns an intent and a snapshot into reply text
#[derive(Debug, Clone)]
pub struct ResponseSynthesizer {
    bank_name: String,
    directory: BranchDirectory,
    baselines: BaselineConfig,
    trend_window: usize,
    forecast_days: usize,
    forecaster: Forecaster,
}

impl ResponseSynthesizer {
    pub fn new(settings: &Settings) -> Self {
        let directory = settings.branch_directory();
        Self {
            bank_name: settings.assistant.bank_name.clone(),
            forecaster: Forecaster::new(&settings.baselines, directory.clone()),
            directory,
            baselines: settings.baselines.clone(),
            trend_window: settings.assistant.trend_window,
            forecast_days: settings.assistant.forecast_days,
        }
    }

    pub fn directory(&self) -> &BranchDirectory {
        &self.directory
    }

    /// Reply text for an intent. Never fails.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        intent: Intent,
        snapshot: Option<&DashboardSnapshot>,
        rng: &mut R,
    ) -> String {
        let live = match snapshot {
            Some(snapshot) => self.live(intent, snapshot, rng),
            None => Err(SynthesisError::NoData("dashboard")),
        };

        match live {
            Ok(text) => text,
            Err(e) => {
                if intent.uses_live_data() {
                    tracing::debug!(intent = %intent, reason = %e, "Using generic template");
                }
                self.generic(intent)
            }
        }
    }

    fn live<R: Rng + ?Sized>(&self, intent: Intent, snapshot: &DashboardSnapshot, rng: &mut R) -> Synthesis {
        match intent {
            Intent::Footfall => self.footfall_report(series(snapshot)?),
            Intent::BranchComparison => snapshot
                .branches()
                .ok_or(SynthesisError::NoData("branch comparison"))
                .and_then(|branches| self.branch_ranking(branches))
                .or_else(|_| self.footfall_ranking(series(snapshot)?)),
            Intent::Revenue => self.revenue_report(branches(snapshot)?),
            Intent::Satisfaction => self.satisfaction_report(branches(snapshot)?),
            Intent::Prediction => self.prediction_report(series(snapshot)?, rng),
            Intent::Staff => self.staff_report(branches(snapshot)?),
            Intent::DashboardOverview => self.dashboard_report(
                snapshot.stats().ok_or(SynthesisError::NoData("real-time stats"))?,
            ),
            Intent::Help | Intent::Default => Err(SynthesisError::NoData("static")),
        }
    }

    fn footfall_report(&self, series: &[FootfallDay]) -> Synthesis {
        let total = total_visitors(series);
        if total == 0 {
            return Err(SynthesisError::ZeroTotal("footfall"));
        }
        let average = average_daily(series).ok_or(SynthesisError::NoData("footfall"))?;
        let peak = peak_day(series).ok_or(SynthesisError::NoData("footfall"))?;
        let totals = branch_totals(series, &self.directory);
        let trend = self.trend(series);

        let mut lines = vec![
            "📊 **Footfall Report**".to_string(),
            String::new(),
            format!("Footfall summary for the past {} days:", series.len()),
            String::new(),
            format!("🎯 **Total Footfall**: **{} visitors** across all branches", format_count(total)),
        ];

        if !totals.is_empty() {
            lines.push(String::new());
            lines.push("📈 **Branch Breakdown**:".to_string());
            for branch in &totals {
                let share = share_percent(branch.visitors as f64, total as f64)
                    .ok_or(SynthesisError::ZeroTotal("footfall"))?;
                lines.push(format!(
                    "• **{}**: {} visitors ({}%)",
                    self.directory.display_name(&branch.key),
                    format_count(branch.visitors),
                    share
                ));
            }
        }

        lines.push(String::new());
        lines.push("🔍 **Key Insights**:".to_string());
        lines.push(format!("• Average daily footfall: **{:.1} visitors**", average));
        lines.push(format!(
            "• Peak activity: **{}** with **{} visitors**",
            peak.date,
            format_count(peak.total)
        ));
        lines.push(format!(
            "• Recent trend: **{}** ({} visitors/day over the last {} days)",
            trend.direction,
            format_signed(trend.delta_per_day, 1),
            trend.points
        ));
        if let Some(leader) = totals.iter().max_by_key(|t| t.visitors) {
            lines.push(format!(
                "• {} leads in customer traffic",
                self.directory.display_name(&leader.key)
            ));
        }
        lines.push(format!(
            "• **{}** customer engagement overall",
            EngagementLevel::from_total(total).as_str()
        ));

        let dominant = totals.iter().max_by_key(|t| t.visitors).map_or(false, |leader| {
            leader.visitors > total.saturating_sub(leader.visitors)
        });
        lines.push(String::new());
        lines.push(if dominant {
            "💡 **Recommendation**: Consider redistributing resources from the busiest branch to support the others during peak periods.".to_string()
        } else {
            "💡 **Recommendation**: Align staff allocation with these traffic patterns for better customer service.".to_string()
        });

        Ok(lines.join("\n"))
    }

    fn branch_ranking(&self, branches: &[BranchComparison]) -> Synthesis {
        if branches.iter().all(|b| b.total_footfall.is_none()) {
            return Err(SynthesisError::NoData("branch footfall"));
        }
        let mut ranked: Vec<&BranchComparison> = branches.iter().collect();
        ranked.sort_by(|a, b| {
            let (a, b) = (a.total_footfall.unwrap_or(0.0), b.total_footfall.unwrap_or(0.0));
            b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
        });
        let leader_footfall = ranked[0].total_footfall.unwrap_or(0.0);
        if leader_footfall <= 0.0 {
            return Err(SynthesisError::ZeroTotal("branch footfall"));
        }

        let mut lines = vec![
            "🏦 **Branch Performance Ranking**".to_string(),
            String::new(),
            "Ranked by visitor volume:".to_string(),
            String::new(),
        ];
        for (rank, branch) in ranked.iter().enumerate() {
            lines.push(self.rank_heading(rank, &branch.branch_name));
            let footfall = branch.total_footfall.unwrap_or(0.0);
            lines.push(format!("   • Footfall: **{} visitors**", format_count(footfall.round() as u64)));
            if let Some(revenue) = branch.total_revenue {
                lines.push(format!("   • Revenue: **{}**", format_currency(revenue)));
            }
            if let Some(score) = branch.customer_satisfaction {
                lines.push(format!("   • Satisfaction: **{:.1}/5.0**", score));
            }
            if let Some(efficiency) = branch.service_efficiency {
                lines.push(format!("   • Service efficiency: **{}%**", efficiency.round()));
            }
            if rank == 0 {
                lines.push("   • Market leader in customer engagement".to_string());
            } else {
                lines.push(format!(
                    "   • {}% gap from leader",
                    gap_percent(leader_footfall, footfall)
                ));
            }
        }

        let last = ranked[ranked.len() - 1];
        lines.push(String::new());
        lines.push("🔍 **Strategic Insights**:".to_string());
        lines.push(self.segment_insight(&ranked[0].branch_name));
        lines.push(self.balance_insight(
            &last.branch_name,
            last.total_footfall.unwrap_or(0.0),
            leader_footfall,
            ranked.len(),
        ));
        lines.push(String::new());
        lines.push(format!(
            "💡 **Strategy**: Replicate {}'s success factors across the other locations.",
            ranked[0].branch_name
        ));

        Ok(lines.join("\n"))
    }

    fn footfall_ranking(&self, series: &[FootfallDay]) -> Synthesis {
        let mut totals = branch_totals(series, &self.directory);
        if totals.is_empty() {
            return Err(SynthesisError::NoData("branch footfall"));
        }
        totals.sort_by(|a, b| b.visitors.cmp(&a.visitors));
        let leader = totals[0].visitors as f64;
        if leader <= 0.0 {
            return Err(SynthesisError::ZeroTotal("branch footfall"));
        }

        let mut lines = vec![
            "🏦 **Branch Performance Ranking**".to_string(),
            String::new(),
            format!("Ranked by visitor volume over the past {} days:", series.len()),
            String::new(),
        ];
        for (rank, branch) in totals.iter().enumerate() {
            let name = self.directory.display_name(&branch.key);
            lines.push(self.rank_heading(rank, &name));
            lines.push(format!("   • Footfall: **{} visitors**", format_count(branch.visitors)));
            if rank == 0 {
                lines.push("   • Market leader in customer engagement".to_string());
            } else {
                lines.push(format!(
                    "   • {}% gap from leader",
                    gap_percent(leader, branch.visitors as f64)
                ));
            }
        }

        let first = self.directory.display_name(&totals[0].key);
        let last = &totals[totals.len() - 1];
        lines.push(String::new());
        lines.push("🔍 **Strategic Insights**:".to_string());
        lines.push(self.segment_insight(&first));
        lines.push(self.balance_insight(
            &self.directory.display_name(&last.key),
            last.visitors as f64,
            leader,
            totals.len(),
        ));
        lines.push(String::new());
        lines.push(format!(
            "💡 **Strategy**: Replicate {}'s success factors across the other locations.",
            first
        ));

        Ok(lines.join("\n"))
    }

    fn rank_heading(&self, rank: usize, name: &str) -> String {
        let medal = match rank {
            0 => "🥇".to_string(),
            1 => "🥈".to_string(),
            2 => "🥉".to_string(),
            n => format!("{}.", n + 1),
        };
        match self.directory.find(name).filter(|p| !p.kind.is_empty()) {
            Some(profile) => format!("{} **{}** ({})", medal, name, profile.kind),
            None => format!("{} **{}**", medal, name),
        }
    }

    fn segment_insight(&self, leader: &str) -> String {
        match self.directory.find(leader).filter(|p| !p.kind.is_empty()) {
            Some(profile) => format!(
                "• {} excels in the {} market segment",
                leader,
                profile.kind.to_lowercase()
            ),
            None => format!("• {} sets the pace for the network", leader),
        }
    }

    fn balance_insight(&self, last: &str, last_footfall: f64, leader_footfall: f64, count: usize) -> String {
        if count > 1 && last_footfall < leader_footfall / 2.0 {
            format!("• Significant improvement potential in {}", last)
        } else {
            "• Balanced performance across locations".to_string()
        }
    }

    fn revenue_report(&self, branches: &[BranchComparison]) -> Synthesis {
        let with_revenue: Vec<(&BranchComparison, f64)> = branches
            .iter()
            .filter_map(|b| b.total_revenue.map(|r| (b, r)))
            .collect();
        if with_revenue.is_empty() {
            return Err(SynthesisError::NoData("revenue"));
        }
        let total: f64 = with_revenue.iter().map(|(_, r)| r).sum();
        if total <= 0.0 {
            return Err(SynthesisError::ZeroTotal("revenue"));
        }

        let mut lines = vec!["💼 **Revenue Analysis**".to_string(), String::new()];
        for (branch, revenue) in &with_revenue {
            let share = share_percent(*revenue, total).ok_or(SynthesisError::ZeroTotal("revenue"))?;
            lines.push(format!(
                "💰 **{}**: {} ({}% of total)",
                branch.branch_name,
                format_currency(*revenue),
                share
            ));
        }
        lines.push(String::new());
        lines.push(format!("📊 **Total Revenue**: **{}**", format_currency(total)));
        lines.push(String::new());
        lines.push("📈 **Estimated Growth**:".to_string());
        for (branch, revenue) in &with_revenue {
            lines.push(format!(
                "• {}: {}% vs last week",
                branch.branch_name,
                format_signed(self.baselines.estimated_growth(*revenue), 1)
            ));
        }
        lines.push(String::new());
        lines.push("*Growth figures are estimates, not reported values.*".to_string());

        Ok(lines.join("\n"))
    }

    fn satisfaction_report(&self, branches: &[BranchComparison]) -> Synthesis {
        let scores: Vec<(&str, f64)> = branches
            .iter()
            .filter_map(|b| b.customer_satisfaction.map(|s| (b.branch_name.as_str(), s)))
            .collect();
        if scores.is_empty() {
            return Err(SynthesisError::NoData("satisfaction"));
        }
        let average = scores.iter().map(|(_, s)| s).sum::<f64>() / scores.len() as f64;
        let baseline = self.baselines.satisfaction_baseline;
        let reviews = self.baselines.review_count;
        let distribution = satisfaction_distribution(average, reviews);

        let mut lines = vec!["⭐ **Customer Satisfaction Scores**".to_string(), String::new()];
        for (name, score) in &scores {
            lines.push(format!("⭐ **{}**: {:.1}/5.0 stars", name, score));
        }
        lines.push(String::new());
        lines.push(format!(
            "📊 **Overall Average**: **{:.1}/5.0** stars ({} vs {:.1} baseline)",
            average,
            format_signed(average - baseline, 1),
            baseline
        ));
        lines.push(String::new());
        lines.push(format!(
            "📋 **Estimated Rating Distribution** (from the average score, {} reviews):",
            reviews
        ));
        for (i, percentage) in distribution.percentages.iter().enumerate() {
            let stars = 5 - i;
            lines.push(format!(
                "• {} star{}: {}% (~{} reviews)",
                stars,
                if stars == 1 { "" } else { "s" },
                percentage.round(),
                distribution.counts[i]
            ));
        }
        lines.push(String::new());
        lines.push(
            "💡 Satisfaction covers wait times, service quality, staff interaction and overall experience.".to_string(),
        );

        Ok(lines.join("\n"))
    }

    fn prediction_report<R: Rng + ?Sized>(&self, series: &[FootfallDay], rng: &mut R) -> Synthesis {
        let trend = self.trend(series);
        let start = Forecaster::next_start(series, Utc::now().date_naive());
        let forecast = self.forecaster.forecast(series, start, self.forecast_days, rng);
        let recent = &series[series.len().saturating_sub(self.trend_window)..];

        let mut lines = vec![
            "🔮 **Footfall Forecast**".to_string(),
            String::new(),
            format!(
                "📈 **Current Trend**: footfall is **{}** ({} visitors/day over the last {} days)",
                trend.direction,
                format_signed(trend.delta_per_day, 1),
                trend.points
            ),
            String::new(),
            "📊 **Recent Daily Activity**:".to_string(),
        ];
        for day in recent {
            lines.push(format!(
                "• {}: **{} visitors**{}",
                day.date,
                format_count(day.total),
                self.day_breakdown(day)
            ));
        }

        lines.push(String::new());
        lines.push(format!("🗓️ **Next {} Days** (estimated):", forecast.len()));
        for day in &forecast {
            let weekday = day
                .parsed_date()
                .map(|d| format!(" ({})", d.format("%a")))
                .unwrap_or_default();
            lines.push(format!(
                "• {}{}: **~{} visitors**{}",
                day.date,
                weekday,
                format_count(day.total),
                self.day_breakdown(day)
            ));
        }

        let business_day = forecast
            .iter()
            .find(|d| {
                d.parsed_date()
                    .map_or(false, |date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
            })
            .or_else(|| forecast.first());
        if let Some(day) = business_day {
            lines.push(String::new());
            lines.push(format!(
                "💡 **Next business day** ({}): expect about **{} visitors**.",
                day.date,
                format_count(day.total)
            ));
        }

        lines.push(String::new());
        lines.push(match trend.direction {
            TrendDirection::Decreasing => {
                "🔧 **Recommendation**: Plan customer engagement initiatives to reverse the decline.".to_string()
            }
            TrendDirection::Increasing => {
                "🔧 **Recommendation**: Schedule extra staff for the busier days ahead.".to_string()
            }
            TrendDirection::Stable => {
                "🔧 **Recommendation**: Maintain current staffing and operations.".to_string()
            }
        });
        lines.push(String::new());
        lines.push("*Forecasts apply weekday patterns to recent averages and are estimates.*".to_string());

        Ok(lines.join("\n"))
    }

    fn staff_report(&self, branches: &[BranchComparison]) -> Synthesis {
        let profiles: Vec<(&str, f64)> = branches
            .iter()
            .filter_map(|b| b.service_efficiency.map(|e| (b.branch_name.as_str(), e)))
            .collect();
        if profiles.is_empty() {
            return Err(SynthesisError::NoData("service efficiency"));
        }

        let mut lines = vec!["👥 **Staff Efficiency Overview**".to_string(), String::new()];
        let mut slowest: Option<(&str, u32)> = None;
        for &(name, efficiency) in &profiles {
            let profile = efficiency_profile(efficiency);
            lines.push(format!("🏢 **{}** (service efficiency {}%)", name, efficiency.round()));
            lines.push(format!("   • Estimated wait time: **{} min**", profile.wait_time_minutes));
            lines.push(format!("   • Transaction speed: **{}%**", profile.transaction_speed.round()));
            lines.push(format!("   • Staff utilization: **{}%**", profile.staff_utilization.round()));
            if slowest.map_or(true, |(_, wait)| profile.wait_time_minutes > wait) {
                slowest = Some((name, profile.wait_time_minutes));
            }
        }

        if let Some((name, _)) = slowest.filter(|_| profiles.len() > 1) {
            lines.push(String::new());
            lines.push(format!(
                "💡 **Focus**: {} shows the most room to improve wait times.",
                name
            ));
        }
        lines.push(String::new());
        lines.push("*Wait time, speed and utilization are estimated from service efficiency.*".to_string());

        Ok(lines.join("\n"))
    }

    fn dashboard_report(&self, stats: &RealTimeStats) -> Synthesis {
        let lines = vec![
            "📊 **Live Dashboard Status**".to_string(),
            String::new(),
            format!(
                "🟢 **System Health**: {}",
                stats.server_health_text().unwrap_or_else(|| "Unknown".to_string())
            ),
            format!(
                "🔗 **Active Connections**: {}",
                stats
                    .active_connections
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "n/a".to_string())
            ),
            format!(
                "⏰ **Last Update**: {}",
                stats.last_update_text().unwrap_or_else(|| "n/a".to_string())
            ),
            String::new(),
            "📈 **Available Analytics**:".to_string(),
            "• Branch performance comparison".to_string(),
            "• Customer footfall trends".to_string(),
            "• Revenue tracking".to_string(),
            "• Satisfaction scores".to_string(),
            "• Operational efficiency".to_string(),
            "• Predictive analytics".to_string(),
            String::new(),
            "💡 Use branch filters and date ranges to customize your analysis!".to_string(),
        ];
        Ok(lines.join("\n"))
    }

    fn trend(&self, series: &[FootfallDay]) -> Trend {
        let totals: Vec<f64> = series.iter().map(|d| d.total as f64).collect();
        classify_trend(&totals, self.trend_window)
    }

    fn day_breakdown(&self, day: &FootfallDay) -> String {
        if day.counts.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .directory
            .ordered_keys(day.counts.keys())
            .iter()
            .map(|key| format!("{}: {}", self.directory.display_name(key), day.count(key)))
            .collect();
        format!(" ({})", parts.join(", "))
    }

    /// Data-free reply for an intent
    pub fn generic(&self, intent: Intent) -> String {
        let bank = &self.bank_name;
        let names = self.branch_names();
        let count = self.directory.len();

        let body = match intent {
            Intent::Footfall => format!(
                "📊 **Footfall Analytics Available:**\n\n\
                 🔹 **Real-time visitor tracking** across all {count} branches\n\
                 🔹 **Historical trends** for 1d, 7d, 30d, 90d periods\n\
                 🔹 **7-day predictions** from weekday patterns\n\
                 🔹 **Peak hour analysis** and capacity utilization\n\n\
                 💡 The Footfall Chart shows trends for {names}. Enable \"Show Prediction\" to see the next 7 days!"
            ),
            Intent::BranchComparison => {
                let mut text = format!("🏦 **{bank} Branch Network:**\n");
                for profile in self.directory.profiles() {
                    text.push_str(&format!(
                        "\n🏢 **{}** ({}, Code: {})",
                        profile.display_name, profile.kind, profile.code
                    ));
                }
                text.push_str(
                    "\n\n📊 Compare footfall, revenue, satisfaction scores and operational efficiency in the dashboard!",
                );
                text
            }
            Intent::Revenue => "💰 **Revenue Tracking Features:**\n\n\
                 🔹 **Real-time transaction monitoring**\n\
                 🔹 **Daily/weekly/monthly revenue trends**\n\
                 🔹 **Branch-wise revenue comparison**\n\
                 🔹 **Growth rate calculations**\n\
                 🔹 **Performance analytics with charts**\n\n\
                 📊 View detailed revenue analytics in the dashboard with transaction breakdowns and trend analysis!"
                .to_string(),
            Intent::Satisfaction => "⭐ **Customer Satisfaction Analytics:**\n\n\
                 🔹 **5-star rating system** for all customer interactions\n\
                 🔹 **Real-time feedback collection**\n\
                 🔹 **Service quality metrics**\n\
                 🔹 **Wait time impact analysis**\n\
                 🔹 **Staff performance ratings**\n\n\
                 📊 View satisfaction trends and improvement opportunities in the Customer Analytics section!"
                .to_string(),
            Intent::Prediction => "🔮 **Prediction Capabilities:**\n\n\
                 📈 **7-Day Footfall Forecasting**\n\
                 \x20\x20\x20• Trend analysis over recent days\n\
                 \x20\x20\x20• Day-of-week adjustments\n\
                 \x20\x20\x20• Visual prediction indicators\n\n\
                 🔹 **How to use**: Go to Footfall Chart → Enable \"Show Prediction\"\n\
                 🔹 **Patterns**: Monday (higher), mid-week (steady), weekend (lower)\n\n\
                 💡 Predictions help with staff scheduling, capacity planning and resource allocation!"
                .to_string(),
            Intent::Staff => "👥 **Staff Management System:**\n\n\
                 🔹 **Schedule Management**\n\
                 \x20\x20\x20• Morning, afternoon, evening shifts\n\
                 \x20\x20\x20• Full-day assignments\n\
                 \x20\x20\x20• Leave tracking\n\n\
                 🔹 **Staff Analytics**\n\
                 \x20\x20\x20• Performance metrics\n\
                 \x20\x20\x20• Utilization rates\n\
                 \x20\x20\x20• Service efficiency scores\n\n\
                 📊 Access through Admin Panel → Staff Schedules for detailed management!"
                .to_string(),
            Intent::DashboardOverview => format!(
                "📊 **{bank} Analytics Dashboard:**\n\n\
                 🏠 **Home**: Overview metrics and real-time stats\n\
                 📈 **Analytics**: Detailed charts and comparisons\n\
                 👥 **Staff**: Schedule and performance management\n\
                 ⚙️ **Admin**: System configuration\n\n\
                 📋 **Key Features:**\n\
                 • Real-time branch performance\n\
                 • Customer footfall predictions\n\
                 • Revenue and satisfaction tracking\n\
                 • Interactive charts and filters\n\n\
                 🔍 Use the branch selector and date filters to explore specific data!"
            ),
            Intent::Help => {
                let example = self
                    .directory
                    .profiles()
                    .first()
                    .map(|p| p.display_name.clone())
                    .unwrap_or_else(|| "a branch".to_string());
                return format!(
                    "🤖 **{bank} Analytics Assistant Help:**\n\n\
                     💡 **I can help you with:**\n\
                     🔹 Branch performance comparisons\n\
                     🔹 Customer footfall analysis\n\
                     🔹 Revenue and financial metrics\n\
                     🔹 Satisfaction scores and feedback\n\
                     🔹 Staff scheduling and management\n\
                     🔹 Dashboard navigation\n\
                     🔹 Predictive analytics\n\n\
                     📝 **Sample Questions:**\n\
                     • \"What's {example}'s performance today?\"\n\
                     • \"Compare revenue between branches\"\n\
                     • \"Show me footfall predictions\"\n\
                     • \"What are our satisfaction ratings?\"\n\n\
                     🚀 I use live database information whenever the backend is connected!"
                );
            }
            Intent::Default => {
                return format!(
                    "🤖 **Welcome to {bank} Analytics Assistant!**\n\n\
                     🎯 **I specialize in:**\n\
                     • Real-time banking analytics\n\
                     • Branch performance insights\n\
                     • Customer footfall predictions\n\
                     • Revenue and satisfaction tracking\n\
                     • Dashboard navigation assistance\n\n\
                     💡 **Quick Tips:**\n\
                     🔹 Request comparisons: \"Compare all branch revenues\"\n\
                     🔹 Get predictions: \"Show next week's footfall forecast\"\n\
                     🔹 Explore features: \"What analytics are available?\"\n\n\
                     ⚠️ *Note: Some features require backend connection for real-time data*"
                );
            }
        };

        format!("{}\n\n{}", body, LIVE_DATA_NOTICE)
    }

    /// "A, B, and C"
    fn branch_names(&self) -> String {
        let names: Vec<&str> = self
            .directory
            .profiles()
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        match names.len() {
            0 => "all branches".to_string(),
            1 => names[0].to_string(),
            2 => format!("{} and {}", names[0], names[1]),
            n => format!("{}, and {}", names[..n - 1].join(", "), names[n - 1]),
        }
    }
}

fn series(snapshot: &DashboardSnapshot) -> Result<&[FootfallDay], SynthesisError> {
    snapshot.footfall_series().ok_or(SynthesisError::NoData("footfall"))
}

fn branches(snapshot: &DashboardSnapshot) -> Result<&[BranchComparison], SynthesisError> {
    snapshot.branches().ok_or(SynthesisError::NoData("branch comparison"))
}

/// Percent below the leader, rounded
fn gap_percent(leader: f64, value: f64) -> u32 {
    share_percent(leader - value, leader).unwrap_or(0)
}
