//! Intent matching
//!
//! An ordered table of `(keywords, intent)` rules. The input is lowercased and
//! the first rule with a keyword contained in it wins, so earlier rules take
//! priority: "total footfall" is a footfall question, not a revenue one.

use branch_assistant_core::Intent;

/// One row of the dispatch table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    /// Lowercase substrings; any one of them selects the intent
    pub keywords: &'static [&'static str],
}

const DEFAULT_RULES: [IntentRule; 8] = [
    IntentRule {
        intent: Intent::Footfall,
        keywords: &["footfall", "visitor", "customer", "trend"],
    },
    IntentRule {
        intent: Intent::BranchComparison,
        keywords: &["branch", "location", "compare", "performance"],
    },
    IntentRule {
        intent: Intent::Revenue,
        keywords: &["revenue", "money", "income", "earning", "total"],
    },
    IntentRule {
        intent: Intent::Satisfaction,
        keywords: &["satisfaction", "rating", "feedback", "review"],
    },
    IntentRule {
        intent: Intent::Prediction,
        keywords: &["predict", "forecast", "future", "next"],
    },
    IntentRule {
        intent: Intent::Staff,
        keywords: &["staff", "schedule", "employee"],
    },
    IntentRule {
        intent: Intent::DashboardOverview,
        keywords: &["dashboard", "metric", "analytics"],
    },
    IntentRule {
        intent: Intent::Help,
        keywords: &["help", "how", "?"],
    },
];

/// Keyword intent matcher
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl IntentMatcher {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify a message. Never fails; unmatched input is `Intent::Default`.
    pub fn classify(&self, input: &str) -> Intent {
        let message = input.to_lowercase();
        let intent = self
            .rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| message.contains(k)))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Default);

        tracing::debug!(intent = %intent, "Classified message");
        intent
    }
}
