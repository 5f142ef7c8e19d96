//! Insight Engine - runs the symptom rules and orders their output

use chrono::{DateTime, Duration, Utc};

use crate::models::SymptomEntry;

use super::rules::{
    HydrationRule, RecurringCategoryRule, RestRule, SevereSymptomsRule, WeeklyFrequencyRule,
};
use super::types::{HealthInsight, InsightCategory, InsightPriority};

/// Context provided to insight rules
pub struct AnalysisContext<'a> {
    /// Entries being analyzed (already filtered to the selected window)
    pub entries: &'a [SymptomEntry],
    /// Reference time for "last week" calculations
    pub now: DateTime<Utc>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(entries: &'a [SymptomEntry], now: DateTime<Utc>) -> Self {
        Self { entries, now }
    }

    /// Start of the trailing seven-day window
    pub fn week_start(&self) -> DateTime<Utc> {
        self.now - Duration::days(7)
    }

    /// Entries with `timestamp >= now - 7 days`
    pub fn last_week(&self) -> impl Iterator<Item = &'a SymptomEntry> + '_ {
        let start = self.week_start();
        self.entries.iter().filter(move |e| e.timestamp >= start)
    }
}

/// A single independent insight rule
pub trait InsightRule: Send + Sync {
    /// Stable identifier used in logs
    fn id(&self) -> &'static str;

    /// Produce zero or more insights for the given entries
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<HealthInsight>;
}

/// Runs every registered rule and sorts the combined output
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules, in evaluation order
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(SevereSymptomsRule));
        engine.register(Box::new(RecurringCategoryRule::default()));
        engine.register(Box::new(WeeklyFrequencyRule::default()));
        engine.register(Box::new(HydrationRule));
        engine.register(Box::new(RestRule));

        engine
    }

    /// Register an additional rule; it runs after those already registered
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Evaluate all rules against `entries` as of `now`
    ///
    /// Output is sorted by priority, highest first. The sort is stable, so
    /// insights of equal priority keep rule evaluation order. When no rule
    /// fires a single low-priority "keep tracking" insight is returned.
    pub fn analyze(&self, entries: &[SymptomEntry], now: DateTime<Utc>) -> Vec<HealthInsight> {
        let ctx = AnalysisContext::new(entries, now);
        let mut insights = vec![];

        for rule in &self.rules {
            let produced = rule.evaluate(&ctx);
            if !produced.is_empty() {
                tracing::debug!(rule = rule.id(), count = produced.len(), "Rule fired");
            }
            insights.extend(produced);
        }

        if insights.is_empty() {
            insights.push(keep_tracking());
        }

        insights.sort_by(|a, b| b.priority.cmp(&a.priority));
        insights
    }
}

/// Analyze `entries` with the built-in rules
pub fn analyze(entries: &[SymptomEntry], now: DateTime<Utc>) -> Vec<HealthInsight> {
    InsightEngine::new().analyze(entries, now)
}

fn keep_tracking() -> HealthInsight {
    HealthInsight::new(
        "Track Your Health",
        "Continue logging symptoms to build a comprehensive health picture and identify patterns over time.",
        InsightCategory::Recommendation,
        InsightPriority::Low,
    )
}
