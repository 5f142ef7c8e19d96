//! Built-in insight rules
//!
//! Each rule looks at the analyzed entries independently; the engine
//! collects all of them.
//! - `SevereSymptomsRule` - any severe entry
//! - `RecurringCategoryRule` - a category logged three or more times
//! - `WeeklyFrequencyRule` - symptom-free week, or too many this week
//! - `HydrationRule` - headaches or dizziness
//! - `RestRule` - fatigue

use crate::models::{SymptomCategory, SymptomSeverity};

use super::engine::{AnalysisContext, InsightRule};
use super::types::{HealthInsight, InsightCategory, InsightPriority};

pub struct SevereSymptomsRule;

impl InsightRule for SevereSymptomsRule {
    fn id(&self) -> &'static str {
        "severe_symptoms"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<HealthInsight> {
        let severe = ctx
            .entries
            .iter()
            .filter(|e| e.severity == SymptomSeverity::Severe)
            .count();
        if severe == 0 {
            return vec![];
        }

        vec![HealthInsight::new(
            "Severe Symptoms Detected",
            format!(
                "You've logged {} severe symptom(s) recently. Consider consulting a healthcare professional if symptoms persist.",
                severe
            ),
            InsightCategory::Warning,
            InsightPriority::High,
        )]
    }
}

/// Flags categories that keep coming back
pub struct RecurringCategoryRule {
    /// Minimum entries in one category to count as recurring
    pub threshold: usize,
}

impl Default for RecurringCategoryRule {
    fn default() -> Self {
        Self { threshold: 3 }
    }
}

impl InsightRule for RecurringCategoryRule {
    fn id(&self) -> &'static str {
        "recurring_category"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<HealthInsight> {
        // Declaration order keeps the output deterministic
        SymptomCategory::ALL
            .iter()
            .filter_map(|&category| {
                let count = ctx.entries.iter().filter(|e| e.category == category).count();
                (count >= self.threshold).then(|| {
                    HealthInsight::new(
                        format!("Recurring {}", category),
                        format!(
                            "You've experienced {} {} times recently. Track patterns to identify triggers.",
                            category.as_str().to_lowercase(),
                            count
                        ),
                        InsightCategory::Trend,
                        InsightPriority::Medium,
                    )
                })
            })
            .collect()
    }
}

/// Compares the last seven days against the whole input
///
/// The two outcomes are exclusive: the weekly subset cannot be both empty
/// and above the threshold.
pub struct WeeklyFrequencyRule {
    /// Weekly count above which frequency is considered high
    pub high_frequency: usize,
}

impl Default for WeeklyFrequencyRule {
    fn default() -> Self {
        Self { high_frequency: 5 }
    }
}

impl InsightRule for WeeklyFrequencyRule {
    fn id(&self) -> &'static str {
        "weekly_frequency"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<HealthInsight> {
        let this_week = ctx.last_week().count();

        if this_week == 0 && !ctx.entries.is_empty() {
            vec![HealthInsight::new(
                "Symptom-Free Week",
                "Great news! You haven't logged any symptoms in the past week. Keep up the healthy habits!",
                InsightCategory::Achievement,
                InsightPriority::Low,
            )]
        } else if this_week > self.high_frequency {
            vec![HealthInsight::new(
                "High Symptom Frequency",
                format!(
                    "You've logged {} symptoms this week. Consider lifestyle adjustments or medical consultation.",
                    this_week
                ),
                InsightCategory::Recommendation,
                InsightPriority::High,
            )]
        } else {
            vec![]
        }
    }
}

pub struct HydrationRule;

impl InsightRule for HydrationRule {
    fn id(&self) -> &'static str {
        "hydration"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<HealthInsight> {
        let relevant = ctx.entries.iter().any(|e| {
            matches!(
                e.category,
                SymptomCategory::Headache | SymptomCategory::Dizziness
            )
        });
        if !relevant {
            return vec![];
        }

        vec![HealthInsight::new(
            "Stay Hydrated",
            "Headaches and dizziness can be linked to dehydration. Ensure you're drinking enough water daily.",
            InsightCategory::Recommendation,
            InsightPriority::Medium,
        )]
    }
}

pub struct RestRule;

impl InsightRule for RestRule {
    fn id(&self) -> &'static str {
        "rest"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<HealthInsight> {
        if !ctx
            .entries
            .iter()
            .any(|e| e.category == SymptomCategory::Fatigue)
        {
            return vec![];
        }

        vec![HealthInsight::new(
            "Prioritize Rest",
            "Fatigue can indicate insufficient rest. Aim for 7-9 hours of quality sleep per night.",
            InsightCategory::Recommendation,
            InsightPriority::Medium,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SymptomEntry;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 24, 12, 0, 0).unwrap()
    }

    fn logged(category: SymptomCategory, severity: SymptomSeverity, age: Duration) -> SymptomEntry {
        SymptomEntry::new(category, severity).at(now() - age)
    }

    #[test]
    fn test_severe_rule_names_count() {
        let entries = vec![
            logged(SymptomCategory::Fever, SymptomSeverity::Severe, Duration::hours(1)),
            logged(SymptomCategory::Cough, SymptomSeverity::Severe, Duration::days(40)),
            logged(SymptomCategory::Cough, SymptomSeverity::Mild, Duration::hours(2)),
        ];
        let out = SevereSymptomsRule.evaluate(&AnalysisContext::new(&entries, now()));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, InsightCategory::Warning);
        assert_eq!(out[0].priority, InsightPriority::High);
        assert!(out[0].description.contains("logged 2 severe"));
    }

    #[test]
    fn test_recurring_rule_threshold() {
        let two = vec![
            logged(SymptomCategory::Nausea, SymptomSeverity::Mild, Duration::hours(1)),
            logged(SymptomCategory::Nausea, SymptomSeverity::Mild, Duration::hours(2)),
        ];
        let rule = RecurringCategoryRule::default();
        assert!(rule
            .evaluate(&AnalysisContext::new(&two, now()))
            .is_empty());

        let mut three = two.clone();
        three.push(logged(
            SymptomCategory::Nausea,
            SymptomSeverity::Mild,
            Duration::days(60),
        ));
        let out = rule.evaluate(&AnalysisContext::new(&three, now()));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Recurring Nausea");
        assert!(out[0].description.contains("nausea 3 times"));
    }

    #[test]
    fn test_recurring_rule_uses_display_name() {
        let entries: Vec<_> = (0..3)
            .map(|_| logged(SymptomCategory::BodyPain, SymptomSeverity::Mild, Duration::hours(1)))
            .collect();
        let out = RecurringCategoryRule::default().evaluate(&AnalysisContext::new(&entries, now()));
        assert_eq!(out[0].title, "Recurring Body Pain");
        assert!(out[0].description.contains("body pain 3 times"));
    }

    #[test]
    fn test_weekly_rule_boundaries() {
        let rule = WeeklyFrequencyRule::default();

        // Exactly seven days old still counts as this week
        let edge = vec![logged(SymptomCategory::Cough, SymptomSeverity::Mild, Duration::days(7))];
        assert!(rule.evaluate(&AnalysisContext::new(&edge, now())).is_empty());

        let five: Vec<_> = (0..5)
            .map(|_| logged(SymptomCategory::Cough, SymptomSeverity::Mild, Duration::days(1)))
            .collect();
        assert!(rule.evaluate(&AnalysisContext::new(&five, now())).is_empty());

        let mut six = five.clone();
        six.push(logged(SymptomCategory::Fever, SymptomSeverity::Mild, Duration::days(2)));
        let out = rule.evaluate(&AnalysisContext::new(&six, now()));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "High Symptom Frequency");
        assert!(out[0].description.contains("logged 6 symptoms"));

        assert!(rule.evaluate(&AnalysisContext::new(&[], now())).is_empty());
    }

    #[test]
    fn test_hydration_and_rest_rules() {
        let dizzy = vec![logged(
            SymptomCategory::Dizziness,
            SymptomSeverity::Mild,
            Duration::days(90),
        )];
        let ctx = AnalysisContext::new(&dizzy, now());
        assert_eq!(HydrationRule.evaluate(&ctx).len(), 1);
        assert!(RestRule.evaluate(&ctx).is_empty());

        let tired = vec![logged(
            SymptomCategory::Fatigue,
            SymptomSeverity::Moderate,
            Duration::hours(3),
        )];
        let ctx = AnalysisContext::new(&tired, now());
        assert!(HydrationRule.evaluate(&ctx).is_empty());
        assert_eq!(RestRule.evaluate(&ctx)[0].title, "Prioritize Rest");
    }
}
