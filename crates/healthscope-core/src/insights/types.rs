//! Core types for the insight engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{SymptomCategory, SymptomSeverity};

/// What kind of advice an insight carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightCategory {
    Trend,
    Recommendation,
    Warning,
    Achievement,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Trend => "Trend",
            InsightCategory::Recommendation => "Recommendation",
            InsightCategory::Warning => "Warning",
            InsightCategory::Achievement => "Achievement",
        }
    }
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display priority of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InsightPriority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl InsightPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightPriority::Low => "low",
            InsightPriority::Medium => "medium",
            InsightPriority::High => "high",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for InsightPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A human-readable observation about the logged symptoms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInsight {
    pub title: String,
    pub description: String,
    pub category: InsightCategory,
    pub priority: InsightPriority,
}

impl HealthInsight {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: InsightCategory,
        priority: InsightPriority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            priority,
        }
    }
}

/// Aggregate counts over a set of entries
///
/// The count maps always contain every category and severity, with zero for
/// the ones that never occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomStatistics {
    pub total_count: usize,
    pub most_common_category: Option<SymptomCategory>,
    pub count_by_category: BTreeMap<SymptomCategory, usize>,
    pub count_by_severity: BTreeMap<SymptomSeverity, usize>,
    pub count_in_last_week: usize,
}

impl SymptomStatistics {
    pub fn category_count(&self, category: SymptomCategory) -> usize {
        self.count_by_category.get(&category).copied().unwrap_or(0)
    }

    pub fn severity_count(&self, severity: SymptomSeverity) -> usize {
        self.count_by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// Share of entries in `category`, 0-100
    pub fn category_percentage(&self, category: SymptomCategory) -> f64 {
        percentage(self.category_count(category), self.total_count)
    }

    /// Share of entries with `severity`, 0-100
    pub fn severity_percentage(&self, severity: SymptomSeverity) -> f64 {
        percentage(self.severity_count(severity), self.total_count)
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Window the insights screen analyzes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Last 7 days
    #[default]
    Week,
    /// Last 30 days
    Month,
    /// Everything ever logged
    AllTime,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Week, TimeRange::Month, TimeRange::AllTime];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::AllTime => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "Last 7 Days",
            TimeRange::Month => "Last 30 Days",
            TimeRange::AllTime => "All Time",
        }
    }

    /// Earliest timestamp included in the window
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::Week => now - Duration::days(7),
            TimeRange::Month => now - Duration::days(30),
            TimeRange::AllTime => DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        timestamp >= self.start(now)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "7d" => Ok(TimeRange::Week),
            "month" | "30d" => Ok(TimeRange::Month),
            "all" | "all_time" | "alltime" => Ok(TimeRange::AllTime),
            _ => Err(format!("Unknown time range: {}", s)),
        }
    }
}
