//! Aggregate symptom statistics

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::{SymptomCategory, SymptomEntry, SymptomSeverity};

use super::types::SymptomStatistics;

/// Count entries by category and severity
///
/// `most_common_category` is the category with the highest count. Ties go to
/// the category declared first in [`SymptomCategory`] (Headache before
/// Fatigue, ..., Other last).
pub fn statistics(entries: &[SymptomEntry], now: DateTime<Utc>) -> SymptomStatistics {
    let mut count_by_category: BTreeMap<SymptomCategory, usize> =
        SymptomCategory::ALL.iter().map(|&c| (c, 0)).collect();
    let mut count_by_severity: BTreeMap<SymptomSeverity, usize> =
        SymptomSeverity::ALL.iter().map(|&s| (s, 0)).collect();

    for entry in entries {
        *count_by_category.entry(entry.category).or_insert(0) += 1;
        *count_by_severity.entry(entry.severity).or_insert(0) += 1;
    }

    let mut most_common_category = None;
    let mut best = 0;
    for category in SymptomCategory::ALL {
        let count = count_by_category[&category];
        if count > best {
            best = count;
            most_common_category = Some(category);
        }
    }

    let week_start = now - Duration::days(7);
    let count_in_last_week = entries.iter().filter(|e| e.timestamp >= week_start).count();

    SymptomStatistics {
        total_count: entries.len(),
        most_common_category,
        count_by_category,
        count_by_severity,
        count_in_last_week,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 24, 12, 0, 0).unwrap()
    }

    fn entry(category: SymptomCategory, severity: SymptomSeverity, days_ago: i64) -> SymptomEntry {
        SymptomEntry::new(category, severity).at(now() - Duration::days(days_ago))
    }

    #[test]
    fn test_empty_statistics() {
        let stats = statistics(&[], now());

        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.most_common_category, None);
        assert_eq!(stats.count_in_last_week, 0);
        assert!(stats.count_by_category.values().all(|&c| c == 0));
        assert!(stats.count_by_severity.values().all(|&c| c == 0));
        assert_eq!(stats.count_by_category.len(), 8);
        assert_eq!(stats.count_by_severity.len(), 3);
        assert_eq!(stats.category_percentage(SymptomCategory::Fever), 0.0);
    }

    #[test]
    fn test_counts_and_last_week() {
        let entries = vec![
            entry(SymptomCategory::Cough, SymptomSeverity::Mild, 1),
            entry(SymptomCategory::Cough, SymptomSeverity::Severe, 2),
            entry(SymptomCategory::Fever, SymptomSeverity::Moderate, 8),
            entry(SymptomCategory::Cough, SymptomSeverity::Mild, 30),
        ];
        let stats = statistics(&entries, now());

        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.most_common_category, Some(SymptomCategory::Cough));
        assert_eq!(stats.category_count(SymptomCategory::Cough), 3);
        assert_eq!(stats.category_count(SymptomCategory::Fever), 1);
        assert_eq!(stats.severity_count(SymptomSeverity::Mild), 2);
        assert_eq!(stats.count_in_last_week, 2);
        assert_eq!(stats.category_percentage(SymptomCategory::Cough), 75.0);
        assert_eq!(stats.severity_percentage(SymptomSeverity::Severe), 25.0);
    }

    #[test]
    fn test_most_common_tie_prefers_declaration_order() {
        let entries = vec![
            entry(SymptomCategory::Other, SymptomSeverity::Mild, 0),
            entry(SymptomCategory::Dizziness, SymptomSeverity::Mild, 0),
            entry(SymptomCategory::Other, SymptomSeverity::Mild, 0),
            entry(SymptomCategory::Dizziness, SymptomSeverity::Mild, 0),
        ];
        let stats = statistics(&entries, now());
        assert_eq!(stats.most_common_category, Some(SymptomCategory::Dizziness));
    }
}
