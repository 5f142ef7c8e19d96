//! Insights report command

use std::sync::Arc;

use anyhow::{anyhow, Result};
use healthscope_core::{
    InsightCategory, InsightPriority, InsightsFeed, InsightsSnapshot, SymptomCategory,
    SymptomRepository, SymptomSeverity, TimeRange,
};

fn insight_icon(category: InsightCategory) -> &'static str {
    match category {
        InsightCategory::Trend => "📈",
        InsightCategory::Recommendation => "💡",
        InsightCategory::Warning => "⚠️ ",
        InsightCategory::Achievement => "🏆",
    }
}

fn priority_marker(priority: InsightPriority) -> &'static str {
    match priority {
        InsightPriority::High => "!!",
        InsightPriority::Medium => "! ",
        InsightPriority::Low => "  ",
    }
}

pub fn cmd_insights(repository: Arc<SymptomRepository>, range: &str, json: bool) -> Result<()> {
    let range: TimeRange = range.parse().map_err(|e: String| anyhow!(e))?;

    let feed = InsightsFeed::attach(repository);
    feed.select_range(range);
    let snapshot = feed.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_report(&snapshot);
    Ok(())
}

fn print_report(snapshot: &InsightsSnapshot) {
    let stats = &snapshot.statistics;

    println!();
    println!("📊 Statistics ({})", snapshot.range);
    println!("   ─────────────────────────────");
    println!("   Total symptoms: {}", stats.total_count);
    println!("   This week:      {}", stats.count_in_last_week);
    println!(
        "   Most common:    {}",
        stats
            .most_common_category
            .map(|c| c.as_str())
            .unwrap_or("N/A")
    );

    if stats.total_count > 0 {
        println!();
        println!("   By category:");
        for category in SymptomCategory::ALL {
            let count = stats.category_count(category);
            if count > 0 {
                println!(
                    "     {:10} {:>3}  ({:.0}%)",
                    category.as_str(),
                    count,
                    stats.category_percentage(category)
                );
            }
        }

        println!();
        println!("   By severity:");
        for severity in SymptomSeverity::ALL {
            println!(
                "     {:10} {:>3}  ({:.0}%)",
                severity.as_str(),
                stats.severity_count(severity),
                stats.severity_percentage(severity)
            );
        }
    }

    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────");
    for insight in &snapshot.insights {
        println!(
            "   {} {} {}",
            priority_marker(insight.priority),
            insight_icon(insight.category),
            insight.title
        );
        println!("        {}", insight.description);
    }
}
