//! Symptom command implementations

use anyhow::{anyhow, Result};
use healthscope_core::models::duration_from_minutes;
use healthscope_core::{SymptomCategory, SymptomEntry, SymptomRepository, SymptomSeverity};
use uuid::Uuid;

use super::{format_duration, format_timestamp, parse_timestamp, truncate};

/// Fields to change on `edit`; `None` keeps the current value
#[derive(Debug, Default)]
pub struct EntryChanges {
    pub category: Option<String>,
    pub severity: Option<String>,
    pub notes: Option<String>,
    pub duration: Option<String>,
    pub at: Option<String>,
}

fn parse_category(input: &str) -> Result<SymptomCategory> {
    input.parse().map_err(|e: String| anyhow!(e))
}

fn parse_severity(input: &str) -> Result<SymptomSeverity> {
    input.parse().map_err(|e: String| anyhow!(e))
}

fn severity_icon(severity: SymptomSeverity) -> &'static str {
    match severity {
        SymptomSeverity::Mild => "🟢",
        SymptomSeverity::Moderate => "🟠",
        SymptomSeverity::Severe => "🔴",
    }
}

pub fn cmd_log(
    repository: &SymptomRepository,
    category: &str,
    severity: &str,
    notes: Option<&str>,
    duration: Option<&str>,
    at: Option<&str>,
) -> Result<SymptomEntry> {
    let category = parse_category(category)?;
    let severity = parse_severity(severity)?;
    let duration = duration.map(duration_from_minutes).transpose()?.flatten();

    let mut entry = SymptomEntry::new(category, severity)
        .with_notes(notes.unwrap_or_default().trim())
        .with_duration(duration);
    if let Some(at) = at {
        entry = entry.at(parse_timestamp(at)?);
    }
    repository.add(entry.clone())?;
    tracing::debug!(id = %entry.id, timestamp = %entry.timestamp, "Symptom logged");

    println!(
        "✅ Logged {} {} ({})",
        severity_icon(severity),
        category,
        severity
    );
    println!("   ID: {}", entry.id);

    Ok(entry)
}

pub fn cmd_list(
    repository: &SymptomRepository,
    category: Option<&str>,
    recent: bool,
    json: bool,
) -> Result<()> {
    let mut entries = if recent {
        repository.list_recent()
    } else {
        repository.all()
    };
    if let Some(category) = category {
        let category = parse_category(category)?;
        entries.retain(|e| e.category == category);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No symptoms logged yet. Log one with:");
        println!("  healthscope log headache --severity mild");
        return Ok(());
    }

    println!();
    println!("📝 Logged Symptoms ({})", entries.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in &entries {
        println!(
            "   {} {:10} │ {:8} │ {:>8} │ {}",
            severity_icon(entry.severity),
            entry.category.as_str(),
            entry.severity.as_str(),
            format_duration(entry.duration),
            format_timestamp(entry.timestamp),
        );
        if !entry.notes.is_empty() {
            println!("      {}", truncate(&entry.notes, 60));
        }
        println!("      id: {}", entry.id);
    }

    Ok(())
}

pub fn cmd_edit(
    repository: &SymptomRepository,
    id: Uuid,
    changes: EntryChanges,
) -> Result<SymptomEntry> {
    let mut entry = repository
        .get(id)
        .ok_or_else(|| anyhow!("Symptom {} not found", id))?;

    if let Some(category) = changes.category.as_deref() {
        entry.category = parse_category(category)?;
    }
    if let Some(severity) = changes.severity.as_deref() {
        entry.severity = parse_severity(severity)?;
    }
    if let Some(notes) = changes.notes {
        entry.notes = notes.trim().to_string();
    }
    if let Some(duration) = changes.duration.as_deref() {
        entry.duration = duration_from_minutes(duration)?;
    }
    if let Some(at) = changes.at.as_deref() {
        entry.timestamp = parse_timestamp(at)?;
    }

    if !repository.update(entry.clone())? {
        return Err(anyhow!("Symptom {} was removed while editing", id));
    }

    println!("✅ Updated {} ({})", entry.category, entry.severity);
    Ok(entry)
}

pub fn cmd_delete(repository: &SymptomRepository, id: Uuid) -> Result<()> {
    if repository.delete(id)? {
        println!("🗑️  Deleted symptom {}", id);
    } else {
        println!("Symptom {} not found, nothing to delete.", id);
    }
    Ok(())
}
