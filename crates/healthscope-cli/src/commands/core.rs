//! Shared command utilities
//!
//! This module contains:
//! - `resolve_data_dir` - Pick the data directory (flag or platform default)
//! - `open_store` / `open_repository` / `open_account` - Service setup
//! - `confirm` - `[y/N]` prompt for destructive commands
//! - `parse_timestamp` - `--at` values for log and edit
//! - `format_duration` / `format_timestamp` - Display helpers

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use healthscope_core::config::default_data_dir;
use healthscope_core::{AccountService, Confirmation, PersistenceStore, SymptomRepository};

/// File name of the SQLite store inside the data directory
pub const STORE_FILE: &str = "healthscope.db";

/// Use `--data-dir` when given, otherwise the platform data directory
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => default_data_dir().context("Could not determine a data directory; pass --data-dir"),
    }
}

/// Open (or create) the store in `data_dir`
pub fn open_store(data_dir: &Path) -> Result<PersistenceStore> {
    let path = data_dir.join(STORE_FILE);
    tracing::debug!(path = %path.display(), "Opening store");
    PersistenceStore::open(&path)
        .with_context(|| format!("Failed to open store at {}", path.display()))
}

pub fn open_repository(data_dir: &Path) -> Result<Arc<SymptomRepository>> {
    let store = open_store(data_dir)?;
    Ok(Arc::new(SymptomRepository::new(store)))
}

pub fn open_account(data_dir: &Path) -> Result<AccountService> {
    let store = open_store(data_dir)?;
    let repository = Arc::new(SymptomRepository::new(store.clone()));
    Ok(AccountService::new(store, repository))
}

/// Ask for confirmation on stdin unless `yes` was passed
pub fn confirm(message: &str, yes: bool) -> Result<Confirmation> {
    if yes {
        return Ok(Confirmation::Confirmed);
    }

    println!("⚠️  {}", message);
    print!("Continue? [y/N] ");
    io::stdout().flush()?;

    read_confirmation(io::stdin().lock())
}

/// Only an explicit "y" / "yes" confirms
pub fn read_confirmation<R: BufRead>(mut input: R) -> Result<Confirmation> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok(Confirmation::from(
        answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"),
    ))
}

/// Parse an `--at` value
///
/// Accepts RFC 3339, or a local "YYYY-MM-DD HH:MM" / "YYYY-MM-DD" (midnight).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| {
            anyhow!(
                "Invalid time '{}'. Use RFC 3339, YYYY-MM-DD HH:MM or YYYY-MM-DD",
                input
            )
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("'{}' does not exist in the local time zone", input))
}

/// "N/A", "N min" below an hour, otherwise "Hh Mm"
pub fn format_duration(duration: Option<Duration>) -> String {
    let Some(duration) = duration else {
        return "N/A".to_string();
    };

    let minutes = duration.as_secs() / 60;
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

/// Local date and time for listings
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%b %-d, %Y %H:%M")
        .to_string()
}
