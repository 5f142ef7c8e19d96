//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

/// HealthScope - Track symptoms and spot patterns
#[derive(Parser)]
#[command(name = "healthscope")]
#[command(about = "Personal symptom tracker with rule-based insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir, e.g. ~/.local/share/healthscope)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config override file (defaults to <data dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the launch gate and show which experience applies
    Launch,

    /// Create your profile
    Onboard {
        /// Your name
        #[arg(short, long)]
        name: String,

        /// Your age (1-119)
        #[arg(short, long)]
        age: Option<String>,

        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Log a symptom
    Log {
        /// Category: headache, fatigue, fever, cough, nausea, body-pain, dizziness, other
        category: String,

        /// Severity: mild, moderate, severe
        #[arg(short, long, default_value = "mild")]
        severity: String,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Duration in minutes
        #[arg(short, long)]
        duration: Option<String>,

        /// When it happened: RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" (local time)
        #[arg(long)]
        at: Option<String>,
    },

    /// List logged symptoms (newest first)
    List {
        /// Only show one category
        #[arg(short, long)]
        category: Option<String>,

        /// Only show the last 7 days
        #[arg(long)]
        recent: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Edit a logged symptom
    Edit {
        /// Entry ID
        id: Uuid,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New severity
        #[arg(short, long)]
        severity: Option<String>,

        /// New notes (empty string clears them)
        #[arg(short, long)]
        notes: Option<String>,

        /// New duration in minutes (0 clears it)
        #[arg(short, long)]
        duration: Option<String>,

        /// New time it happened (same formats as `log --at`)
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete a logged symptom
    Delete {
        /// Entry ID
        id: Uuid,
    },

    /// Show insights and statistics
    Insights {
        /// Time window: week, month, all
        #[arg(short, long, default_value = "week")]
        range: String,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Show your profile
    Profile,

    /// Turn notifications on or off
    Notifications {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Delete all logged symptoms
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete your profile and all data
    DeleteAccount {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}
