//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (data dir, store/repository setup, prompts)
//! - `launch` - Launch gate command
//! - `symptoms` - Symptom commands (log, list, edit, delete)
//! - `insights` - Insights and statistics report
//! - `profile` - Onboarding, profile, notifications, reset, delete-account

pub mod core;
pub mod insights;
pub mod launch;
pub mod profile;
pub mod symptoms;

// Re-export command functions for main.rs
pub use core::*;
pub use insights::*;
pub use launch::*;
pub use profile::*;
pub use symptoms::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
