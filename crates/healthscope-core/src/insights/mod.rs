//! Insight Engine - symptom analysis
//!
//! Turns a set of logged symptoms into aggregate statistics and a ranked list
//! of human-readable insights. Both are pure functions of the entries and a
//! reference time; the [`InsightsFeed`] wraps them for a reactive consumer.
//!
//! ## Built-in rules
//!
//! - **Severe symptoms** - warns when any severe entry is present
//! - **Recurring category** - trend for categories logged 3+ times
//! - **Weekly frequency** - symptom-free week, or high weekly frequency
//! - **Hydration / Rest** - recommendations tied to specific categories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use healthscope_core::insights::{analyze, statistics};
//!
//! let now = chrono::Utc::now();
//! let entries = repository.all();
//! let insights = analyze(&entries, now);
//! let stats = statistics(&entries, now);
//! ```

pub mod engine;
pub mod feed;
pub mod rules;
pub mod statistics;
pub mod types;

pub use engine::{analyze, AnalysisContext, InsightEngine, InsightRule};
pub use feed::{Clock, InsightsFeed, InsightsSnapshot};
pub use rules::{
    HydrationRule, RecurringCategoryRule, RestRule, SevereSymptomsRule, WeeklyFrequencyRule,
};
pub use statistics::statistics;
pub use types::{HealthInsight, InsightCategory, InsightPriority, SymptomStatistics, TimeRange};
