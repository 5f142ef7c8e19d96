//! HealthScope Core Library
//!
//! Shared functionality for the HealthScope symptom tracker:
//! - Key-value persistence (SQLite or in-memory) for the profile and symptoms
//! - Write-through symptom repository with change subscriptions
//! - Rule-based insights, statistics and a reactive insights feed
//! - Launch gate that decides between the native and the web experience
//! - Onboarding validation and account settings

pub mod account;
pub mod config;
pub mod error;
pub mod gate;
pub mod insights;
pub mod models;
pub mod onboarding;
pub mod repository;
pub mod store;

/// Test utilities including the mock gate endpoint
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use account::{AccountService, Confirmation};
pub use config::{AppConfig, GateConfig};
pub use error::{Error, Result, ValidationError};
pub use gate::{GateDecision, GateResolver, GateState, GateTransport, ReqwestTransport};
pub use insights::{
    analyze, statistics, HealthInsight, InsightCategory, InsightPriority, InsightsFeed,
    InsightsSnapshot, SymptomStatistics, TimeRange,
};
pub use models::{SymptomCategory, SymptomEntry, SymptomSeverity, UserProfile};
pub use onboarding::{Onboarding, OnboardingDraft, OnboardingStep};
pub use repository::{Change, RepositoryEvent, SubscriptionId, SymptomRepository};
pub use store::{KeyValueStore, KvWrite, MemoryStore, PersistenceStore, SqliteStore};
