//! Insights feed - keeps insights and statistics current for one time window
//!
//! The feed subscribes to a [`SymptomRepository`] and re-derives its
//! snapshot whenever the repository changes or a different [`TimeRange`] is
//! selected. Consumers only ever read the latest snapshot.

use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::SymptomEntry;
use crate::repository::{SubscriptionId, SymptomRepository};

use super::engine::InsightEngine;
use super::statistics::statistics;
use super::types::{HealthInsight, SymptomStatistics, TimeRange};

/// Source of "now" for window calculations
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Latest derived state of the feed
#[derive(Debug, Clone, Serialize)]
pub struct InsightsSnapshot {
    pub range: TimeRange,
    pub insights: Vec<HealthInsight>,
    pub statistics: SymptomStatistics,
    pub computed_at: DateTime<Utc>,
    /// Incremented on every recomputation
    pub revision: u64,
}

pub struct InsightsFeed {
    repository: Arc<SymptomRepository>,
    engine: InsightEngine,
    clock: Clock,
    state: RwLock<InsightsSnapshot>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl InsightsFeed {
    /// Attach a feed for the default (last 7 days) window
    pub fn attach(repository: Arc<SymptomRepository>) -> Arc<Self> {
        Self::attach_with_clock(repository, TimeRange::default(), Arc::new(Utc::now))
    }

    /// Attach a feed with an explicit window and clock
    pub fn attach_with_clock(
        repository: Arc<SymptomRepository>,
        range: TimeRange,
        clock: Clock,
    ) -> Arc<Self> {
        let engine = InsightEngine::new();
        let now = clock();
        let initial = derive(&engine, &repository.all(), range, now, 0);

        let feed = Arc::new(Self {
            repository: repository.clone(),
            engine,
            clock,
            state: RwLock::new(initial),
            subscription: Mutex::new(None),
        });

        let weak = Arc::downgrade(&feed);
        let id = repository.subscribe(move |event| {
            if let Some(feed) = weak.upgrade() {
                feed.recompute(&event.entries);
            }
        });
        *feed.lock_subscription() = Some(id);

        feed
    }

    /// Latest insights and statistics
    pub fn snapshot(&self) -> InsightsSnapshot {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn range(&self) -> TimeRange {
        self.state.read().unwrap_or_else(|e| e.into_inner()).range
    }

    /// Switch to another window and recompute
    pub fn select_range(&self, range: TimeRange) {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            if state.range == range {
                return;
            }
            state.range = range;
        }
        tracing::debug!(range = range.as_str(), "Insights window changed");
        self.refresh();
    }

    /// Recompute from the repository's current contents
    pub fn refresh(&self) {
        let entries = self.repository.all();
        self.recompute(&entries);
    }

    /// Stop following repository changes; the last snapshot stays readable
    pub fn detach(&self) {
        if let Some(id) = self.lock_subscription().take() {
            self.repository.unsubscribe(id);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.lock_subscription().is_some()
    }

    fn recompute(&self, entries: &[SymptomEntry]) {
        let now = (self.clock)();
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = derive(&self.engine, entries, state.range, now, state.revision + 1);
    }

    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<SubscriptionId>> {
        self.subscription.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for InsightsFeed {
    fn drop(&mut self) {
        self.detach();
    }
}

fn derive(
    engine: &InsightEngine,
    entries: &[SymptomEntry],
    range: TimeRange,
    now: DateTime<Utc>,
    revision: u64,
) -> InsightsSnapshot {
    let windowed: Vec<SymptomEntry> = entries
        .iter()
        .filter(|e| range.contains(e.timestamp, now))
        .cloned()
        .collect();

    InsightsSnapshot {
        range,
        insights: engine.analyze(&windowed, now),
        statistics: statistics(&windowed, now),
        computed_at: now,
        revision,
    }
}
