//! Gate resolver - the one-shot `Pending -> Resolved` state machine

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::transport::{GateTransport, ReqwestTransport};
use super::{classify, parse_endpoint, GateDecision, GateState};
use crate::config::GateConfig;
use crate::error::Result;
use crate::store::PersistenceStore;

/// Runs the launch probe once and publishes the decision
///
/// While pending, the state carries the decision cached by the previous
/// launch so a UI can render something immediately. The probe still runs on
/// every launch; once resolved the state never changes again.
pub struct GateResolver {
    config: GateConfig,
    store: PersistenceStore,
    transport: Arc<dyn GateTransport>,
    state_tx: watch::Sender<GateState>,
    /// Serializes `resolve` so concurrent callers share one probe
    probe_lock: Mutex<()>,
}

impl GateResolver {
    /// Create a resolver using the reqwest transport
    pub fn new(config: GateConfig, store: PersistenceStore) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, store, Arc::new(transport)))
    }

    /// Create a resolver with a custom transport
    pub fn with_transport(
        config: GateConfig,
        store: PersistenceStore,
        transport: Arc<dyn GateTransport>,
    ) -> Self {
        let cached = GateDecision::from_cache(store.gate_cache());
        let (state_tx, _) = watch::channel(GateState::Pending { cached });
        Self {
            config,
            store,
            transport,
            state_tx,
            probe_lock: Mutex::new(()),
        }
    }

    pub fn state(&self) -> GateState {
        *self.state_tx.borrow()
    }

    /// Decision to render now (cached value while pending)
    pub fn current_decision(&self) -> GateDecision {
        self.state().decision()
    }

    /// Receiver that observes the transition to `Resolved`
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state_tx.subscribe()
    }

    /// Run the probe (first call only) and return the decision
    pub async fn resolve(&self) -> GateDecision {
        let _guard = self.probe_lock.lock().await;
        if let GateState::Resolved(decision) = self.state() {
            return decision;
        }

        let decision = self.probe().await;

        if let Err(e) = self.store.set_gate_cache(decision.is_block()) {
            warn!(error = %e, "Failed to cache gate decision");
        }
        self.state_tx.send_replace(GateState::Resolved(decision));
        info!(decision = decision.as_str(), "Gate resolved");

        decision
    }

    /// Resolve on the runtime in the background
    pub fn spawn(self: Arc<Self>) -> JoinHandle<GateDecision> {
        tokio::spawn(async move { self.resolve().await })
    }

    /// Wait for the decision without triggering the probe
    pub async fn resolved(&self) -> GateDecision {
        let mut rx = self.subscribe();
        let decision = match rx.wait_for(GateState::is_resolved).await {
            Ok(state) => state.decision(),
            // The sender lives in `self`, so this only happens during teardown
            Err(_) => self.current_decision(),
        };
        decision
    }

    async fn probe(&self) -> GateDecision {
        let Some(url) = parse_endpoint(&self.config.endpoint) else {
            warn!(endpoint = %self.config.endpoint, "Gate endpoint is not a valid URL");
            return GateDecision::ShowNative;
        };

        let outcome = self.transport.fetch(&url, &self.config).await;
        if let super::ProbeOutcome::TransportError(ref e) = outcome {
            warn!(error = %e, "Gate probe failed");
        }
        classify(&outcome)
    }
}
