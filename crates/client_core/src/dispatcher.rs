//! Applies backend-pushed events to the stores.
//!
//! One handler per known tag, looked up in a table built at construction.
//! Unknown tags are logged and ignored so an older frontend keeps working
//! against a newer backend.

use std::{collections::HashMap, future::Future, sync::Arc};

use serde::Serialize;
use shared::protocol::{BackendEvent, BlockHeightPayload, EventTag};
use tracing::{error, info, trace, warn};

use crate::{
    backend::BackendCommands,
    dedup::DiagnosticDedup,
    error::{CommandError, DispatchError},
    handlers::handler_table,
    store::AppStores,
};

pub type Handler = fn(&HandlerContext<'_>, &BackendEvent) -> Result<(), DispatchError>;

/// What a handler may touch while applying one event.
pub struct HandlerContext<'a> {
    pub stores: &'a AppStores,
    backend: &'a Arc<dyn BackendCommands>,
}

impl HandlerContext<'_> {
    pub fn decode<T: serde::de::DeserializeOwned>(
        &self,
        tag: EventTag,
        event: &BackendEvent,
    ) -> Result<T, DispatchError> {
        event
            .decode()
            .map_err(|source| DispatchError::InvalidPayload { tag, source })
    }

    /// Runs a backend round trip in the background. The dispatcher never
    /// waits on it; failures are logged by the spawned task.
    pub fn spawn_follow_up<F, Fut>(&self, name: &'static str, make: F) -> bool
    where
        F: FnOnce(Arc<dyn BackendCommands>) -> Fut,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(follow_up = name, "no async runtime; skipping backend follow-up");
            return false;
        };
        let follow_up = make(Arc::clone(self.backend));
        runtime.spawn(async move {
            if let Err(err) = follow_up.await {
                error!(follow_up = name, error = %err, "backend follow-up failed");
            }
        });
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied { diagnostic_logged: bool },
    /// Block height not above the stored one.
    Stale,
    Unknown,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub applied: u64,
    pub stale: u64,
    pub unknown: u64,
    pub failed: u64,
}

pub fn block_height_advances(current: Option<u64>, incoming: u64) -> bool {
    current.map_or(true, |height| incoming > height)
}

pub struct EventDispatcher {
    stores: AppStores,
    backend: Arc<dyn BackendCommands>,
    handlers: HashMap<EventTag, Handler>,
    diagnostics: DiagnosticDedup,
    stats: DispatchStats,
}

impl EventDispatcher {
    pub fn new(stores: AppStores, backend: Arc<dyn BackendCommands>) -> Self {
        Self {
            stores,
            backend,
            handlers: handler_table(),
            diagnostics: DiagnosticDedup::new(),
            stats: DispatchStats::default(),
        }
    }

    pub fn stores(&self) -> &AppStores {
        &self.stores
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn dispatch(&mut self, event: BackendEvent) -> DispatchOutcome {
        let outcome = self.apply(&event);
        match outcome {
            DispatchOutcome::Applied { .. } => self.stats.applied += 1,
            DispatchOutcome::Stale => self.stats.stale += 1,
            DispatchOutcome::Unknown => self.stats.unknown += 1,
            DispatchOutcome::Failed => self.stats.failed += 1,
        }
        outcome
    }

    fn apply(&mut self, event: &BackendEvent) -> DispatchOutcome {
        let Some((tag, handler)) = event
            .tag()
            .and_then(|tag| self.handlers.get(&tag).map(|handler| (tag, *handler)))
        else {
            warn!(event_type = %event.event_type, "unknown backend event type; ignoring");
            return DispatchOutcome::Unknown;
        };

        if tag == EventTag::NewBlockHeight && !self.admits_block_height(event) {
            return DispatchOutcome::Stale;
        }

        let diagnostic_logged = self.diagnostics.observe(tag, &event.payload);
        if diagnostic_logged {
            info!(event_type = %tag, payload = %event.payload, "backend diagnostic event");
        }

        let ctx = HandlerContext {
            stores: &self.stores,
            backend: &self.backend,
        };
        match handler(&ctx, event) {
            Ok(()) => DispatchOutcome::Applied { diagnostic_logged },
            Err(err) => {
                error!(event_type = %tag, error = %err, "failed to apply backend event");
                DispatchOutcome::Failed
            }
        }
    }

    fn admits_block_height(&self, event: &BackendEvent) -> bool {
        // Malformed payloads fall through so the handler reports them.
        let Ok(payload) = event.decode::<BlockHeightPayload>() else {
            return true;
        };
        let current = self.stores.node.read(|node| node.block_height);
        let admitted = block_height_advances(current, payload.block_height);
        if !admitted {
            trace!(
                incoming = payload.block_height,
                current = current.unwrap_or_default(),
                "dropping stale block height"
            );
        }
        admitted
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
