//! Event channel subscription: one listener per application lifetime.

use std::{sync::Arc, time::Duration};

use shared::protocol::{BackendEvent, BACKEND_EVENT_CHANNEL};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, error, info};

use crate::{
    backend::BackendCommands,
    dispatcher::EventDispatcher,
    error::{ChannelError, CommandError, ListenerError},
};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend side of the bridge: pushes events in emission order.
#[derive(Clone)]
pub struct EventEmitter {
    channel: Arc<str>,
    tx: mpsc::Sender<BackendEvent>,
}

impl EventEmitter {
    pub async fn emit(&self, channel: &str, event: BackendEvent) -> Result<(), ChannelError> {
        if channel != &*self.channel {
            return Err(ChannelError::WrongChannel {
                expected: self.channel.to_string(),
                actual: channel.to_string(),
            });
        }
        self.tx.send(event).await.map_err(|_| ChannelError::Closed)
    }
}

pub struct EventSubscription {
    channel: Arc<str>,
    rx: mpsc::Receiver<BackendEvent>,
}

impl EventSubscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

pub fn event_channel(channel: &str, capacity: usize) -> (EventEmitter, EventSubscription) {
    let channel: Arc<str> = Arc::from(channel);
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        EventEmitter {
            channel: Arc::clone(&channel),
            tx,
        },
        EventSubscription { channel, rx },
    )
}

/// Bridge on the well-known backend channel.
pub fn backend_event_channel(capacity: usize) -> (EventEmitter, EventSubscription) {
    event_channel(BACKEND_EVENT_CHANNEL, capacity)
}

#[derive(Debug, Clone)]
pub struct ListenerOptions {
    pub handshake_timeout: Duration,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

pub struct ListenerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<EventDispatcher>,
}

impl ListenerHandle {
    /// Tears the subscription down. Queued events are not dispatched and
    /// in-flight follow-ups keep running.
    pub async fn shutdown(mut self) -> Result<EventDispatcher, ListenerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        Ok(self.task.await?)
    }

    /// Waits until every emitter is dropped and the queue drains.
    pub async fn join(self) -> Result<EventDispatcher, ListenerError> {
        let ListenerHandle { shutdown, task } = self;
        let dispatcher = task.await?;
        drop(shutdown);
        Ok(dispatcher)
    }
}

fn saturating_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Announces readiness once. Failures are logged and never retried; the
/// listener runs this detached so dispatch never waits on it.
pub async fn announce_ready(backend: &dyn BackendCommands, timeout: Duration) -> bool {
    let result = match tokio::time::timeout(timeout, backend.frontend_ready()).await {
        Ok(result) => result,
        Err(_) => Err(CommandError::TimedOut {
            command: "frontend_ready",
            timeout_ms: saturating_millis(timeout),
        }),
    };
    match result {
        Ok(()) => {
            debug!("frontend ready handshake acknowledged");
            true
        }
        Err(err) => {
            error!(error = %err, "frontend ready handshake failed; continuing without it");
            false
        }
    }
}

pub fn spawn_listener(
    mut dispatcher: EventDispatcher,
    subscription: EventSubscription,
    backend: Arc<dyn BackendCommands>,
    options: ListenerOptions,
) -> ListenerHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let EventSubscription { channel, mut rx } = subscription;

    let task = tokio::spawn(async move {
        info!(channel = %channel, "subscribed to backend events");
        tokio::spawn(async move {
            announce_ready(backend.as_ref(), options.handshake_timeout).await;
        });

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!(channel = %channel, "backend event listener torn down");
                    break;
                }
                next = rx.recv() => match next {
                    Some(event) => {
                        dispatcher.dispatch(event);
                    }
                    None => {
                        info!(channel = %channel, "backend event channel closed");
                        break;
                    }
                },
            }
        }
        dispatcher
    });

    ListenerHandle {
        shutdown: Some(shutdown_tx),
        task,
    }
}

#[cfg(test)]
#[path = "tests/listener_tests.rs"]
mod tests;
