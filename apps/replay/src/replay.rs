//! Feeds a newline-delimited log of backend events through the listener.

use std::sync::Arc;

use anyhow::Context;
use client_core::{
    event_channel, spawn_listener, AppStores, BackendCommands, DispatchStats, EventDispatcher,
    ListenerOptions,
};
use shared::protocol::BackendEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::config::Settings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub lines: u64,
    pub emitted: u64,
    pub malformed: u64,
    pub dispatch: DispatchStats,
}

/// Blank lines and `#` comments yield `None`.
pub fn parse_event_line(line: &str) -> Result<Option<BackendEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

pub async fn replay<R>(
    reader: R,
    settings: &Settings,
    stores: AppStores,
    backend: Arc<dyn BackendCommands>,
) -> anyhow::Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
{
    let dispatcher = EventDispatcher::new(stores, Arc::clone(&backend));
    let (emitter, subscription) = event_channel(&settings.channel_name, settings.queue_capacity);
    let handle = spawn_listener(
        dispatcher,
        subscription,
        backend,
        ListenerOptions {
            handshake_timeout: settings.handshake_timeout,
        },
    );

    let mut summary = ReplaySummary::default();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("failed to read event log")? {
        summary.lines += 1;
        match parse_event_line(&line) {
            Ok(Some(event)) => {
                emitter
                    .emit(&settings.channel_name, event)
                    .await
                    .context("listener stopped before replay finished")?;
                summary.emitted += 1;
            }
            Ok(None) => {}
            Err(err) => {
                summary.malformed += 1;
                warn!(line = summary.lines, error = %err, "skipping malformed event line");
            }
        }
    }
    drop(emitter);

    let dispatcher = handle.join().await?;
    summary.dispatch = dispatcher.stats();
    Ok(summary)
}

#[cfg(test)]
#[path = "tests/replay_tests.rs"]
mod tests;
