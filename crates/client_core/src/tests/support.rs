use std::{
    io,
    sync::{Arc, Mutex as StdMutex},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::protocol::BackendEvent;
use tokio::sync::Mutex;

use crate::{backend::BackendCommands, error::CommandError};

/// Records every command; optionally refuses them all.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub reject_with: Option<String>,
}

impl RecordingBackend {
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reject_with: Some(message.into()),
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Yields until `count` calls were recorded or the budget runs out.
    pub async fn wait_for_calls(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let calls = self.calls().await;
            if calls.len() >= count {
                return calls;
            }
            tokio::task::yield_now().await;
        }
        self.calls().await
    }

    async fn record(&self, command: &'static str, call: String) -> Result<(), CommandError> {
        self.calls.lock().await.push(call);
        match &self.reject_with {
            Some(message) => Err(CommandError::Rejected {
                command,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BackendCommands for RecordingBackend {
    async fn frontend_ready(&self) -> Result<(), CommandError> {
        self.record("frontend_ready", "frontend_ready".into()).await
    }

    async fn confirm_exchange_id(&self, exchange_id: &str) -> Result<(), CommandError> {
        self.record(
            "confirm_exchange_id",
            format!("confirm_exchange_id:{exchange_id}"),
        )
        .await
    }

    async fn refresh_transactions(&self) -> Result<(), CommandError> {
        self.record("refresh_transactions", "refresh_transactions".into())
            .await
    }
}

pub fn event(event_type: &str, payload: Value) -> BackendEvent {
    BackendEvent::raw(event_type, payload)
}

pub fn block_height(height: u64) -> BackendEvent {
    event("NewBlockHeight", json!({ "block_height": height }))
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<StdMutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a plain-text subscriber and returns what it logged.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().expect("log buffer poisoned").clone();
    String::from_utf8(bytes).expect("utf8 logs")
}
